//! Endpoint resolution for both transports.
//!
//! Each URL is taken from explicit configuration first, then derived from a
//! sibling value, then from the built-in default. Resolution happens once,
//! when the client is built; the token is appended per attempt.

use crate::types::constants::{
    DEFAULT_SOCKET_URL, DEFAULT_STREAM_URL, SOCKET_PATH, STREAM_PATH, STREAM_PATH_SUFFIXES,
    TOKEN_QUERY_PARAM,
};
use crate::types::Result;
use std::sync::Arc;
use url::Url;

/// Callback returning the bearer token to attach to each attempt
pub type TokenProvider = Arc<dyn Fn() -> Result<Option<String>> + Send + Sync + 'static>;

/// Resolved transport endpoints (without token)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub socket: String,
    pub stream: String,
}

impl Endpoints {
    pub fn resolve(
        socket_url: Option<&str>,
        stream_url: Option<&str>,
        api_base_url: Option<&str>,
    ) -> Self {
        let socket = resolve_socket_url(socket_url, api_base_url);
        let stream = resolve_stream_url(stream_url, &socket);
        Self { socket, stream }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Explicit socket URL, else derived from the API base, else the default
pub fn resolve_socket_url(explicit: Option<&str>, api_base_url: Option<&str>) -> String {
    if let Some(url) = non_empty(explicit) {
        return url.to_string();
    }

    if let Some(base) = non_empty(api_base_url) {
        match api_base_to_socket_endpoint(base) {
            Some(url) => return url,
            None => tracing::warn!(
                "Cannot derive socket URL from API base '{}', using default",
                base
            ),
        }
    }

    DEFAULT_SOCKET_URL.to_string()
}

/// Explicit stream URL, else derived from the socket URL, else the default
pub fn resolve_stream_url(explicit: Option<&str>, socket_url: &str) -> String {
    if let Some(url) = non_empty(explicit) {
        return url.to_string();
    }

    match ws_to_http_endpoint(socket_url) {
        Some(url) => url,
        None => {
            tracing::warn!(
                "Cannot derive stream URL from socket URL '{}', using default",
                socket_url
            );
            DEFAULT_STREAM_URL.to_string()
        }
    }
}

/// Converts an HTTP API base (`https://host/api`) to the socket endpoint
/// (`wss://host/ws`)
pub fn api_base_to_socket_endpoint(api_base: &str) -> Option<String> {
    let mut url = Url::parse(api_base).ok()?;
    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        "ws" | "wss" => url.scheme(),
        _ => return None,
    }
    .to_string();

    url.set_scheme(&scheme).ok()?;
    url.set_path(SOCKET_PATH);
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

/// Converts a socket endpoint to the event stream endpoint
///
/// `ws` becomes `http` and `wss` becomes `https`. The path is kept when it
/// already names a stream endpoint, otherwise it becomes `/realtime`.
pub fn ws_to_http_endpoint(ws_endpoint: &str) -> Option<String> {
    let mut url = Url::parse(ws_endpoint).ok()?;
    let scheme = match url.scheme() {
        "ws" => "http",
        "wss" => "https",
        "http" | "https" => url.scheme(),
        _ => return None,
    }
    .to_string();

    url.set_scheme(&scheme).ok()?;
    let path = url.path().trim_end_matches('/').to_string();
    if !STREAM_PATH_SUFFIXES
        .iter()
        .any(|suffix| path.ends_with(suffix))
    {
        url.set_path(STREAM_PATH);
    }
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

/// Parses an endpoint and appends the token query parameter, if any
pub fn with_token(endpoint: &str, token_provider: Option<&TokenProvider>) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;

    if let Some(provider) = token_provider {
        if let Some(token) = provider()? {
            url.query_pairs_mut().append_pair(TOKEN_QUERY_PARAM, &token);
        }
    }

    Ok(url)
}
