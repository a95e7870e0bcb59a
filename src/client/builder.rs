use super::{ClientState, ConnectionState, Connector, NetworkConnector, RealtimeClient};
use crate::infrastructure::{Endpoints, TokenProvider};
use crate::messaging::{EventCallback, EventRouter, Topic, TopicFilter};
use crate::types::constants::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_MAX_BACKOFF_MS, FALLBACK_GRACE_MS, env_vars,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Callback invoked on every connection state transition
pub type StatusCallback = Arc<dyn Fn(ConnectionState) + Send + Sync + 'static>;

/// Callback invoked with every scheduled reconnect delay
pub type BackoffCallback = Arc<dyn Fn(Duration) + Send + Sync + 'static>;

#[derive(Clone, Default)]
pub struct RealtimeClientOptions {
    /// Explicit WebSocket endpoint
    pub socket_url: Option<String>,
    /// Explicit server-sent events endpoint
    pub stream_url: Option<String>,
    /// API base the socket endpoint is derived from when not explicit
    pub api_base_url: Option<String>,
    /// Accepted topics; empty accepts every event
    pub topics: Vec<Topic>,
    pub on_event: Option<EventCallback>,
    pub on_status: Option<StatusCallback>,
    pub on_backoff: Option<BackoffCallback>,
    pub get_token: Option<TokenProvider>,
    pub max_backoff_ms: Option<u64>,
    pub fallback_grace_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
}

impl RealtimeClientOptions {
    /// Load endpoints, topics and timings from the environment.
    ///
    /// Callbacks are left unset. Unparseable numbers keep their defaults.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let millis = |name: &str| {
            var(name).and_then(|v| match v.trim().parse::<u64>() {
                Ok(ms) => Some(ms),
                Err(e) => {
                    tracing::warn!("Ignoring {}={}: {}", name, v, e);
                    None
                }
            })
        };

        Self {
            socket_url: var(env_vars::SOCKET_URL),
            stream_url: var(env_vars::STREAM_URL),
            api_base_url: var(env_vars::API_BASE_URL),
            topics: var(env_vars::TOPICS)
                .map(|v| parse_topics(&v))
                .unwrap_or_default(),
            max_backoff_ms: millis(env_vars::MAX_BACKOFF_MS),
            connect_timeout_ms: millis(env_vars::CONNECT_TIMEOUT_MS),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for RealtimeClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeClientOptions")
            .field("socket_url", &self.socket_url)
            .field("stream_url", &self.stream_url)
            .field("api_base_url", &self.api_base_url)
            .field("topics", &self.topics)
            .field("on_event", &self.on_event.is_some())
            .field("on_status", &self.on_status.is_some())
            .field("on_backoff", &self.on_backoff.is_some())
            .field("get_token", &self.get_token.is_some())
            .field("max_backoff_ms", &self.max_backoff_ms)
            .field("fallback_grace_ms", &self.fallback_grace_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .finish()
    }
}

/// Parses a comma separated topic list (`"sales, inventory"`)
pub fn parse_topics(value: &str) -> Vec<Topic> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Topic::from)
        .collect()
}

/// Settings fixed for the lifetime of a client
pub(crate) struct ClientConfig {
    pub endpoints: Endpoints,
    pub router: EventRouter,
    pub on_status: Option<StatusCallback>,
    pub on_backoff: Option<BackoffCallback>,
    pub get_token: Option<TokenProvider>,
    pub max_backoff_ms: u64,
    pub fallback_grace: Duration,
    pub connect_timeout: Duration,
}

/// Builder for RealtimeClient that resolves configuration once
pub struct RealtimeClientBuilder {
    options: RealtimeClientOptions,
    connector: Option<Arc<dyn Connector>>,
}

impl RealtimeClientBuilder {
    /// Create a new builder
    pub fn new(options: RealtimeClientOptions) -> Self {
        Self {
            options,
            connector: None,
        }
    }

    /// Use a custom transport connector instead of the network one
    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Build the client. Nothing connects until `start` is called.
    pub fn build(self) -> RealtimeClient {
        let options = self.options;
        let endpoints = Endpoints::resolve(
            options.socket_url.as_deref(),
            options.stream_url.as_deref(),
            options.api_base_url.as_deref(),
        );
        tracing::debug!(
            "Resolved realtime endpoints: socket={} stream={}",
            endpoints.socket,
            endpoints.stream
        );

        let config = ClientConfig {
            endpoints,
            router: EventRouter::new(TopicFilter::new(options.topics), options.on_event),
            on_status: options.on_status,
            on_backoff: options.on_backoff,
            get_token: options.get_token,
            max_backoff_ms: options.max_backoff_ms.unwrap_or(DEFAULT_MAX_BACKOFF_MS),
            fallback_grace: Duration::from_millis(
                options.fallback_grace_ms.unwrap_or(FALLBACK_GRACE_MS),
            ),
            connect_timeout: Duration::from_millis(
                options
                    .connect_timeout_ms
                    .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
            ),
        };

        let connector: Arc<dyn Connector> = match self.connector {
            Some(connector) => connector,
            None => Arc::new(NetworkConnector::new()),
        };

        RealtimeClient {
            config: Arc::new(config),
            connector,
            state: Arc::new(RwLock::new(ClientState::new())),
        }
    }
}
