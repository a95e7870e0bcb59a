use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors raised while opening or reading a realtime transport.
///
/// None of these reach callers of `start`/`stop`: a failed attempt is logged
/// and turned into a reconnection.
#[derive(Error, Debug)]
pub enum RealtimeError {
    /// WebSocket protocol error (handshake failed, invalid frame, etc.)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// General connection error with descriptive message
    #[error("Connection error: {0}")]
    Connection(String),

    /// The token provider failed to produce a token
    #[error("Token error: {0}")]
    Token(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error on the event stream fallback
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error (malformed endpoint URL)
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A transport did not open within the connect timeout
    #[error("Timeout error")]
    Timeout,
}

/// Convenience type alias for `Result<T, RealtimeError>`.
pub type Result<T> = std::result::Result<T, RealtimeError>;
