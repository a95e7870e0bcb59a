/// Built-in topic names (magic strings layer)
pub mod topics {
    pub const SALES: &str = "sales";
    pub const INVENTORY: &str = "inventory";
    pub const SYSTEM: &str = "system";
    pub const WARRANTY: &str = "warranty";
}

/// Environment variables read by `RealtimeClientOptions::from_env`
pub mod env_vars {
    pub const SOCKET_URL: &str = "POS_REALTIME_WS_URL";
    pub const STREAM_URL: &str = "POS_REALTIME_SSE_URL";
    pub const API_BASE_URL: &str = "POS_API_BASE_URL";
    pub const TOPICS: &str = "POS_REALTIME_TOPICS";
    pub const MAX_BACKOFF_MS: &str = "POS_REALTIME_MAX_BACKOFF_MS";
    pub const CONNECT_TIMEOUT_MS: &str = "POS_REALTIME_CONNECT_TIMEOUT_MS";
}

/// Endpoint used when neither an explicit nor a derivable socket URL exists
pub const DEFAULT_SOCKET_URL: &str = "ws://127.0.0.1:8787/ws";

/// Endpoint used when neither an explicit nor a derivable stream URL exists
pub const DEFAULT_STREAM_URL: &str = "http://127.0.0.1:8787/realtime";

/// Path of the socket endpoint relative to the API base
pub const SOCKET_PATH: &str = "/ws";

/// Path given to a derived stream URL
pub const STREAM_PATH: &str = "/realtime";

/// Stream paths that are kept as-is when deriving
pub const STREAM_PATH_SUFFIXES: [&str; 2] = ["/realtime", "/sse"];

/// Query parameter carrying the bearer token
pub const TOKEN_QUERY_PARAM: &str = "t";

/// Reconnect delay floor (milliseconds)
pub const BACKOFF_FLOOR_MS: u64 = 1000;

/// Default reconnect delay ceiling (milliseconds)
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 15000;

/// Time the socket gets before the fallback stream is tried (milliseconds)
pub const FALLBACK_GRACE_MS: u64 = 1000;

/// Default timeout for opening either transport (milliseconds)
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10000;

/// Longest unterminated line the event stream decoder buffers (bytes)
pub const SSE_MAX_LINE_BYTES: usize = 1024 * 1024;
