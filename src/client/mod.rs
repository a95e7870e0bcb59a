// Module declarations
mod builder;
mod client;
mod connection;
#[cfg(test)]
mod mock;
mod state;

// Public API exports
pub use builder::{
    BackoffCallback, RealtimeClientBuilder, RealtimeClientOptions, StatusCallback, parse_topics,
};
pub use connection::{ConnectionState, Connector, FrameStream, NetworkConnector, TransportKind};
pub use client::RealtimeClient;
pub use state::ClientState;
