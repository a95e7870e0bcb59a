//! # POS Realtime
//!
//! Live event feed client for a point-of-sale backend. Events arrive over a
//! WebSocket when one can be opened, over server-sent events otherwise, and
//! the connection is retried with exponential backoff until stopped.
//!
//! ## Example
//!
//! ```no_run
//! use pos_realtime::{EventEnvelope, RealtimeClient, RealtimeClientOptions, Topic};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = RealtimeClient::new(RealtimeClientOptions {
//!         socket_url: Some("wss://pos.example.com/ws".to_string()),
//!         topics: vec![Topic::Sales, Topic::Inventory],
//!         on_event: Some(Arc::new(|event: EventEnvelope| println!("{} on {}", event.r#type, event.resolved_topic()))),
//!         ..Default::default()
//!     });
//!
//!     client.start().await;
//!     tokio::signal::ctrl_c().await.ok();
//!     client.stop().await;
//! }
//! ```

pub mod client;
pub mod infrastructure;
pub mod messaging;
pub mod types;
pub mod websocket;

pub use client::{
    ConnectionState, Connector, RealtimeClient, RealtimeClientBuilder, RealtimeClientOptions,
    TransportKind,
};
pub use infrastructure::{Endpoints, TokenProvider};
pub use messaging::{EventCallback, Topic};
pub use types::{EventEnvelope, RealtimeError, Result};
