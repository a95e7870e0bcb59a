use crate::infrastructure::EventStreamFactory;
use crate::types::Result;
use crate::websocket::WebSocketFactory;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use url::Url;

/// Text frames received on an open transport
pub type FrameStream = BoxStream<'static, Result<String>>;

/// Connection status reported to `on_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    ConnectedSocket,
    ConnectedStream,
    Disconnected,
    Reconnecting,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::ConnectedSocket | Self::ConnectedStream)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::ConnectedSocket => "connected (socket)",
            Self::ConnectedStream => "connected (stream)",
            Self::Disconnected => "disconnected",
            Self::Reconnecting => "reconnecting",
        };
        f.write_str(s)
    }
}

/// The two transports a client can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Bidirectional WebSocket, preferred
    Socket,
    /// Server-sent events fallback
    Stream,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Socket => f.write_str("socket"),
            Self::Stream => f.write_str("stream"),
        }
    }
}

/// Opens transports for the client.
///
/// The returned future resolves once the transport is open; the stream then
/// yields its text frames and ends when the transport closes. Dropping the
/// stream closes the transport.
pub trait Connector: Send + Sync + 'static {
    fn open(&self, kind: TransportKind, url: Url) -> BoxFuture<'static, Result<FrameStream>>;
}

/// Connector over the network: tokio-tungstenite for the socket, reqwest
/// for the event stream
pub struct NetworkConnector {
    http_client: reqwest::Client,
}

impl NetworkConnector {
    pub fn new() -> Self {
        Self::with_http_client(reqwest::Client::new())
    }

    pub fn with_http_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

impl Default for NetworkConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for NetworkConnector {
    fn open(&self, kind: TransportKind, url: Url) -> BoxFuture<'static, Result<FrameStream>> {
        match kind {
            TransportKind::Socket => Box::pin(WebSocketFactory::create(url)),
            TransportKind::Stream => {
                let factory = EventStreamFactory::new(self.http_client.clone());
                Box::pin(async move { factory.create(url).await })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RealtimeError;
    use tokio::net::TcpListener;

    async fn closed_port() -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    }

    #[tokio::test]
    async fn test_network_connector_dispatches_by_kind() {
        let connector = NetworkConnector::default();
        let addr = closed_port().await;

        let socket = connector
            .open(TransportKind::Socket, Url::parse(&format!("ws://{}/ws", addr)).unwrap())
            .await;
        assert!(matches!(socket, Err(RealtimeError::WebSocket(_))));

        let stream = connector
            .open(
                TransportKind::Stream,
                Url::parse(&format!("http://{}/realtime", addr)).unwrap(),
            )
            .await;
        assert!(matches!(stream, Err(RealtimeError::Http(_))));
    }

    #[test]
    fn test_connected_states() {
        assert!(ConnectionState::ConnectedSocket.is_connected());
        assert!(ConnectionState::ConnectedStream.is_connected());
        assert!(!ConnectionState::Reconnecting.is_connected());
        assert_eq!(ConnectionState::ConnectedStream.to_string(), "connected (stream)");
    }
}
