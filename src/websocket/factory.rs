use crate::types::{RealtimeError, Result};
use futures::future;
use futures::stream::{BoxStream, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// WebSocket factory for creating WebSocket connections
pub struct WebSocketFactory;

impl WebSocketFactory {
    /// Opens a WebSocket connection and returns its text frames.
    ///
    /// The stream ends on a close frame; binary, ping and pong frames are
    /// skipped.
    pub async fn create(url: Url) -> Result<BoxStream<'static, Result<String>>> {
        tracing::debug!("Creating WebSocket connection to: {}", url.path());

        let (ws_stream, response) = connect_async(url.as_str()).await?;
        tracing::debug!("WebSocket handshake status: {}", response.status());

        let frames = ws_stream
            .take_while(|msg| {
                let open = match msg {
                    Ok(Message::Close(Some(frame))) => {
                        tracing::warn!(
                            "Server closed connection: code={:?}, reason='{}'",
                            frame.code,
                            frame.reason
                        );
                        false
                    }
                    Ok(Message::Close(None)) => {
                        tracing::warn!("Server closed connection without close frame");
                        false
                    }
                    _ => true,
                };
                future::ready(open)
            })
            .filter_map(|msg| {
                future::ready(match msg {
                    Ok(Message::Text(text)) => Some(Ok(text.as_str().to_owned())),
                    Ok(Message::Binary(data)) => {
                        tracing::warn!(
                            "Received unexpected binary message ({} bytes)",
                            data.len()
                        );
                        None
                    }
                    Ok(Message::Ping(data)) => {
                        tracing::debug!("Received ping ({} bytes)", data.len());
                        None
                    }
                    Ok(Message::Pong(data)) => {
                        tracing::debug!("Received pong ({} bytes)", data.len());
                        None
                    }
                    Ok(_) => None,
                    Err(e) => Some(Err(RealtimeError::from(e))),
                })
            })
            .boxed();

        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::SinkExt;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;
    use tokio_tungstenite::tungstenite::protocol::CloseFrame;
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

    /// Accepts one socket and sends `messages`. With `linger` the server then
    /// reads until the client goes away, otherwise it drops the connection.
    async fn serve(messages: Vec<Message>, linger: bool) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(socket).await.unwrap();
            for message in messages {
                ws.send(message).await.unwrap();
            }
            while linger && matches!(ws.next().await, Some(Ok(_))) {}
        });

        Url::parse(&format!("ws://{}/ws?t=abc", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_yields_text_and_skips_control_frames() {
        let url = serve(
            vec![
                Message::Text("a".into()),
                Message::Binary(vec![1, 2, 3].into()),
                Message::Ping(vec![9].into()),
                Message::Pong(Vec::new().into()),
                Message::Text("b".into()),
                Message::Close(Some(CloseFrame {
                    code: CloseCode::Normal,
                    reason: "shift over".into(),
                })),
            ],
            true,
        )
        .await;

        let frames = WebSocketFactory::create(url).await.unwrap();
        let frames: Vec<String> = tokio::time::timeout(
            Duration::from_secs(5),
            frames.map(|frame| frame.unwrap()).collect(),
        )
        .await
        .expect("stream did not end on close frame");

        assert_eq!(frames, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_close_without_frame_ends_stream() {
        let url = serve(vec![Message::Text("a".into()), Message::Close(None)], true).await;

        let mut frames = WebSocketFactory::create(url).await.unwrap();
        assert_eq!(frames.next().await.unwrap().unwrap(), "a");
        assert!(frames.next().await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_connection_is_an_error() {
        let url = serve(vec![Message::Text("a".into())], false).await;

        let mut frames = WebSocketFactory::create(url).await.unwrap();
        assert_eq!(frames.next().await.unwrap().unwrap(), "a");
        assert!(matches!(
            frames.next().await,
            Some(Err(RealtimeError::WebSocket(_)))
        ));
    }

    #[tokio::test]
    async fn test_refused_connection_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("ws://{}/ws", addr)).unwrap();
        assert!(matches!(
            WebSocketFactory::create(url).await,
            Err(RealtimeError::WebSocket(_))
        ));
    }
}
