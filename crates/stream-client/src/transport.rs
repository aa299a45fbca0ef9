//! Stream transports

use crate::error::StreamError;
use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

/// Opens a receive-only frame stream to an endpoint
///
/// The stream yields text frames until the transport closes. Ending the
/// stream or yielding an error is treated as a close.
#[async_trait]
pub trait Connector: Send {
    type Stream: Stream<Item = Result<String, StreamError>> + Send + Unpin;

    /// Establish a transport to `endpoint`
    async fn connect(&mut self, endpoint: &Url) -> Result<Self::Stream, StreamError>;
}

/// WebSocket connector backed by `tokio-tungstenite`
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    type Stream = BoxStream<'static, Result<String, StreamError>>;

    async fn connect(&mut self, endpoint: &Url) -> Result<Self::Stream, StreamError> {
        let (socket, response) = tokio_tungstenite::connect_async(endpoint.as_str())
            .await
            .map_err(|e| StreamError::Connect(e.to_string()))?;
        debug!("WebSocket handshake completed: {}", response.status());

        let frames = socket.filter_map(|message| async move {
            match message {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => Some(Ok(text)),
                    Err(_) => {
                        warn!("Dropping non-UTF-8 binary frame");
                        None
                    }
                },
                Ok(Message::Close(reason)) => {
                    debug!("Close frame received: {:?}", reason);
                    None
                }
                Ok(_) => None,
                Err(e) => Some(Err(StreamError::Transport(e.to_string()))),
            }
        });

        Ok(frames.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::SinkExt;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept one client, send `script`, then collect what the client sends
    async fn serve(script: Vec<Message>, close: bool) -> (Url, JoinHandle<Vec<Message>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut socket = tokio_tungstenite::accept_async(tcp).await.unwrap();
            for message in script {
                socket.send(message).await.unwrap();
            }
            if !close {
                return Vec::new();
            }

            socket.send(Message::Close(None)).await.unwrap();
            let mut received = Vec::new();
            while let Some(Ok(message)) = socket.next().await {
                received.push(message);
            }
            received
        });

        (Url::parse(&format!("ws://{}/", addr)).unwrap(), server)
    }

    #[tokio::test]
    async fn test_text_and_utf8_binary_delivered() {
        let (endpoint, server) = serve(
            vec![
                Message::Text("first".to_string()),
                Message::Binary(b"second".to_vec()),
                Message::Binary(vec![0xff, 0xfe, 0x00]),
                Message::Text("third".to_string()),
            ],
            true,
        )
        .await;

        let stream = WsConnector.connect(&endpoint).await.unwrap();
        let frames: Vec<String> = stream.map(|frame| frame.unwrap()).collect().await;

        assert_eq!(frames, vec!["first", "second", "third"]);

        let received = server.await.unwrap();
        assert!(
            received.iter().all(Message::is_close),
            "client sent data frames: {:?}",
            received
        );
    }

    #[tokio::test]
    async fn test_dropped_transport_ends_stream() {
        let (endpoint, server) = serve(vec![Message::Text("only".to_string())], false).await;

        let mut stream = WsConnector.connect(&endpoint).await.unwrap();
        server.await.unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap(), "only");
        assert!(!matches!(stream.next().await, Some(Ok(_))));
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = Url::parse(&format!("ws://{}/", addr)).unwrap();
        let result = WsConnector.connect(&endpoint).await;
        assert!(matches!(result, Err(StreamError::Connect(_))));
    }
}
