//! WebSocket connection wrapper.

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use crate::error::Error;

const CONN_TIMEOUT: Duration = Duration::from_secs(10);
const RECV_TIMEOUT: Duration = Duration::from_secs(60);

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// WebSocket connection wrapper.
///
/// The API key travels as a query parameter on the endpoint URL.
pub struct WebSocket {
    write: Arc<Mutex<futures_util::stream::SplitSink<WsStream, Message>>>,
    read: Arc<Mutex<futures_util::stream::SplitStream<WsStream>>>,
}

impl WebSocket {
    /// Opens a new WebSocket connection to the given endpoint with the
    /// provided API key.
    pub async fn connect(endpoint: &str, api_key: &str) -> Result<Self, Error> {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        let url = format!("{endpoint}{sep}api_key={api_key}");

        info!(endpoint = %endpoint, "WebSocket connecting");

        let (ws_stream, _) = timeout(CONN_TIMEOUT, tokio_tungstenite::connect_async(url.as_str()))
            .await
            .map_err(|_| Error::ConnectionTimeout)?
            .map_err(Error::WebSocket)?;

        info!(endpoint = %endpoint, "WebSocket connected");

        let (write, read) = ws_stream.split();

        Ok(Self {
            write: Arc::new(Mutex::new(write)),
            read: Arc::new(Mutex::new(read)),
        })
    }

    /// Sends a text message.
    pub async fn send_text(&self, text: &str) -> Result<(), Error> {
        let mut writer = self.write.lock().await;
        writer
            .send(Message::Text(text.to_string()))
            .await
            .map_err(Error::WebSocket)
    }

    /// Sends a pong message.
    pub async fn send_pong(&self, data: Vec<u8>) -> Result<(), Error> {
        debug!("Sending pong");
        let mut writer = self.write.lock().await;
        writer
            .send(Message::Pong(data))
            .await
            .map_err(Error::WebSocket)
    }

    /// Receives the next message with a timeout.
    ///
    /// Returns `Ok(None)` when the stream ends without a close frame.
    pub async fn recv(&self) -> Result<Option<Message>, Error> {
        let mut reader = self.read.lock().await;
        match timeout(RECV_TIMEOUT, reader.next()).await {
            Ok(Some(Ok(msg))) => Ok(Some(msg)),
            Ok(Some(Err(e))) => Err(Error::WebSocket(e)),
            Ok(None) => Ok(None),
            Err(_) => Err(Error::RecvTimeout),
        }
    }

    /// Closes the WebSocket connection.
    pub async fn close(&self) -> Result<(), Error> {
        info!("WebSocket closing");
        let mut writer = self.write.lock().await;
        let _ = writer.send(Message::Close(None)).await;
        let _ = writer.close().await;
        info!("WebSocket closed");
        Ok(())
    }
}
