//! Text-to-speech client for the Hamsa realtime API.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::messages::{classify_text, ControlKind, Frame, TtsPayload, TtsRequest};
use crate::ws::WebSocket;

/// Server-side limit on the length of a synthesis request.
pub const TTS_MAX_TEXT_LEN: usize = 2000;

/// Events emitted by the TTS client.
#[derive(Debug, Clone)]
pub enum TtsEvent {
    /// An audio chunk, verbatim bytes.
    Audio(Vec<u8>),
    /// Request acknowledged.
    Ack(String),
    /// Informational message from the server.
    Info(String),
    /// Remote-reported error. The session stays open.
    Error(String),
    /// Terminal frame; all audio has been streamed.
    End(String),
    /// Any other text frame, surfaced whole.
    Message(Value),
    /// Keepalive ping (answered automatically).
    Ping,
    /// Keepalive pong.
    Pong,
    /// The server closed the connection.
    Closed {
        /// Close code, if a close frame was received.
        code: Option<u16>,
        /// Close reason, if any.
        reason: String,
    },
}

/// Configuration for the TTS client.
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// WebSocket endpoint URL.
    pub endpoint: String,
    /// API key for authentication.
    pub api_key: String,
    /// Speaker name or custom voice UUID (default: "default").
    pub speaker: String,
    /// Dialect variant (default: "modern").
    pub dialect: String,
    /// Language code (default: "ar").
    pub language_id: String,
    /// Whether to use mu-law encoding (default: false).
    pub mulaw: bool,
}

impl TtsConfig {
    /// Creates a new TTS configuration with default voice options.
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            endpoint,
            api_key,
            speaker: "default".to_string(),
            dialect: "modern".to_string(),
            language_id: "ar".to_string(),
            mulaw: false,
        }
    }
}

/// Audio accumulator for one session.
///
/// Chunks are appended in arrival order and flushed at most once: a stray
/// second `end` frame cannot rewrite the output.
#[derive(Debug, Default)]
struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    flushed: bool,
}

impl ChunkBuffer {
    fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, chunk: Vec<u8>) {
        self.chunks.push(chunk);
    }

    /// Concatenates all chunks in arrival order.
    ///
    /// Returns `None` if no chunk was received or the buffer was already
    /// flushed.
    fn flush_once(&mut self) -> Option<Vec<u8>> {
        if self.flushed || self.chunks.is_empty() {
            return None;
        }
        self.flushed = true;
        Some(self.chunks.concat())
    }
}

/// Text-to-speech client.
///
/// Each [`TtsClient::synthesize`] call opens a fresh session: one connection,
/// one request, then interleaved audio and control frames pulled with
/// [`TtsClient::next_event`] until the `end` frame.
pub struct TtsClient {
    config: TtsConfig,
    conn: RwLock<Option<Arc<WebSocket>>>,
    session_id: String,
}

impl TtsClient {
    /// Creates a new TTS client with the given configuration.
    pub fn new(config: TtsConfig) -> Self {
        Self {
            config,
            conn: RwLock::new(None),
            session_id: uuid::Uuid::new_v4().to_string()[..8].to_string(),
        }
    }

    /// Opens a new session and sends one synthesis request.
    pub async fn synthesize(&self, text: &str) -> Result<(), Error> {
        if text.chars().count() > TTS_MAX_TEXT_LEN {
            // Not enforced client-side; the server rejects with an error frame.
            warn!(
                len = text.chars().count(),
                max = TTS_MAX_TEXT_LEN,
                "TTS text exceeds the server limit"
            );
        }

        let conn = WebSocket::connect(&self.config.endpoint, &self.config.api_key).await?;
        let conn = Arc::new(conn);
        *self.conn.write().await = Some(Arc::clone(&conn));

        let request = TtsRequest::new(TtsPayload {
            text: text.to_string(),
            speaker: self.config.speaker.clone(),
            dialect: self.config.dialect.clone(),
            language_id: self.config.language_id.clone(),
            mulaw: self.config.mulaw,
        });
        let json = serde_json::to_string(&request)?;
        conn.send_text(&json).await?;

        info!(session_id = %self.session_id, "TTS request sent, streaming audio");
        Ok(())
    }

    /// Pulls the next event from the session.
    pub async fn next_event(&self) -> Result<TtsEvent, Error> {
        let conn = self
            .conn
            .read()
            .await
            .as_ref()
            .cloned()
            .ok_or(Error::NotConnected)?;

        let msg = loop {
            match conn.recv().await? {
                Some(Message::Frame(_)) => {
                    debug!("TTS received raw frame");
                }
                Some(msg) => break msg,
                None => {
                    debug!(session_id = %self.session_id, "TTS stream ended");
                    return Ok(TtsEvent::Closed {
                        code: None,
                        reason: String::new(),
                    });
                }
            }
        };

        let text = match msg {
            Message::Binary(chunk) => {
                debug!(len = chunk.len(), "TTS audio chunk received");
                return Ok(TtsEvent::Audio(chunk));
            }
            Message::Text(t) => t,
            Message::Ping(data) => {
                debug!("TTS received ping, sending pong");
                let _ = conn.send_pong(data).await;
                return Ok(TtsEvent::Ping);
            }
            Message::Pong(_) => {
                debug!("TTS received pong");
                return Ok(TtsEvent::Pong);
            }
            Message::Close(frame) => {
                let (code, reason) = match frame {
                    Some(f) => (Some(u16::from(f.code)), f.reason.into_owned()),
                    None => (None, String::new()),
                };
                info!(session_id = %self.session_id, code = ?code, reason = %reason, "TTS connection closed");
                return Ok(TtsEvent::Closed { code, reason });
            }
            Message::Frame(_) => unreachable!("raw frames are skipped above"),
        };

        match classify_text(&text) {
            Frame::Control(ctrl) => match ctrl.kind {
                ControlKind::Ack => {
                    info!(message = %ctrl.message_or_default(), "TTS acknowledged");
                    Ok(TtsEvent::Ack(ctrl.message.unwrap_or_default()))
                }
                ControlKind::Info => {
                    info!(message = %ctrl.message_or_default(), "TTS info");
                    Ok(TtsEvent::Info(ctrl.message.unwrap_or_default()))
                }
                ControlKind::Error => {
                    error!(message = %ctrl.message_or_default(), "TTS error");
                    Ok(TtsEvent::Error(ctrl.message.unwrap_or_default()))
                }
                ControlKind::End => {
                    info!(message = %ctrl.message_or_default(), "TTS stream complete");
                    Ok(TtsEvent::End(ctrl.message.unwrap_or_default()))
                }
                ControlKind::Unknown(_) => {
                    debug!(raw = %ctrl.raw, "TTS message");
                    Ok(TtsEvent::Message(ctrl.raw))
                }
            },
            Frame::Transcript(raw) => {
                debug!(raw = %raw, "TTS raw message");
                Ok(TtsEvent::Message(Value::String(raw)))
            }
            Frame::Binary(_) => unreachable!("binary frames are handled above"),
        }
    }

    /// Runs a full synthesis session and writes the streamed audio to `out`.
    ///
    /// Audio chunks are buffered in arrival order. When the `end` frame
    /// arrives the chunks are concatenated and written as one file, the
    /// session is closed client-side, and the number of bytes written is
    /// returned. Returns `None` when no audio arrived (nothing is written),
    /// including when the server closes before sending `end`.
    pub async fn synthesize_to_file(&self, text: &str, out: &Path) -> Result<Option<u64>, Error> {
        self.synthesize(text).await?;

        let mut buffer = ChunkBuffer::new();
        loop {
            match self.next_event().await? {
                TtsEvent::Audio(chunk) => buffer.push(chunk),
                TtsEvent::Ack(_) | TtsEvent::Info(_) => {}
                TtsEvent::Error(_) => {
                    // Remote errors do not close the session; keep draining.
                }
                TtsEvent::Message(_) | TtsEvent::Ping | TtsEvent::Pong => {}
                TtsEvent::End(_) => {
                    let written = match buffer.flush_once() {
                        Some(audio) => {
                            tokio::fs::write(out, &audio).await?;
                            info!(
                                path = %out.display(),
                                bytes = audio.len(),
                                "TTS audio saved"
                            );
                            Some(audio.len() as u64)
                        }
                        None => {
                            warn!("TTS stream ended without audio, nothing written");
                            None
                        }
                    };
                    self.shutdown().await;
                    return Ok(written);
                }
                TtsEvent::Closed { code, reason } => {
                    warn!(code = ?code, reason = %reason, "TTS connection closed before end frame");
                    return Ok(None);
                }
            }
        }
    }

    /// Closes the session client-side. Idempotent.
    pub async fn shutdown(&self) {
        info!(session_id = %self.session_id, "TTS shutting down");
        if let Some(conn) = self.conn.write().await.take() {
            let _ = conn.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_concatenate_in_arrival_order() {
        let mut buffer = ChunkBuffer::new();
        buffer.push(b"AB".to_vec());
        buffer.push(b"CD".to_vec());

        let audio = buffer.flush_once().expect("audio expected");
        assert_eq!(audio, b"ABCD");
    }

    #[test]
    fn empty_buffer_flushes_nothing() {
        let mut buffer = ChunkBuffer::new();
        assert!(buffer.flush_once().is_none());
    }

    #[test]
    fn second_flush_is_a_no_op() {
        let mut buffer = ChunkBuffer::new();
        buffer.push(b"AB".to_vec());

        assert_eq!(buffer.flush_once().as_deref(), Some(b"AB".as_slice()));
        assert!(buffer.flush_once().is_none());

        // Even new chunks after the flush stay unwritten.
        buffer.push(b"CD".to_vec());
        assert!(buffer.flush_once().is_none());
    }

    #[test]
    fn single_chunk_passes_through_unmodified() {
        let mut buffer = ChunkBuffer::new();
        let chunk: Vec<u8> = (0u8..=255).collect();
        buffer.push(chunk.clone());

        assert_eq!(buffer.flush_once(), Some(chunk));
    }
}
