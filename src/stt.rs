//! Speech-to-text client for the Hamsa realtime API.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};

use crate::error::Error;
use crate::messages::{classify_text, ControlKind, Frame, SttPayload, SttRequest};
use crate::ws::WebSocket;

/// Events emitted by the STT client.
#[derive(Debug, Clone)]
pub enum SttEvent {
    /// A transcription result (a bare text frame from the server).
    Transcript(String),
    /// Informational message from the server.
    Info(String),
    /// Remote-reported error. The session stays open.
    Error(String),
    /// Any other JSON frame, surfaced whole.
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

/// Configuration for the STT client.
#[derive(Debug, Clone)]
pub struct SttConfig {
    /// WebSocket endpoint URL.
    pub endpoint: String,
    /// API key for authentication.
    pub api_key: String,
    /// Language code (default: "ar").
    pub language: String,
    /// Whether end-of-speech detection is enabled (default: true).
    pub is_eos_enabled: bool,
    /// End-of-speech sensitivity, 0.0-1.0 (default: 0.3).
    pub eos_threshold: f64,
}

impl SttConfig {
    /// Creates a new STT configuration with default recognition options.
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            endpoint,
            api_key,
            language: "ar".to_string(),
            is_eos_enabled: true,
            eos_threshold: 0.3,
        }
    }
}

/// Speech-to-text client.
///
/// Each `transcribe_*` call opens a fresh session: one connection, one
/// request, then a stream of events pulled with [`SttClient::next_event`]
/// until the server closes.
pub struct SttClient {
    config: SttConfig,
    conn: RwLock<Option<Arc<WebSocket>>>,
    session_id: String,
}

impl SttClient {
    /// Creates a new STT client with the given configuration.
    pub fn new(config: SttConfig) -> Self {
        Self {
            config,
            conn: RwLock::new(None),
            session_id: uuid::Uuid::new_v4().to_string()[..8].to_string(),
        }
    }

    /// Reads an audio file whole, base64-encodes it, and sends it for
    /// transcription over a new session.
    pub async fn transcribe_file(&self, path: &Path) -> Result<(), Error> {
        let bytes = tokio::fs::read(path).await?;
        let audio_base64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
        info!(
            session_id = %self.session_id,
            path = %path.display(),
            bytes = bytes.len(),
            "STT sending audio file"
        );
        self.send_request(SttPayload {
            audio_base64: Some(audio_base64),
            audio_list: None,
            language: self.config.language.clone(),
            is_eos_enabled: self.config.is_eos_enabled,
            eos_threshold: self.config.eos_threshold,
        })
        .await
    }

    /// Sends raw mono 16 kHz samples for transcription over a new session.
    pub async fn transcribe_samples(&self, samples: &[f32]) -> Result<(), Error> {
        info!(
            session_id = %self.session_id,
            samples = samples.len(),
            "STT sending raw samples"
        );
        self.send_request(SttPayload {
            audio_base64: None,
            audio_list: Some(samples.to_vec()),
            language: self.config.language.clone(),
            is_eos_enabled: self.config.is_eos_enabled,
            eos_threshold: self.config.eos_threshold,
        })
        .await
    }

    async fn send_request(&self, payload: SttPayload) -> Result<(), Error> {
        let conn = WebSocket::connect(&self.config.endpoint, &self.config.api_key).await?;
        let conn = Arc::new(conn);
        *self.conn.write().await = Some(Arc::clone(&conn));

        let json = serde_json::to_string(&SttRequest::new(payload))?;
        conn.send_text(&json).await?;

        info!(session_id = %self.session_id, "STT request sent, waiting for transcription");
        Ok(())
    }

    /// Pulls the next event from the session.
    pub async fn next_event(&self) -> Result<SttEvent, Error> {
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
                    debug!("STT received raw frame");
                }
                Some(msg) => break msg,
                None => {
                    debug!(session_id = %self.session_id, "STT stream ended");
                    return Ok(SttEvent::Closed {
                        code: None,
                        reason: String::new(),
                    });
                }
            }
        };

        let text = match msg {
            Message::Text(t) => t,
            Message::Binary(b) => String::from_utf8_lossy(&b).into_owned(),
            Message::Ping(data) => {
                debug!("STT received ping, sending pong");
                let _ = conn.send_pong(data).await;
                return Ok(SttEvent::Ping);
            }
            Message::Pong(_) => {
                debug!("STT received pong");
                return Ok(SttEvent::Pong);
            }
            Message::Close(frame) => {
                let (code, reason) = match frame {
                    Some(f) => (Some(u16::from(f.code)), f.reason.into_owned()),
                    None => (None, String::new()),
                };
                info!(session_id = %self.session_id, code = ?code, reason = %reason, "STT connection closed");
                return Ok(SttEvent::Closed { code, reason });
            }
            Message::Frame(_) => unreachable!("raw frames are skipped above"),
        };

        match classify_text(&text) {
            Frame::Transcript(transcript) => {
                debug!(session_id = %self.session_id, "STT transcription received");
                Ok(SttEvent::Transcript(transcript))
            }
            Frame::Control(ctrl) => match ctrl.kind {
                ControlKind::Error => {
                    error!(message = %ctrl.message_or_default(), "STT error");
                    Ok(SttEvent::Error(ctrl.message.unwrap_or_default()))
                }
                ControlKind::Info => {
                    info!(message = %ctrl.message_or_default(), "STT info");
                    Ok(SttEvent::Info(ctrl.message.unwrap_or_default()))
                }
                _ => {
                    debug!(raw = %ctrl.raw, "STT message");
                    Ok(SttEvent::Message(ctrl.raw))
                }
            },
            Frame::Binary(_) => unreachable!("binary frames are converted to text above"),
        }
    }

    /// Closes the session client-side. Idempotent.
    pub async fn shutdown(&self) {
        info!(session_id = %self.session_id, "STT shutting down");
        if let Some(conn) = self.conn.write().await.take() {
            let _ = conn.close().await;
        }
    }
}
