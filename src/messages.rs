//! Message types for the Hamsa realtime WebSocket protocol.

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// Outbound requests
// ============================================================================

/// STT request sent once per session.
#[derive(Debug, Clone, Serialize)]
pub struct SttRequest {
    /// The message type (always "stt").
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Request payload.
    pub payload: SttPayload,
}

impl SttRequest {
    /// Creates a new STT request.
    pub fn new(payload: SttPayload) -> Self {
        Self {
            msg_type: "stt".to_string(),
            payload,
        }
    }
}

/// STT request payload.
///
/// `audio_base64` and `audio_list` are mutually exclusive: one carries whole
/// file bytes, the other raw mono 16 kHz samples.
#[derive(Debug, Clone, Serialize)]
pub struct SttPayload {
    /// Base64-encoded audio file bytes.
    #[serde(rename = "audioBase64", skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
    /// Raw PCM samples.
    #[serde(rename = "audioList", skip_serializing_if = "Option::is_none")]
    pub audio_list: Option<Vec<f32>>,
    /// Language code.
    pub language: String,
    /// Whether end-of-speech detection is enabled.
    #[serde(rename = "isEosEnabled")]
    pub is_eos_enabled: bool,
    /// End-of-speech sensitivity, 0.0-1.0.
    #[serde(rename = "eosThreshold")]
    pub eos_threshold: f64,
}

/// TTS request sent once per session.
#[derive(Debug, Clone, Serialize)]
pub struct TtsRequest {
    /// The message type (always "tts").
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Request payload.
    pub payload: TtsPayload,
}

impl TtsRequest {
    /// Creates a new TTS request.
    pub fn new(payload: TtsPayload) -> Self {
        Self {
            msg_type: "tts".to_string(),
            payload,
        }
    }
}

/// TTS request payload.
#[derive(Debug, Clone, Serialize)]
pub struct TtsPayload {
    /// Text to synthesize. The server caps this at 2000 characters.
    pub text: String,
    /// Speaker name or custom voice UUID.
    pub speaker: String,
    /// Dialect variant.
    pub dialect: String,
    /// Language code.
    #[serde(rename = "languageId")]
    pub language_id: String,
    /// Whether to use mu-law encoding.
    pub mulaw: bool,
}

// ============================================================================
// Inbound frames
// ============================================================================

/// Control message kind, from the `type` discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    /// Request acknowledged.
    Ack,
    /// Informational message.
    Info,
    /// Remote-reported application error.
    Error,
    /// Terminal frame; the stream is complete.
    End,
    /// Any other (or missing) type discriminator.
    Unknown(String),
}

impl ControlKind {
    fn from_type(msg_type: &str) -> Self {
        match msg_type {
            "ack" => Self::Ack,
            "info" => Self::Info,
            "error" => Self::Error,
            "end" => Self::End,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// A parsed JSON control frame.
#[derive(Debug, Clone)]
pub struct ControlMessage {
    /// Message kind.
    pub kind: ControlKind,
    /// `payload.message`, when present. The server does not guarantee it.
    pub message: Option<String>,
    /// The full parsed object, for unrecognized shapes.
    pub raw: Value,
}

impl ControlMessage {
    /// Returns `payload.message` or an empty string.
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// An inbound frame, classified.
#[derive(Debug, Clone)]
pub enum Frame {
    /// Opaque audio bytes (TTS only).
    Binary(Vec<u8>),
    /// A JSON control frame.
    Control(ControlMessage),
    /// Text that is not valid JSON: a bare transcript string (STT).
    Transcript(String),
}

/// Classifies a text frame.
///
/// Valid JSON becomes a [`ControlMessage`]; anything else is a transcript
/// string, returned verbatim.
pub fn classify_text(text: &str) -> Frame {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return Frame::Transcript(text.to_string()),
    };

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .map(ControlKind::from_type)
        .unwrap_or_else(|| ControlKind::Unknown(String::new()));

    let message = value
        .get("payload")
        .and_then(|p| p.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Frame::Control(ControlMessage {
        kind,
        message,
        raw: value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stt_request_wire_format() {
        let request = SttRequest::new(SttPayload {
            audio_base64: Some("QUJDRA==".to_string()),
            audio_list: None,
            language: "ar".to_string(),
            is_eos_enabled: true,
            eos_threshold: 0.3,
        });
        let json: Value = serde_json::to_value(&request).unwrap();

        assert_eq!(json["type"], "stt");
        assert_eq!(json["payload"]["audioBase64"], "QUJDRA==");
        assert_eq!(json["payload"]["language"], "ar");
        assert_eq!(json["payload"]["isEosEnabled"], true);
        assert_eq!(json["payload"]["eosThreshold"], 0.3);
        // Unused variant must be omitted, not null
        assert!(json["payload"].get("audioList").is_none());
    }

    #[test]
    fn stt_request_sample_variant() {
        let request = SttRequest::new(SttPayload {
            audio_base64: None,
            audio_list: Some(vec![0.0, 0.5, -0.5]),
            language: "en".to_string(),
            is_eos_enabled: false,
            eos_threshold: 0.3,
        });
        let json: Value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json["payload"]["audioList"],
            serde_json::json!([0.0, 0.5, -0.5])
        );
        assert!(json["payload"].get("audioBase64").is_none());
    }

    #[test]
    fn tts_request_wire_format() {
        let request = TtsRequest::new(TtsPayload {
            text: "مرحبا".to_string(),
            speaker: "default".to_string(),
            dialect: "modern".to_string(),
            language_id: "ar".to_string(),
            mulaw: false,
        });
        let json: Value = serde_json::to_value(&request).unwrap();

        assert_eq!(json["type"], "tts");
        assert_eq!(json["payload"]["text"], "مرحبا");
        assert_eq!(json["payload"]["speaker"], "default");
        assert_eq!(json["payload"]["dialect"], "modern");
        assert_eq!(json["payload"]["languageId"], "ar");
        assert_eq!(json["payload"]["mulaw"], false);
    }

    #[test]
    fn non_json_text_is_verbatim_transcript() {
        let frame = classify_text("هذا نص منسوخ");
        match frame {
            Frame::Transcript(text) => assert_eq!(text, "هذا نص منسوخ"),
            other => panic!("expected transcript, got {other:?}"),
        }
    }

    #[test]
    fn error_frame_carries_message() {
        let frame = classify_text(r#"{"type":"error","payload":{"message":"bad audio"}}"#);
        match frame {
            Frame::Control(msg) => {
                assert_eq!(msg.kind, ControlKind::Error);
                assert_eq!(msg.message.as_deref(), Some("bad audio"));
            }
            other => panic!("expected control, got {other:?}"),
        }
    }

    #[test]
    fn end_ack_info_kinds() {
        for (text, kind) in [
            (
                r#"{"type":"end","payload":{"message":"done"}}"#,
                ControlKind::End,
            ),
            (
                r#"{"type":"ack","payload":{"message":"ok"}}"#,
                ControlKind::Ack,
            ),
            (
                r#"{"type":"info","payload":{"message":"hi"}}"#,
                ControlKind::Info,
            ),
        ] {
            match classify_text(text) {
                Frame::Control(msg) => assert_eq!(msg.kind, kind),
                other => panic!("expected control, got {other:?}"),
            }
        }
    }

    #[test]
    fn unrecognized_type_keeps_raw_value() {
        let frame = classify_text(r#"{"type":"progress","payload":{"pct":40}}"#);
        match frame {
            Frame::Control(msg) => {
                assert_eq!(msg.kind, ControlKind::Unknown("progress".to_string()));
                assert!(msg.message.is_none());
                assert_eq!(msg.raw["payload"]["pct"], 40);
            }
            other => panic!("expected control, got {other:?}"),
        }
    }

    #[test]
    fn json_without_type_is_unknown() {
        let frame = classify_text(r#"{"status":"ok"}"#);
        match frame {
            Frame::Control(msg) => {
                assert_eq!(msg.kind, ControlKind::Unknown(String::new()));
                assert_eq!(msg.raw["status"], "ok");
            }
            other => panic!("expected control, got {other:?}"),
        }
    }

    #[test]
    fn missing_payload_message_is_none() {
        let frame = classify_text(r#"{"type":"end"}"#);
        match frame {
            Frame::Control(msg) => {
                assert_eq!(msg.kind, ControlKind::End);
                assert!(msg.message.is_none());
                assert_eq!(msg.message_or_default(), "");
            }
            other => panic!("expected control, got {other:?}"),
        }
    }
}
