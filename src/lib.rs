//! Rust client library for the Hamsa realtime speech WebSocket API:
//! speech-to-text (STT) and text-to-speech (TTS), plus a custom-voice
//! preload helper over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use rust_hamsa::{TtsClient, TtsConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rust_hamsa::Error> {
//!     let mut config = TtsConfig::new(
//!         rust_hamsa::REALTIME_ENDPOINT.to_string(),
//!         std::env::var("HAMSA_API_KEY").expect("HAMSA_API_KEY not set"),
//!     );
//!     config.language_id = "ar".to_string();
//!
//!     let client = TtsClient::new(config);
//!     match client
//!         .synthesize_to_file("مرحبا بالعالم", std::path::Path::new("output.wav"))
//!         .await?
//!     {
//!         Some(bytes) => println!("Audio saved ({bytes} bytes)"),
//!         None => println!("No audio received"),
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod messages;
mod preload;
mod stt;
mod tts;
mod ws;

pub use error::Error;
pub use messages::*;
pub use preload::preload_custom_voice;
pub use stt::{SttClient, SttConfig, SttEvent};
pub use tts::{TtsClient, TtsConfig, TtsEvent, TTS_MAX_TEXT_LEN};

/// Default realtime WebSocket endpoint (STT and TTS).
pub const REALTIME_ENDPOINT: &str = "wss://api.tryhamsa.com/v1/realtime/ws";

/// Default HTTP API base URL (voice preload).
pub const API_BASE_URL: &str = "https://api.tryhamsa.com";
