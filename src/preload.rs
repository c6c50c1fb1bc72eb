//! Custom voice preload over HTTP.
//!
//! Custom cloned voices must be preloaded before they are usable as a TTS
//! speaker. This is a single request/response round trip, independent of the
//! WebSocket sessions.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::Error;

#[derive(Debug, Serialize)]
struct PreloadRequest<'a> {
    voice_id: &'a str,
}

/// Preloads a custom cloned voice.
///
/// Sends `POST {base_url}/v2/tts/voices/custom/preload` with the API key in
/// the `X-Api-Key` header. Returns the parsed JSON response body on success;
/// a non-2xx status maps to [`Error::PreloadFailed`] carrying the status code.
pub async fn preload_custom_voice(
    base_url: &str,
    api_key: &str,
    voice_id: &str,
) -> Result<Value, Error> {
    let url = format!("{base_url}/v2/tts/voices/custom/preload");

    let response = reqwest::Client::new()
        .post(&url)
        .header("X-Api-Key", api_key)
        .json(&PreloadRequest { voice_id })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::PreloadFailed { status });
    }

    let body: Value = response.json().await?;
    info!(voice_id = %voice_id, "Custom voice preloaded");
    Ok(body)
}
