//! Error types for the Hamsa client library.

use thiserror::Error;

/// Error type for Hamsa client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// WebSocket connection error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File or output I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection did not open within the timeout.
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// No frame arrived within the receive timeout.
    #[error("Receive timeout")]
    RecvTimeout,

    /// Operation attempted without an open session.
    #[error("Not connected")]
    NotConnected,

    /// Voice preload returned a non-success HTTP status.
    #[error("Preload failed: {status}")]
    PreloadFailed {
        /// HTTP status code returned by the preload endpoint.
        status: reqwest::StatusCode,
    },
}
