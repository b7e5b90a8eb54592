//! Error types for chatterbox

use thiserror::Error;

/// Result type alias for chatterbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in chatterbox
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credential, bad settings file)
    #[error("configuration error: {0}")]
    Config(String),

    /// Speech capture is unavailable on this machine (no input device).
    /// Starting a session stays disabled for the lifetime of the process.
    #[error("speech capture unsupported: {0}")]
    Unsupported(String),

    /// Capture device failure (busy, permission denied). Recoverable by retry.
    #[error("capture error: {0}")]
    Capture(String),

    /// Audio decode or playback error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Remote API returned a non-2xx response
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
