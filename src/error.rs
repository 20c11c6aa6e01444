//! Error types for Lumen Assist

use thiserror::Error;

/// Result type alias for Lumen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Lumen Assist
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid or incomplete request parameters
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Generation API error
    #[error("generation error: {0}")]
    Generation(String),

    /// Structured response did not match the requested schema
    #[error("malformed structured response: {0}")]
    Schema(String),

    /// Speech capture error
    #[error("speech capture error: {0}")]
    Capture(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Audio error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
