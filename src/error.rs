//! Error types for Vakt.

use thiserror::Error;

/// Library-level error type for Vakt operations.
#[derive(Error, Debug)]
pub enum VaktError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Channel monitoring failed: {0}")]
    Monitor(String),

    #[error("YouTube API error: {0}")]
    YouTubeApi(String),

    #[error("Transcript error: {0}")]
    Transcript(String),

    #[error("No transcript available for video: {0}")]
    NoTranscript(String),

    #[error("Summarization failed: {0}")]
    Summarize(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("State store error: {0}")]
    StateStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Vakt operations.
pub type Result<T> = std::result::Result<T, VaktError>;
