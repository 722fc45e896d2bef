use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum KonspektError {
    #[error("Transcription failed for {media_path}: {reason}")]
    TranscriptionFailed { media_path: PathBuf, reason: String },

    #[error("Audio extraction failed for {media_path}: {reason}")]
    AudioExtractionFailed { media_path: PathBuf, reason: String },

    #[error("Unsupported media type: {path}")]
    UnsupportedMedia { path: PathBuf },

    #[error("Keyword must not be empty")]
    EmptyKeyword,

    #[error("Transcript not found: {id}")]
    TranscriptNotFound { id: Uuid },

    #[error("Text generation failed: {reason}")]
    GenerationFailed { reason: String },

    #[error("Summarization failed at {stage}: {reason}")]
    SummarizationFailed { stage: &'static str, reason: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, KonspektError>;
