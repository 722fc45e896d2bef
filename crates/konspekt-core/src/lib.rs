//! Konspekt Core Library
//!
//! Core functionality for transcribing lecture videos with Whisper, persisting
//! timestamped transcripts, and querying them with AI-assisted keyword search.

pub mod codec;
pub mod correlate;
pub mod digest;
pub mod error;
pub mod provider;
pub mod service;
pub mod store;
pub mod transcribe;
pub mod types;

// Re-export commonly used items at crate root
pub use codec::{decode, encode};
pub use correlate::correlate;
pub use digest::summarize;
pub use error::{KonspektError, Result};
pub use provider::{Provider, ProviderConfig, TextGenerator};
pub use service::{IngestResponse, QueryResponse, Service};
pub use store::{default_store_root, load_transcript, save_transcript, transcript_path};
pub use transcribe::{Transcriber, WhisperTranscriber, extract_audio};
pub use types::{CorrelationResult, Digest, Segment, Transcript};
