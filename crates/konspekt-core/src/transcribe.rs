use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use uuid::Uuid;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::{
    error::{KonspektError, Result},
    types::Segment,
};

/// Speech-to-text engine behind a narrow contract.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Produce the ordered segment sequence for a media file, each segment's
    /// text trimmed. An empty sequence is valid only when the engine itself
    /// reports zero segments; engine failures propagate as errors.
    async fn transcribe(&self, media: &Path, language: Option<&str>) -> Result<Vec<Segment>>;
}

/// Extract 16kHz mono PCM audio from a video using ffmpeg
pub async fn extract_audio(media_path: &Path, audio_path: &Path) -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(media_path)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg("-ar")
        .arg("16000")
        .arg("-ac")
        .arg("1")
        .arg(audio_path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(KonspektError::AudioExtractionFailed {
            media_path: media_path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}

/// Whisper-backed [`Transcriber`] running a local ggml model.
pub struct WhisperTranscriber {
    model_path: PathBuf,
}

impl WhisperTranscriber {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }

    fn run_model(&self, audio_path: &Path, language: Option<&str>) -> Result<Vec<Segment>> {
        let failed = |reason: String| KonspektError::TranscriptionFailed {
            media_path: audio_path.to_path_buf(),
            reason,
        };

        let mut reader = hound::WavReader::open(audio_path).map_err(|e| failed(e.to_string()))?;
        let samples: Vec<f32> = reader
            .samples::<i16>()
            .filter_map(|s| s.ok())
            .map(|s| s as f32 / i16::MAX as f32)
            .collect();

        let ctx_params = WhisperContextParameters::default();
        let model_path = self.model_path.to_string_lossy();
        let ctx = WhisperContext::new_with_params(&model_path, ctx_params)
            .map_err(|e| failed(format!("failed to load model: {e}")))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });
        if let Some(lang) = language {
            params.set_language(Some(lang));
        }

        let mut state = ctx
            .create_state()
            .map_err(|e| failed(format!("failed to create state: {e}")))?;
        state
            .full(params, &samples)
            .map_err(|e| failed(format!("failed to run model: {e}")))?;

        let mut segments = Vec::new();
        for segment in state.as_iter() {
            let Ok(text) = segment.to_str() else { continue };
            segments.push(Segment::new(
                segment.start_timestamp() as f64 / 100.0,
                segment.end_timestamp() as f64 / 100.0,
                text.trim(),
            ));
        }

        Ok(segments)
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, media: &Path, language: Option<&str>) -> Result<Vec<Segment>> {
        let audio_path = std::env::temp_dir().join(format!("konspekt-{}.wav", Uuid::new_v4()));
        extract_audio(media, &audio_path).await?;

        let segments = self.run_model(&audio_path, language);
        let _ = tokio::fs::remove_file(&audio_path).await;
        segments
    }
}
