use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::{
    correlate::correlate,
    digest::summarize,
    error::{KonspektError, Result},
    provider::TextGenerator,
    store,
    transcribe::Transcriber,
    types::{CorrelationResult, Digest, Segment, Transcript},
};

/// Media containers accepted for ingest
const ALLOWED_EXTENSIONS: [&str; 5] = ["mp4", "avi", "mov", "mkv", "wmv"];

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub transcript_id: Uuid,
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub correlation: CorrelationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_error: Option<String>,
}

/// Transport-agnostic request surface over the core: ingest a video once,
/// query its persisted transcript any number of times.
pub struct Service<G> {
    store_root: PathBuf,
    generator: G,
}

impl<G: TextGenerator> Service<G> {
    pub fn new(store_root: impl Into<PathBuf>, generator: G) -> Self {
        Self {
            store_root: store_root.into(),
            generator,
        }
    }

    /// Transcribe a video, persist the transcript under a fresh identifier,
    /// and compute its digest. Transcription failures abort the request;
    /// a digest failure only fills `digest_error` since the transcript is
    /// already durable by then.
    pub async fn ingest(
        &self,
        media: &Path,
        language: Option<&str>,
        transcriber: &dyn Transcriber,
    ) -> Result<IngestResponse> {
        if !is_supported_media(media) {
            return Err(KonspektError::UnsupportedMedia {
                path: media.to_path_buf(),
            });
        }

        let segments = transcriber.transcribe(media, language).await?;
        // The codec is line-oriented, so segment text must stay single-line.
        let segments = segments
            .into_iter()
            .map(|seg| Segment {
                text: normalize_line(&seg.text),
                ..seg
            })
            .collect();

        let transcript = Transcript {
            id: Uuid::new_v4(),
            segments,
        };
        store::save_transcript(&self.store_root, &transcript).await?;

        let (digest, digest_error) =
            split_digest(summarize(&transcript.full_text(), None, &self.generator).await);

        Ok(IngestResponse {
            transcript_id: transcript.id,
            segments: transcript.segments,
            digest,
            digest_error,
        })
    }

    /// Reload a persisted transcript and correlate it with a keyword. The
    /// digest is recomputed per request, keyword-aware, and its failure is
    /// reported alongside the correlation rather than replacing it.
    pub async fn query(&self, id: Uuid, keyword: &str) -> Result<QueryResponse> {
        if keyword.trim().is_empty() {
            return Err(KonspektError::EmptyKeyword);
        }

        let transcript = store::load_transcript(&self.store_root, id).await?;
        let correlation = correlate(&transcript.segments, keyword, &self.generator).await;
        let (digest, digest_error) = split_digest(
            summarize(&transcript.full_text(), Some(keyword), &self.generator).await,
        );

        Ok(QueryResponse {
            correlation,
            digest,
            digest_error,
        })
    }
}

fn split_digest(outcome: Result<Digest>) -> (Option<Digest>, Option<String>) {
    match outcome {
        Ok(digest) => (Some(digest), None),
        Err(e) => (None, Some(e.to_string())),
    }
}

fn is_supported_media(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

fn normalize_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FakeGenerator {
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            if self.fail {
                return Err(KonspektError::GenerationFailed {
                    reason: "scripted failure".to_string(),
                });
            }
            // Correlation prompts get an index list, digest prompts a summary.
            if prompt.starts_with("Keyword:") {
                Ok("none".to_string())
            } else {
                Ok("- point one\nKeyWords: cats".to_string())
            }
        }
    }

    struct FakeTranscriber {
        segments: Vec<Segment>,
    }

    #[async_trait]
    impl Transcriber for FakeTranscriber {
        async fn transcribe(&self, _media: &Path, _language: Option<&str>) -> Result<Vec<Segment>> {
            Ok(self.segments.clone())
        }
    }

    fn scratch_root() -> PathBuf {
        std::env::temp_dir().join(format!("konspekt-service-test-{}", Uuid::new_v4()))
    }

    fn sample_segments() -> Vec<Segment> {
        vec![
            Segment::new(0.0, 2.5, "the cat sat"),
            Segment::new(2.5, 5.0, "dogs bark loudly"),
        ]
    }

    #[tokio::test]
    async fn ingest_rejects_unsupported_media() {
        let service = Service::new(scratch_root(), FakeGenerator { fail: false });
        let transcriber = FakeTranscriber { segments: vec![] };
        let err = service
            .ingest(Path::new("notes.txt"), None, &transcriber)
            .await
            .unwrap_err();
        assert!(matches!(err, KonspektError::UnsupportedMedia { .. }));
    }

    #[tokio::test]
    async fn ingest_then_query_round_trips() {
        let root = scratch_root();
        let service = Service::new(&root, FakeGenerator { fail: false });
        let transcriber = FakeTranscriber {
            segments: sample_segments(),
        };

        let ingest = service
            .ingest(Path::new("lecture.mp4"), Some("en"), &transcriber)
            .await
            .unwrap();
        assert_eq!(ingest.segments, sample_segments());
        assert_eq!(ingest.digest.unwrap().keywords, vec!["cats"]);
        assert!(ingest.digest_error.is_none());

        let query = service.query(ingest.transcript_id, "cat").await.unwrap();
        assert_eq!(
            query.correlation.explicit,
            vec![Segment::new(0.0, 2.5, "the cat sat")]
        );
        assert!(query.correlation.related.is_empty());
        assert!(query.digest.is_some());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn ingest_normalizes_newlines_in_segment_text() {
        let root = scratch_root();
        let service = Service::new(&root, FakeGenerator { fail: false });
        let transcriber = FakeTranscriber {
            segments: vec![Segment::new(0.0, 1.0, "line one\nline two")],
        };

        let ingest = service
            .ingest(Path::new("lecture.mp4"), None, &transcriber)
            .await
            .unwrap();
        assert_eq!(ingest.segments[0].text, "line one line two");

        // The persisted blob must reload to the same single segment.
        let query = service.query(ingest.transcript_id, "line").await.unwrap();
        assert_eq!(query.correlation.explicit.len(), 1);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn digest_failure_does_not_block_ingest() {
        let root = scratch_root();
        let service = Service::new(&root, FakeGenerator { fail: true });
        let transcriber = FakeTranscriber {
            segments: sample_segments(),
        };

        let ingest = service
            .ingest(Path::new("lecture.mp4"), None, &transcriber)
            .await
            .unwrap();
        assert_eq!(ingest.segments.len(), 2);
        assert!(ingest.digest.is_none());
        assert!(ingest.digest_error.is_some());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn query_failure_keeps_explicit_matches() {
        let root = scratch_root();
        let ingest_service = Service::new(&root, FakeGenerator { fail: false });
        let transcriber = FakeTranscriber {
            segments: sample_segments(),
        };
        let ingest = ingest_service
            .ingest(Path::new("lecture.mp4"), None, &transcriber)
            .await
            .unwrap();

        let broken_service = Service::new(&root, FakeGenerator { fail: true });
        let query = broken_service
            .query(ingest.transcript_id, "cat")
            .await
            .unwrap();
        assert_eq!(query.correlation.explicit.len(), 1);
        assert!(query.correlation.related.is_empty());
        assert!(query.digest.is_none());
        assert!(query.digest_error.is_some());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn query_rejects_empty_keyword() {
        let service = Service::new(scratch_root(), FakeGenerator { fail: false });
        let err = service.query(Uuid::new_v4(), "  ").await.unwrap_err();
        assert!(matches!(err, KonspektError::EmptyKeyword));
    }

    #[tokio::test]
    async fn query_unknown_id_is_not_found() {
        let service = Service::new(scratch_root(), FakeGenerator { fail: false });
        let err = service.query(Uuid::new_v4(), "cat").await.unwrap_err();
        assert!(matches!(err, KonspektError::TranscriptNotFound { .. }));
    }
}
