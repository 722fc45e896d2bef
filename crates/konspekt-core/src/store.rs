use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::{
    codec,
    error::{KonspektError, Result},
    types::Transcript,
};

/// Default root directory for persisted transcripts
pub fn default_store_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("konspekt")
}

/// Path of the transcript artifact for a given identifier
pub fn transcript_path(store_root: &Path, id: Uuid) -> PathBuf {
    store_root.join(id.to_string()).join("transcript.txt")
}

/// Persist a transcript under the store root
pub async fn save_transcript(store_root: &Path, transcript: &Transcript) -> Result<PathBuf> {
    let path = transcript_path(store_root, transcript.id);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }
    fs::write(&path, codec::encode(&transcript.segments)).await?;
    Ok(path)
}

/// Reload a persisted transcript. A missing or unreadable artifact surfaces
/// as not-found.
pub async fn load_transcript(store_root: &Path, id: Uuid) -> Result<Transcript> {
    let path = transcript_path(store_root, id);
    let blob = fs::read_to_string(&path)
        .await
        .map_err(|_| KonspektError::TranscriptNotFound { id })?;

    Ok(Transcript {
        id,
        segments: codec::decode(&blob),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Segment;

    fn scratch_root() -> PathBuf {
        std::env::temp_dir().join(format!("konspekt-store-test-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let root = scratch_root();
        let transcript = Transcript {
            id: Uuid::new_v4(),
            segments: vec![
                Segment::new(0.0, 2.5, "the cat sat"),
                Segment::new(2.5, 5.0, "dogs bark loudly"),
            ],
        };

        save_transcript(&root, &transcript).await.unwrap();
        let loaded = load_transcript(&root, transcript.id).await.unwrap();

        assert_eq!(loaded.id, transcript.id);
        assert_eq!(loaded.segments, transcript.segments);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn missing_transcript_is_not_found() {
        let root = scratch_root();
        let id = Uuid::new_v4();
        let err = load_transcript(&root, id).await.unwrap_err();
        assert!(matches!(
            err,
            KonspektError::TranscriptNotFound { id: missing } if missing == id
        ));
    }
}
