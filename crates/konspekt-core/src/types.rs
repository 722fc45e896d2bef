use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One timestamped unit of transcribed speech. Segments are immutable once
/// created; `0 <= start < end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Canonical `[start --> end]` rendering with two decimal places.
    /// Always derived from the offsets so it cannot drift from them.
    pub fn timestamp(&self) -> String {
        format!("[{:.2} --> {:.2}]", self.start, self.end)
    }
}

/// An ordered, index-addressable sequence of segments keyed by an opaque
/// identifier. Created once at transcription time and reloaded read-only
/// for every later query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub id: Uuid,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Timestamped listing of the whole transcript, one segment per line.
    /// Used as LLM context for correlation and summarization.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|seg| format!("{} {}", seg.timestamp(), seg.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Outcome of a keyword search over a transcript. `explicit` is exactly the
/// deterministic substring-match set; `related` holds segments the semantic
/// pass judged connected without a verbatim mention. The two never share a
/// segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub explicit: Vec<Segment>,
    pub related: Vec<Segment>,
}

/// AI-derived study material for a transcript. Recomputed per request,
/// never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Digest {
    pub condensed_text: String,
    pub summary: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_guide: Option<String>,
}
