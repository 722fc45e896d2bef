use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::{
    error::Result,
    provider::TextGenerator,
    types::{CorrelationResult, Segment},
};

static INDEX_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Search a segment sequence for a keyword.
///
/// Explicit matches come from a case-insensitive substring scan. Related
/// segments come from a semantic pass through the text-generation
/// collaborator; if that pass fails it is logged and dropped, never taking
/// the explicit matches with it. An empty keyword matches every segment.
pub async fn correlate(
    segments: &[Segment],
    keyword: &str,
    generator: &dyn TextGenerator,
) -> CorrelationResult {
    let keyword_lower = keyword.to_lowercase();

    let mut explicit = Vec::new();
    let mut explicit_indices = Vec::new();
    for (idx, segment) in segments.iter().enumerate() {
        if segment.text.to_lowercase().contains(&keyword_lower) {
            explicit.push(segment.clone());
            explicit_indices.push(idx);
        }
    }

    let related = match find_related(segments, keyword, &explicit_indices, generator).await {
        Ok(related) => related,
        Err(e) => {
            warn!("semantic pass failed, returning explicit matches only: {e}");
            Vec::new()
        }
    };

    CorrelationResult { explicit, related }
}

async fn find_related(
    segments: &[Segment],
    keyword: &str,
    explicit_indices: &[usize],
    generator: &dyn TextGenerator,
) -> Result<Vec<Segment>> {
    let mut listing = String::new();
    for (idx, segment) in segments.iter().enumerate() {
        listing.push_str(&format!(
            "[{idx}] {}: {}\n",
            segment.timestamp(),
            segment.text
        ));
    }

    let mentioned = if explicit_indices.is_empty() {
        "none".to_string()
    } else {
        explicit_indices
            .iter()
            .map(|idx| idx.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let prompt = format!(
        r#"Keyword: "{keyword}"

Transcript segments:
{listing}
Explicit mentions already found: {mentioned}

Return ONLY a comma-separated list of segment numbers related to "{keyword}"
but that do NOT explicitly mention it. If none, return "none"."#
    );

    let reply = generator.generate(&prompt).await?;
    Ok(parse_related(&reply, explicit_indices, segments))
}

/// Extract related segments from the collaborator's free-text reply.
///
/// The reply is untrusted: every integer token is pulled out in order, and
/// anything out of range or already an explicit match is dropped. An index
/// repeated in the reply stays repeated in the result.
fn parse_related(reply: &str, explicit_indices: &[usize], segments: &[Segment]) -> Vec<Segment> {
    let reply = reply.trim().to_lowercase();
    if reply == "none" {
        return Vec::new();
    }

    INDEX_TOKEN
        .find_iter(&reply)
        .filter_map(|m| m.as_str().parse::<usize>().ok())
        .filter(|idx| !explicit_indices.contains(idx) && *idx < segments.len())
        .map(|idx| segments[idx].clone())
        .collect()
}
