use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{KonspektError, Result},
    provider::TextGenerator,
    types::Digest,
};

static KEYWORD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)KeyWords?:\s*(.+)").unwrap());

const MAX_KEYWORDS: usize = 15;

/// Derive a [`Digest`] from the full transcript text.
///
/// Three sequential collaborator calls: condensation, bulleted summary with
/// an embedded keyword list, and (only when a keyword is given) a study
/// guide. The pipeline is atomic: any failed call aborts the whole digest
/// with a single error naming the stage.
pub async fn summarize(
    transcript_text: &str,
    keyword: Option<&str>,
    generator: &dyn TextGenerator,
) -> Result<Digest> {
    let condensed_text = generator
        .generate(&format!(
            "Transcript:\n{transcript_text}\n\nSelect the most important sentences and keep timestamps."
        ))
        .await
        .map_err(|e| stage_error("condensation", e))?
        .trim()
        .to_string();

    let summary = generator
        .generate(&format!(
            "Transcript:\n{transcript_text}\n\nWrite bullet-point summary.\nAt the end add:\nKeyWords: word1, word2, phrase1"
        ))
        .await
        .map_err(|e| stage_error("summary", e))?
        .trim()
        .to_string();

    let keywords = extract_keywords(&summary);

    let study_guide = match keyword {
        Some(keyword) => Some(
            generator
                .generate(&format!(
                    "Create a study guide for \"{keyword}\" using this transcript:\n\n{transcript_text}\n\nUse headings and bullet points."
                ))
                .await
                .map_err(|e| stage_error("study guide", e))?
                .trim()
                .to_string(),
        ),
        None => None,
    };

    Ok(Digest {
        condensed_text,
        summary,
        keywords,
        study_guide,
    })
}

fn stage_error(stage: &'static str, source: KonspektError) -> KonspektError {
    KonspektError::SummarizationFailed {
        stage,
        reason: source.to_string(),
    }
}

/// Pull the `KeyWords: ...` marker line out of a summary reply.
///
/// The reply is untrusted free text: tokens are split on commas and
/// semicolons, trimmed, kept only when 1-3 words long, and capped at the
/// first fifteen survivors in order. A missing marker yields an empty list,
/// not an error.
pub fn extract_keywords(summary: &str) -> Vec<String> {
    let Some(caps) = KEYWORD_LINE.captures(summary) else {
        return Vec::new();
    };

    caps[1]
        .split([',', ';'])
        .map(str::trim)
        .filter(|token| {
            let words = token.split_whitespace().count();
            (1..=3).contains(&words)
        })
        .map(str::to_string)
        .take(MAX_KEYWORDS)
        .collect()
}
