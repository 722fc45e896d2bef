use std::sync::LazyLock;

use regex::Regex;

use crate::types::Segment;

static SEGMENT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+?) --> (.+?)\] (.+)").unwrap());

/// Encode segments as the persisted transcript blob: one
/// `[<start> --> <end>] <text>` line per segment, newline-terminated.
/// Segment text must not contain a literal newline; ingest normalizes
/// before persisting.
pub fn encode(segments: &[Segment]) -> String {
    let mut blob = String::new();
    for seg in segments {
        blob.push_str(&seg.timestamp());
        blob.push(' ');
        blob.push_str(&seg.text);
        blob.push('\n');
    }
    blob
}

/// Decode a persisted transcript blob back into its segment sequence.
///
/// Lines that do not match the segment pattern, or whose captured times do
/// not parse as floats, are silently skipped so a partially corrupt or
/// hand-edited transcript still loads. The timestamp rendering is
/// regenerated from the parsed offsets, never taken from the line verbatim.
pub fn decode(blob: &str) -> Vec<Segment> {
    blob.lines()
        .filter_map(|line| {
            let caps = SEGMENT_LINE.captures(line)?;
            let start: f64 = caps[1].parse().ok()?;
            let end: f64 = caps[2].parse().ok()?;
            Some(Segment::new(start, end, &caps[3]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_segments() -> Vec<Segment> {
        vec![
            Segment::new(0.0, 2.5, "the cat sat"),
            Segment::new(2.5, 5.0, "dogs bark loudly"),
        ]
    }

    #[test]
    fn encode_is_one_line_per_segment() {
        let blob = encode(&sample_segments());
        assert_eq!(
            blob,
            "[0.00 --> 2.50] the cat sat\n[2.50 --> 5.00] dogs bark loudly\n"
        );
    }

    #[test]
    fn round_trip_preserves_offsets_and_text() {
        let segments = sample_segments();
        assert_eq!(decode(&encode(&segments)), segments);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let blob = "[0.00 --> 2.50] the cat sat\nnot a segment line\n[2.50 --> 5.00] dogs bark loudly\n";
        let segments = decode(blob);
        assert_eq!(segments, sample_segments());
    }

    #[test]
    fn unparseable_times_are_skipped() {
        let blob = "[zero --> 2.50] broken times\n[1.00 --> 2.00] fine\n";
        let segments = decode(blob);
        assert_eq!(segments, vec![Segment::new(1.0, 2.0, "fine")]);
    }

    #[test]
    fn empty_blob_decodes_to_nothing() {
        assert!(decode("").is_empty());
    }
}
