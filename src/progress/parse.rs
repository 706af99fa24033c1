//! Parsing of the extraction subprocess's line protocol
//!
//! Download progress arrives as pipe-separated template lines tagged with
//! [`PROGRESS_TAG`]; post-processing phases announce themselves with
//! bracketed tags like `[Merger]` on stdout.

use crate::extractor::ytdlp::PROGRESS_TAG;

/// One recognized stdout line
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// Byte-level transfer progress for the current media stream
    Transfer(RawTransfer),
    /// A post-processing step started (tag without brackets)
    Postprocess(String),
}

/// Raw transfer numbers as the library reports them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTransfer {
    pub downloaded_bytes: u64,
    pub total_bytes: Option<u64>,
    pub speed: Option<f64>,
}

/// Parse one stdout line; `None` for lines that carry neither
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();

    if let Some(fields) = line.strip_prefix(PROGRESS_TAG).and_then(|r| r.strip_prefix('|')) {
        return parse_transfer(fields).map(ParsedLine::Transfer);
    }

    if let Some(tag) = postprocess_tag(line) {
        return Some(ParsedLine::Postprocess(tag.to_string()));
    }

    None
}

/// Fields: downloaded_bytes | total_bytes | total_bytes_estimate | speed
fn parse_transfer(fields: &str) -> Option<RawTransfer> {
    let mut parts = fields.split('|');

    let downloaded = parse_numeric(parts.next()?)?;
    let total = parts.next().and_then(parse_numeric);
    let estimate = parts.next().and_then(parse_numeric);
    let speed = parts.next().and_then(parse_float);

    Some(RawTransfer {
        downloaded_bytes: downloaded,
        total_bytes: total.or(estimate),
        speed,
    })
}

/// The library prints "NA" for unknown numeric fields; integers may be
/// rendered with a trailing ".0"
fn parse_numeric(field: &str) -> Option<u64> {
    parse_float(field).map(|v| v.max(0.0) as u64)
}

fn parse_float(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() || field.eq_ignore_ascii_case("na") || field.eq_ignore_ascii_case("n/a") {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

const POSTPROCESS_TAGS: &[&str] = &[
    "Merger",
    "VideoConvertor",
    "SubtitlesConvertor",
    "ExtractAudio",
    "EmbedSubtitle",
    "EmbedThumbnail",
    "Metadata",
];

fn postprocess_tag(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    let tag = &rest[..end];

    if POSTPROCESS_TAGS.contains(&tag) || tag.starts_with("Fixup") {
        Some(tag)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // TRANSFER LINE PARSING
    // ============================================================

    #[test]
    fn test_parse_complete_transfer_line() {
        let line = "vg-progress|3942912|73400320|NA|1258291.2";
        let parsed = parse_line(line).unwrap();

        assert_eq!(
            parsed,
            ParsedLine::Transfer(RawTransfer {
                downloaded_bytes: 3_942_912,
                total_bytes: Some(73_400_320),
                speed: Some(1_258_291.2),
            })
        );
    }

    #[test]
    fn test_parse_falls_back_to_estimate_total() {
        let line = "vg-progress|1024|NA|2048.0|NA";
        match parse_line(line).unwrap() {
            ParsedLine::Transfer(t) => {
                assert_eq!(t.downloaded_bytes, 1024);
                assert_eq!(t.total_bytes, Some(2048));
                assert_eq!(t.speed, None);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_totals() {
        let line = "vg-progress|512|NA|NA|100.5";
        match parse_line(line).unwrap() {
            ParsedLine::Transfer(t) => {
                assert_eq!(t.total_bytes, None);
                assert_eq!(t.speed, Some(100.5));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_parse_float_rendered_bytes() {
        let line = "vg-progress|3942912.0|73400320.0|NA|NA";
        match parse_line(line).unwrap() {
            ParsedLine::Transfer(t) => {
                assert_eq!(t.downloaded_bytes, 3_942_912);
                assert_eq!(t.total_bytes, Some(73_400_320));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_missing_downloaded_bytes_is_ignored() {
        assert_eq!(parse_line("vg-progress|NA|100|NA|NA"), None);
    }

    // ============================================================
    // POST-PROCESSING MARKERS
    // ============================================================

    #[test]
    fn test_merger_line_is_postprocess() {
        let line = r#"[Merger] Merging formats into "/tmp/videos/clip.mp4""#;
        assert_eq!(
            parse_line(line),
            Some(ParsedLine::Postprocess("Merger".to_string()))
        );
    }

    #[test]
    fn test_convertor_and_fixup_tags() {
        assert_eq!(
            parse_line("[VideoConvertor] Converting video"),
            Some(ParsedLine::Postprocess("VideoConvertor".to_string()))
        );
        assert_eq!(
            parse_line("[FixupM4a] Correcting container"),
            Some(ParsedLine::Postprocess("FixupM4a".to_string()))
        );
    }

    #[test]
    fn test_informational_tags_are_not_postprocess() {
        assert_eq!(parse_line("[youtube] abc123: Downloading webpage"), None);
        assert_eq!(parse_line("[info] Available formats"), None);
        assert_eq!(parse_line("[download] Destination: clip.mp4"), None);
    }

    // ============================================================
    // GARBAGE INPUT
    // ============================================================

    #[test]
    fn test_garbage_lines_are_ignored() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("WARNING: unrelated"), None);
        assert_eq!(parse_line("vg-progress"), None);
        assert_eq!(parse_line("vg-progress|not|numbers|at|all"), None);
        assert_eq!(parse_line("|||||"), None);
    }
}
