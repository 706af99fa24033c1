//! Classification of extraction library failures

use crate::utils::error::AppError;

/// Maps the subprocess's stderr output onto the application error taxonomy
///
/// The library reports everything as free text; the patterns below are the
/// stable phrases it uses for each failure class.
pub fn classify_failure(stderr: &str) -> AppError {
    let lower = stderr.to_lowercase();

    if lower.contains("ffmpeg not found")
        || lower.contains("ffprobe and ffmpeg not found")
        || lower.contains("ffmpeg is not installed")
    {
        return AppError::MissingDependency("ffmpeg");
    }

    if lower.contains("unsupported url")
        || lower.contains("is not a valid url")
        || lower.contains("no suitable extractor")
    {
        return AppError::UnsupportedPlatform(error_line(stderr));
    }

    if lower.contains("unable to download webpage")
        || lower.contains("connection")
        || lower.contains("timed out")
        || lower.contains("temporary failure in name resolution")
        || lower.contains("getaddrinfo")
        || lower.contains("network is unreachable")
    {
        return AppError::NetworkFailure(error_line(stderr));
    }

    AppError::ExtractionFailure(error_line(stderr))
}

/// Picks the most informative line out of the stderr tail
///
/// The library prefixes its final diagnosis with "ERROR:"; when that is
/// missing the last non-empty line is the best available detail.
fn error_line(stderr: &str) -> String {
    let last_error = stderr
        .lines()
        .rev()
        .find(|line| line.trim_start().starts_with("ERROR:"));

    match last_error {
        Some(line) => line.trim().to_string(),
        None => stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("extraction process failed")
            .trim()
            .to_string(),
    }
}
