//! Format-selection expressions handed to the extraction library

use crate::coordinator::request::{Platform, VideoQuality};

/// Builds the format filter for a platform and quality preference
///
/// YouTube honors the quality cap with an at-or-below fallback; other
/// platforms expose too few formats for height filters to be useful, so
/// they always take the best mp4.
pub fn format_expression(platform: Platform, quality: VideoQuality) -> String {
    match platform {
        Platform::YouTube => match quality.height() {
            Some(height) => format!(
                "bestvideo[height<={h}][ext=mp4]+bestaudio[ext=m4a]/best[height<={h}][ext=mp4]",
                h = height
            ),
            None => "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]".to_string(),
        },
        Platform::Instagram | Platform::Other => "best[ext=mp4]".to_string(),
    }
}
