//! Download request construction and URL validation

use crate::utils::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Source platform detected from the URL host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    Instagram,
    Other,
}

const YOUTUBE_DOMAINS: &[&str] = &["youtube.com", "youtu.be"];
const INSTAGRAM_DOMAINS: &[&str] = &["instagram.com", "instagr.am"];

impl Platform {
    /// Detect the platform from a parsed URL
    pub fn detect(url: &Url) -> Platform {
        let host = match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return Platform::Other,
        };

        if domain_matches(&host, YOUTUBE_DOMAINS) {
            Platform::YouTube
        } else if domain_matches(&host, INSTAGRAM_DOMAINS) {
            Platform::Instagram
        } else {
            Platform::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::Other => "Other",
        }
    }
}

/// True when the host is the domain itself or a subdomain of it
fn domain_matches(host: &str, domains: &[&str]) -> bool {
    domains
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
}

/// Quality preference, honored for YouTube links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoQuality {
    P360,
    P480,
    P720,
    P1080,
    Best,
}

impl VideoQuality {
    pub const ALL: [VideoQuality; 5] = [
        VideoQuality::P360,
        VideoQuality::P480,
        VideoQuality::P720,
        VideoQuality::P1080,
        VideoQuality::Best,
    ];

    /// Height cap in pixels, `None` for best available
    pub fn height(&self) -> Option<u32> {
        match self {
            VideoQuality::P360 => Some(360),
            VideoQuality::P480 => Some(480),
            VideoQuality::P720 => Some(720),
            VideoQuality::P1080 => Some(1080),
            VideoQuality::Best => None,
        }
    }

    /// Get string representation for display
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::P360 => "360p",
            VideoQuality::P480 => "480p",
            VideoQuality::P720 => "720p",
            VideoQuality::P1080 => "1080p",
            VideoQuality::Best => "Best Available",
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GUI option snapshot taken when a download is requested
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub quality: VideoQuality,
    pub include_subtitles: bool,
    pub include_thumbnail: bool,
    pub output_dir: PathBuf,
}

/// A validated download request
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub platform: Platform,
    pub quality: VideoQuality,
    pub include_subtitles: bool,
    pub include_thumbnail: bool,
    pub output_dir: PathBuf,
}

impl DownloadRequest {
    /// Validate the raw URL and combine it with the option snapshot
    pub fn build(raw_url: &str, options: RequestOptions) -> Result<Self, AppError> {
        let url = validate_url(raw_url)?;
        let platform = Platform::detect(&url);

        Ok(Self {
            url: url.to_string(),
            platform,
            quality: options.quality,
            include_subtitles: options.include_subtitles,
            include_thumbnail: options.include_thumbnail,
            output_dir: options.output_dir,
        })
    }
}

/// Basic scheme and host checks on user input
pub fn validate_url(raw: &str) -> Result<Url, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl("URL is empty".to_string()));
    }

    let url = Url::parse(trimmed).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(AppError::InvalidUrl("URL has no host".to_string()));
    }

    Ok(url)
}
