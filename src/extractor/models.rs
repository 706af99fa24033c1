//! Data structures for video metadata

use serde::{Deserialize, Serialize};

/// Metadata reported by the extraction library for one video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(alias = "webpage_url")]
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub duration: Option<f64>,
    pub uploader: Option<String>,
    pub view_count: Option<u64>,
    pub thumbnail: Option<String>,
    pub extractor: Option<String>,
}

impl VideoMetadata {
    /// Duration as whole seconds, when known
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration.map(|d| d.max(0.0) as u64)
    }

    /// Duration formatted as h:mm:ss or m:ss
    pub fn duration_display(&self) -> String {
        match self.duration_secs() {
            Some(total) => {
                let hours = total / 3600;
                let minutes = (total % 3600) / 60;
                let seconds = total % 60;
                if hours > 0 {
                    format!("{}:{:02}:{:02}", hours, minutes, seconds)
                } else {
                    format!("{}:{:02}", minutes, seconds)
                }
            }
            None => "unknown".to_string(),
        }
    }
}

/// Metadata plus the thumbnail image bytes fetched for preview
#[derive(Debug, Clone)]
pub struct FetchedMetadata {
    pub info: VideoMetadata,
    pub thumbnail_bytes: Option<Vec<u8>>,
}
