//! Application configuration

use crate::coordinator::request::VideoQuality;
use crate::utils::error::AppError;
use crate::utils::platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Application settings, persisted as JSON in the config directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Download location
    pub download_dir: PathBuf,

    /// Preferred video quality (applies to YouTube links)
    pub quality: VideoQuality,

    /// Download subtitles alongside the video
    pub include_subtitles: bool,

    /// Save the thumbnail next to the video
    pub include_thumbnail: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            download_dir: platform::default_download_dir(),
            quality: VideoQuality::Best,
            include_subtitles: false,
            include_thumbnail: false,
        }
    }
}

impl AppSettings {
    /// Path of the settings file
    pub fn settings_path() -> PathBuf {
        platform::config_dir().join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    /// when the file is absent or unreadable
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Settings file at {} is invalid ({}), using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist settings to the default location
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::settings_path())
    }

    /// Persist settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
