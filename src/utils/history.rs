//! Recently downloaded URLs, persisted as JSON in the config directory

use crate::utils::error::AppError;
use crate::utils::platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Maximum number of URLs kept in the history
pub const HISTORY_CAP: usize = 10;

/// One remembered URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub added_at: DateTime<Utc>,
}

/// Recent URL history, most recent first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentUrls {
    entries: Vec<HistoryEntry>,
}

impl RecentUrls {
    /// Path of the history file
    pub fn history_path() -> PathBuf {
        platform::config_dir().join("history.json")
    }

    /// Load history from the default location, empty when absent or invalid
    pub fn load() -> Self {
        Self::load_from(&Self::history_path())
    }

    /// Load history from a specific path
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(history) => history,
                Err(e) => {
                    warn!("History file at {} is invalid ({}), starting empty", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist history to the default location
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::history_path())
    }

    /// Persist history to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Record a URL at the front, deduplicating and capping the list
    pub fn push(&mut self, url: &str) {
        self.entries.retain(|e| e.url != url);
        self.entries.insert(
            0,
            HistoryEntry {
                url: url.to_string(),
                added_at: Utc::now(),
            },
        );
        self.entries.truncate(HISTORY_CAP);
    }

    /// URLs in most-recent-first order
    pub fn urls(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.url.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
