//! Platform-specific utilities for Vidgrab
//!
//! Cross-platform abstractions for application directories and
//! executable naming.

use std::path::PathBuf;

/// Returns the configuration directory
/// - macOS: ~/Library/Application Support/Vidgrab
/// - Windows: %APPDATA%\Vidgrab
/// - Linux: ~/.config/vidgrab
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Vidgrab")
    }

    #[cfg(target_os = "windows")]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Vidgrab")
    }

    #[cfg(target_os = "linux")]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidgrab")
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Vidgrab")
    }
}

/// Returns the default download directory
/// - All platforms: the user's Downloads folder
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join("Downloads"))
}

/// Platform-specific executable extension
pub fn exe_extension() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        ".exe"
    }
    #[cfg(not(target_os = "windows"))]
    {
        ""
    }
}
