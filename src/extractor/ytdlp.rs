//! yt-dlp wrapper for metadata probing and download runs
//!
//! Discovery covers system PATH and common installation paths for both
//! yt-dlp and ffmpeg. Downloads stream line-oriented progress from the
//! child's stdout into the progress relay.

use crate::coordinator::request::DownloadRequest;
use crate::extractor::classify::classify_failure;
use crate::extractor::format::format_expression;
use crate::extractor::models::VideoMetadata;
use crate::extractor::traits::Extractor;
use crate::progress::relay::ProgressRelay;
use crate::utils::error::AppError;
use crate::utils::platform::exe_extension;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info, warn};

/// Tag marking progress lines emitted through `--progress-template`
pub const PROGRESS_TAG: &str = "vg-progress";

const RETRIES: u32 = 3;
const FRAGMENT_RETRIES: u32 = 3;
const SOCKET_TIMEOUT_SECS: u32 = 30;
const STDERR_TAIL_LINES: usize = 40;

/// Extractor backed by the yt-dlp executable
pub struct YtDlpExtractor {
    ytdlp_path: PathBuf,
}

impl YtDlpExtractor {
    /// Initialize the extractor and verify yt-dlp availability
    ///
    /// Search order:
    /// 1. System PATH
    /// 2. Common installation paths (Homebrew, pip user installs, etc.)
    pub fn new() -> Result<Self, AppError> {
        let ytdlp_path = match find_ytdlp() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                path
            }
            None => {
                error!("yt-dlp not found anywhere");
                return Err(AppError::MissingDependency("yt-dlp"));
            }
        };

        Ok(Self { ytdlp_path })
    }

    /// Path of the yt-dlp binary in use
    pub fn ytdlp_path(&self) -> &Path {
        &self.ytdlp_path
    }

    /// Template producing one machine-parseable line per progress event
    fn progress_template() -> String {
        format!(
            "download:{}|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(progress.speed)s",
            PROGRESS_TAG
        )
    }

    /// Full argument list for one download run
    pub(crate) fn build_download_args(
        request: &DownloadRequest,
        ffmpeg_path: &Path,
    ) -> Vec<String> {
        let mut args = vec![
            "--newline".to_string(),
            "--no-warnings".to_string(),
            "--no-playlist".to_string(),
            "--progress-template".to_string(),
            Self::progress_template(),
            "-f".to_string(),
            format_expression(request.platform, request.quality),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "--ffmpeg-location".to_string(),
            ffmpeg_path.display().to_string(),
            "--retries".to_string(),
            RETRIES.to_string(),
            "--fragment-retries".to_string(),
            FRAGMENT_RETRIES.to_string(),
            "--socket-timeout".to_string(),
            SOCKET_TIMEOUT_SECS.to_string(),
        ];

        if request.include_subtitles {
            args.push("--write-subs".to_string());
            args.push("--sub-langs".to_string());
            args.push("en.*".to_string());
            args.push("--convert-subs".to_string());
            args.push("srt".to_string());
        }

        if request.include_thumbnail {
            args.push("--write-thumbnail".to_string());
        }

        args.push("-o".to_string());
        args.push(format!(
            "{}/%(title)s.%(ext)s",
            request.output_dir.display()
        ));
        args.push(request.url.clone());

        args
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    fn conversion_binary(&self) -> Option<PathBuf> {
        find_ffmpeg()
    }

    /// Fetch video metadata without downloading
    /// Uses: yt-dlp --dump-json --no-download
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, AppError> {
        debug!("Fetching metadata for URL: {}", url);

        let output = AsyncCommand::new(&self.ytdlp_path)
            .arg("--dump-json")
            .arg("--no-download")
            .arg("--no-warnings")
            .arg("--no-playlist")
            .arg("--socket-timeout")
            .arg(SOCKET_TIMEOUT_SECS.to_string())
            .arg(url)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp metadata fetch failed: {}", stderr);
            return Err(classify_failure(&stderr));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        let metadata: VideoMetadata = serde_json::from_str(&json_str)?;

        Ok(metadata)
    }

    /// Run one download to completion, streaming progress into the relay
    async fn download(
        &self,
        request: &DownloadRequest,
        relay: &mut ProgressRelay,
    ) -> Result<(), AppError> {
        let ffmpeg_path = self
            .conversion_binary()
            .ok_or(AppError::MissingDependency("ffmpeg"))?;

        let args = Self::build_download_args(request, &ffmpeg_path);
        debug!("Spawning yt-dlp with args: {:?}", args);

        let mut child = AsyncCommand::new(&self.ytdlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Keep a bounded tail of stderr for failure diagnosis
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
            }
            tail.into_iter().collect::<Vec<_>>().join("\n")
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                relay.observe_line(&line);
            }
        }

        let status = child.wait().await?;
        let stderr_tail = stderr_task.await.unwrap_or_default();

        if !status.success() {
            warn!(
                "yt-dlp exited with {} for {}: {}",
                status, request.url, stderr_tail
            );
            return Err(classify_failure(&stderr_tail));
        }

        info!("Download finished for {}", request.url);
        Ok(())
    }
}

// ============================================================
// Binary Detection Functions
// ============================================================

/// Find the yt-dlp binary on PATH or in common installation paths
pub fn find_ytdlp() -> Option<PathBuf> {
    find_binary("yt-dlp", YTDLP_COMMON_PATHS)
}

/// Find the ffmpeg binary on PATH or in common installation paths
pub fn find_ffmpeg() -> Option<PathBuf> {
    find_binary("ffmpeg", FFMPEG_COMMON_PATHS)
}

const YTDLP_COMMON_PATHS: &[&str] = &[
    // macOS Homebrew (Apple Silicon)
    "/opt/homebrew/bin/yt-dlp",
    // macOS Homebrew (Intel)
    "/usr/local/bin/yt-dlp",
    // System
    "/usr/bin/yt-dlp",
    // pip user install
    "~/.local/bin/yt-dlp",
];

const FFMPEG_COMMON_PATHS: &[&str] = &[
    "/opt/homebrew/bin/ffmpeg",
    "/usr/local/bin/ffmpeg",
    "/usr/bin/ffmpeg",
    "~/.local/bin/ffmpeg",
];

fn find_binary(name: &str, common_paths: &[&str]) -> Option<PathBuf> {
    // First: the executable's own directory (development layouts)
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let adjacent = exe_dir.join(format!("{}{}", name, exe_extension()));
            if adjacent.is_file() && is_executable(&adjacent) {
                return Some(adjacent);
            }
        }
    }

    // Second: system PATH
    if let Ok(path) = which::which(name) {
        if path.exists() {
            return Some(path);
        }
    }

    // Third: common locations
    for path_str in common_paths {
        let expanded = if let Some(rest) = path_str.strip_prefix("~/") {
            match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => PathBuf::from(path_str),
            }
        } else {
            PathBuf::from(path_str)
        };

        if expanded.is_file() && is_executable(&expanded) {
            return Some(expanded);
        }
    }

    None
}

/// Check if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if let Ok(metadata) = std::fs::metadata(path) {
            let permissions = metadata.permissions();
            // Any executable bit counts
            return permissions.mode() & 0o111 != 0;
        }
        false
    }

    #[cfg(not(unix))]
    {
        path.exists()
    }
}

// ============================================================
// Tests
// ============================================================
