use crate::coordinator::request::DownloadRequest;
use crate::extractor::models::VideoMetadata;
use crate::progress::relay::ProgressRelay;
use crate::utils::error::AppError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Boundary to the external extraction library
///
/// This trait isolates the coordinator from the concrete invocation so the
/// dispatch logic can be exercised against a scripted implementation.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "yt-dlp")
    fn id(&self) -> &'static str;

    /// Locates the conversion binary the library hands merging and
    /// container conversion to
    ///
    /// Checked per request, before anything touches the network.
    fn conversion_binary(&self) -> Option<PathBuf>;

    /// Fetches video metadata without downloading
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, AppError>;

    /// Runs one download to completion, feeding raw progress into the relay
    async fn download(
        &self,
        request: &DownloadRequest,
        relay: &mut ProgressRelay,
    ) -> Result<(), AppError>;
}
