//! Request coordination: validation, dependency preflight and dispatch
//!
//! One request is in flight at a time. The coordinator validates the URL,
//! verifies the conversion binary before anything touches the network,
//! spawns the worker task and hands the caller the channels to observe it.

pub mod request;
pub mod session;

pub use request::{DownloadRequest, Platform, RequestOptions, VideoQuality};
pub use session::DownloadSession;

use crate::extractor::models::VideoMetadata;
use crate::extractor::traits::Extractor;
use crate::progress::relay::{ProgressRelay, ProgressUpdate};
use crate::utils::error::AppError;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};
use uuid::Uuid;

/// Channels handed back for one accepted request
#[derive(Debug)]
pub struct SessionStart {
    pub session_id: Uuid,
    /// Normalized progress stream, including the terminal update
    pub progress: mpsc::UnboundedReceiver<ProgressUpdate>,
    /// The worker's final result, resolved after the progress stream closes
    pub outcome: oneshot::Receiver<Result<(), AppError>>,
}

/// Validates requests and dispatches one worker at a time
pub struct DownloadCoordinator {
    extractor: Arc<dyn Extractor>,
    active: Option<DownloadSession>,
}

impl DownloadCoordinator {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            active: None,
        }
    }

    /// True while a dispatched worker has not finished
    pub fn is_busy(&self) -> bool {
        self.active
            .as_ref()
            .map(|s| !s.is_finished())
            .unwrap_or(false)
    }

    pub fn active_session(&self) -> Option<&DownloadSession> {
        self.active.as_ref()
    }

    /// Validate, preflight and dispatch one download
    ///
    /// Must run inside a tokio runtime; the worker is spawned onto it.
    pub fn start(
        &mut self,
        raw_url: &str,
        options: RequestOptions,
    ) -> Result<SessionStart, AppError> {
        let request = DownloadRequest::build(raw_url, options)?;

        if self.extractor.conversion_binary().is_none() {
            warn!("Conversion binary missing, rejecting request for {}", request.url);
            return Err(AppError::MissingDependency("ffmpeg"));
        }

        if self.is_busy() {
            return Err(AppError::Busy);
        }

        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let session_id = Uuid::new_v4();
        let extractor = Arc::clone(&self.extractor);
        let worker_request = request.clone();

        let handle = tokio::spawn(async move {
            let mut relay = ProgressRelay::new(progress_tx);
            let result = extractor.download(&worker_request, &mut relay).await;
            match &result {
                Ok(()) => relay.complete(),
                Err(e) => {
                    warn!("Download {} failed: {}", session_id, e);
                    relay.fail();
                }
            }
            let _ = outcome_tx.send(result);
        });

        info!(
            "Dispatched download {} for {} ({})",
            session_id,
            request.url,
            request.platform.label()
        );
        self.active = Some(DownloadSession::new(session_id, request, handle));

        Ok(SessionStart {
            session_id,
            progress: progress_rx,
            outcome: outcome_rx,
        })
    }

    /// Fetch metadata for a URL after the same validation a download gets
    pub async fn fetch_metadata(&self, raw_url: &str) -> Result<VideoMetadata, AppError> {
        let url = request::validate_url(raw_url)?;
        self.extractor.fetch_metadata(url.as_str()).await
    }

    /// Abort the in-flight worker, if any
    pub fn shutdown(&mut self) {
        if let Some(session) = self.active.take() {
            if !session.is_finished() {
                warn!("Aborting in-flight download {}", session.id);
                session.abort();
            }
        }
    }
}
