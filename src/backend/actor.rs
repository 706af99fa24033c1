use super::messages::{BackendCommand, BackendEvent};
use crate::coordinator::request::RequestOptions;
use crate::coordinator::{DownloadCoordinator, SessionStart};
use crate::extractor::models::FetchedMetadata;
use crate::extractor::{Extractor, YtDlpExtractor};
use crate::utils::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const THUMBNAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns the coordinator and serves GUI commands on the backend runtime
pub struct BackendActor {
    receiver: mpsc::UnboundedReceiver<BackendCommand>,
    sender: mpsc::UnboundedSender<BackendEvent>,
    coordinator: DownloadCoordinator,
    http: reqwest::Client,
}

impl BackendActor {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<BackendCommand>,
        sender: mpsc::UnboundedSender<BackendEvent>,
    ) -> Result<Self, AppError> {
        let extractor: Arc<dyn Extractor> = Arc::new(YtDlpExtractor::new()?);
        Ok(Self::with_extractor(extractor, receiver, sender))
    }

    /// Build the actor around a specific extractor implementation
    pub fn with_extractor(
        extractor: Arc<dyn Extractor>,
        receiver: mpsc::UnboundedReceiver<BackendCommand>,
        sender: mpsc::UnboundedSender<BackendEvent>,
    ) -> Self {
        Self {
            receiver,
            sender,
            coordinator: DownloadCoordinator::new(extractor),
            http: reqwest::Client::new(),
        }
    }

    pub async fn run(mut self) {
        info!("BackendActor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                BackendCommand::FetchMetadata { url } => {
                    self.handle_fetch_metadata(url).await;
                }
                BackendCommand::StartDownload { url, options } => {
                    self.handle_start_download(url, options);
                }
                BackendCommand::Shutdown => {
                    info!("BackendActor shutting down");
                    self.coordinator.shutdown();
                    break;
                }
            }
        }
    }

    async fn handle_fetch_metadata(&self, url: String) {
        let _ = self.sender.send(BackendEvent::MetadataStarted);

        match self.coordinator.fetch_metadata(&url).await {
            Ok(info) => {
                let thumbnail_bytes = match &info.thumbnail {
                    Some(thumb_url) => self.fetch_thumbnail(thumb_url).await,
                    None => None,
                };
                let _ = self.sender.send(BackendEvent::MetadataFetched(Box::new(Ok(
                    FetchedMetadata {
                        info,
                        thumbnail_bytes,
                    },
                ))));
            }
            Err(e) => {
                warn!("Metadata fetch failed for {}: {}", url, e);
                let _ = self
                    .sender
                    .send(BackendEvent::MetadataFetched(Box::new(Err(e.to_string()))));
            }
        }
    }

    /// Preview image bytes; failures degrade to a panel without a picture
    async fn fetch_thumbnail(&self, url: &str) -> Option<Vec<u8>> {
        let response = self.http.get(url).timeout(THUMBNAIL_TIMEOUT).send().await;

        match response {
            Ok(resp) if resp.status().is_success() => match resp.bytes().await {
                Ok(bytes) => Some(bytes.to_vec()),
                Err(e) => {
                    debug!("Thumbnail body read failed: {}", e);
                    None
                }
            },
            Ok(resp) => {
                debug!("Thumbnail fetch returned status {}", resp.status());
                None
            }
            Err(e) => {
                debug!("Thumbnail fetch failed: {}", e);
                None
            }
        }
    }

    fn handle_start_download(&mut self, url: String, options: RequestOptions) {
        match self.coordinator.start(&url, options) {
            Ok(SessionStart {
                session_id,
                mut progress,
                outcome,
            }) => {
                let _ = self.sender.send(BackendEvent::DownloadStarted { session_id });

                // Forward the worker's updates until its channel closes,
                // then report the outcome
                let events = self.sender.clone();
                tokio::spawn(async move {
                    while let Some(update) = progress.recv().await {
                        let _ = events.send(BackendEvent::DownloadProgress(update));
                    }
                    match outcome.await {
                        Ok(Ok(())) => {
                            let _ = events.send(BackendEvent::DownloadCompleted { session_id });
                        }
                        Ok(Err(e)) => {
                            let _ = events.send(BackendEvent::DownloadFailed {
                                session_id,
                                error: e.to_string(),
                            });
                        }
                        Err(_) => {
                            let _ = events.send(BackendEvent::DownloadFailed {
                                session_id,
                                error: "download worker stopped unexpectedly".to_string(),
                            });
                        }
                    }
                });
            }
            Err(e) => {
                warn!("Download rejected: {}", e);
                let _ = self
                    .sender
                    .send(BackendEvent::DownloadRejected {
                        error: e.to_string(),
                    });
            }
        }
    }
}
