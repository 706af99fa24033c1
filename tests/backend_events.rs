//! Integration tests for the backend actor's event stream, driven end to end
//! over its command channel with a scripted extractor.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use vidgrab::coordinator::request::{RequestOptions, VideoQuality};
use vidgrab::coordinator::DownloadRequest;
use vidgrab::extractor::{Extractor, VideoMetadata};
use vidgrab::progress::{DownloadStage, ProgressRelay};
use vidgrab::utils::AppError;
use vidgrab::{BackendActor, BackendCommand, BackendEvent};

struct ScriptedExtractor {
    fail_download: bool,
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    fn id(&self) -> &'static str {
        "scripted"
    }

    fn conversion_binary(&self) -> Option<PathBuf> {
        Some(PathBuf::from("/usr/bin/ffmpeg"))
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, AppError> {
        Ok(VideoMetadata {
            id: "vid123".to_string(),
            title: "Scripted Video".to_string(),
            url: url.to_string(),
            duration: Some(42.0),
            uploader: None,
            view_count: None,
            thumbnail: None,
            extractor: Some("scripted".to_string()),
        })
    }

    async fn download(
        &self,
        _request: &DownloadRequest,
        relay: &mut ProgressRelay,
    ) -> Result<(), AppError> {
        relay.observe_line("vg-progress|500|1000|NA|256000.0");
        relay.observe_line("vg-progress|1000|1000|NA|NA");
        relay.observe_line("[Merger] Merging formats into \"clip.mp4\"");

        if self.fail_download {
            Err(AppError::NetworkFailure("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

fn spawn_actor(
    fail_download: bool,
) -> (
    mpsc::UnboundedSender<BackendCommand>,
    mpsc::UnboundedReceiver<BackendEvent>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let extractor: Arc<dyn Extractor> = Arc::new(ScriptedExtractor { fail_download });
    let actor = BackendActor::with_extractor(extractor, command_rx, event_tx);
    tokio::spawn(actor.run());

    (command_tx, event_rx)
}

fn options(temp: &TempDir) -> RequestOptions {
    RequestOptions {
        quality: VideoQuality::P720,
        include_subtitles: false,
        include_thumbnail: false,
        output_dir: temp.path().to_path_buf(),
    }
}

#[tokio::test]
async fn metadata_command_produces_started_then_fetched() {
    let (command_tx, mut event_rx) = spawn_actor(false);

    command_tx
        .send(BackendCommand::FetchMetadata {
            url: "https://www.youtube.com/watch?v=abc123".to_string(),
        })
        .expect("send");

    let first = event_rx.recv().await.expect("event");
    assert!(matches!(first, BackendEvent::MetadataStarted));

    let second = event_rx.recv().await.expect("event");
    match second {
        BackendEvent::MetadataFetched(result) => {
            let fetched = result.expect("metadata ok");
            assert_eq!(fetched.info.title, "Scripted Video");
            assert!(fetched.thumbnail_bytes.is_none());
        }
        other => panic!("Expected MetadataFetched, got {:?}", other),
    }

    // Shutdown ends the run loop and closes the event channel
    command_tx.send(BackendCommand::Shutdown).expect("send");
    assert!(event_rx.recv().await.is_none());
}

#[tokio::test]
async fn metadata_failure_is_reported_as_error_string() {
    let (command_tx, mut event_rx) = spawn_actor(false);

    command_tx
        .send(BackendCommand::FetchMetadata {
            url: "not a url at all".to_string(),
        })
        .expect("send");

    assert!(matches!(
        event_rx.recv().await.expect("event"),
        BackendEvent::MetadataStarted
    ));

    match event_rx.recv().await.expect("event") {
        BackendEvent::MetadataFetched(result) => {
            let err = result.expect_err("should fail");
            assert!(err.to_lowercase().contains("invalid url"));
        }
        other => panic!("Expected MetadataFetched, got {:?}", other),
    }
}

#[tokio::test]
async fn download_command_streams_progress_then_completion() {
    let temp = TempDir::new().expect("temp dir");
    let (command_tx, mut event_rx) = spawn_actor(false);

    command_tx
        .send(BackendCommand::StartDownload {
            url: "https://www.youtube.com/watch?v=abc123".to_string(),
            options: options(&temp),
        })
        .expect("send");

    let started_id = match event_rx.recv().await.expect("event") {
        BackendEvent::DownloadStarted { session_id } => session_id,
        other => panic!("Expected DownloadStarted, got {:?}", other),
    };

    let mut progress_updates = Vec::new();
    loop {
        match event_rx.recv().await.expect("event") {
            BackendEvent::DownloadProgress(update) => progress_updates.push(update),
            BackendEvent::DownloadCompleted { session_id } => {
                assert_eq!(session_id, started_id);
                break;
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    assert!(!progress_updates.is_empty());
    assert_eq!(progress_updates[0].percent, 0.0);
    assert_eq!(progress_updates[0].stage, DownloadStage::Fetching);

    let last = progress_updates.last().expect("updates");
    assert_eq!(last.stage, DownloadStage::Done);
    assert_eq!(last.percent, 100.0);

    let terminals = progress_updates
        .iter()
        .filter(|u| u.stage.is_terminal())
        .count();
    assert_eq!(terminals, 1);
}

#[tokio::test]
async fn failed_download_reports_error_event() {
    let temp = TempDir::new().expect("temp dir");
    let (command_tx, mut event_rx) = spawn_actor(true);

    command_tx
        .send(BackendCommand::StartDownload {
            url: "https://www.youtube.com/watch?v=abc123".to_string(),
            options: options(&temp),
        })
        .expect("send");

    let started_id = match event_rx.recv().await.expect("event") {
        BackendEvent::DownloadStarted { session_id } => session_id,
        other => panic!("Expected DownloadStarted, got {:?}", other),
    };

    loop {
        match event_rx.recv().await.expect("event") {
            BackendEvent::DownloadProgress(update) => {
                if update.stage.is_terminal() {
                    assert_eq!(update.stage, DownloadStage::Failed);
                }
            }
            BackendEvent::DownloadFailed { session_id, error } => {
                assert_eq!(session_id, started_id);
                assert!(error.to_lowercase().contains("network"));
                break;
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }
}

#[tokio::test]
async fn rejected_download_emits_no_progress() {
    let (command_tx, mut event_rx) = spawn_actor(false);

    command_tx
        .send(BackendCommand::StartDownload {
            url: "definitely not a url".to_string(),
            options: options(&TempDir::new().expect("temp dir")),
        })
        .expect("send");

    match event_rx.recv().await.expect("event") {
        BackendEvent::DownloadRejected { error } => {
            assert!(error.to_lowercase().contains("invalid url"));
        }
        other => panic!("Expected DownloadRejected, got {:?}", other),
    }

    // Nothing else for this request arrives, and shutdown closes cleanly
    command_tx.send(BackendCommand::Shutdown).expect("send");
    assert!(event_rx.recv().await.is_none());
}
