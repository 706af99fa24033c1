//! Main GUI application

use crate::backend::{BackendActor, BackendCommand, BackendEvent};
use crate::coordinator::request::{RequestOptions, VideoQuality};
use crate::extractor::FetchedMetadata;
use crate::gui::clipboard;
use crate::progress::ProgressUpdate;
use crate::utils::{AppSettings, RecentUrls};
use iced::{Application, Command, Element, Subscription, Theme};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Main application state
pub struct VidgrabApp {
    // Backend wiring
    command_tx: mpsc::UnboundedSender<BackendCommand>,
    event_rx: mpsc::UnboundedReceiver<BackendEvent>,
    // Keep a long-lived runtime so backend tasks stay alive
    _runtime: Arc<Runtime>,
    backend_missing: bool,

    // UI state
    url_input: String,
    url_error: Option<String>,
    settings: AppSettings,
    history: RecentUrls,
    metadata: Option<FetchedMetadata>,
    fetching_metadata: bool,
    downloading: bool,
    progress: Option<ProgressUpdate>,
    status: Option<StatusMessage>,

    // URL of the request currently being dispatched, recorded into
    // history once the backend confirms the download started
    pending_url: Option<String>,
}

/// Status line shown under the main panel
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub tone: StatusTone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Error,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Info,
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Success,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Error,
        }
    }
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Input events
    UrlInputChanged(String),
    PasteFromClipboard,
    ClearUrlInput,
    RecentUrlPicked(String),

    // Actions
    FetchInfoPressed,
    DownloadPressed,

    // Options
    QualitySelected(VideoQuality),
    SubtitlesToggled(bool),
    ThumbnailToggled(bool),
    BrowseDirectory,
    OpenDirectory,

    // System
    Tick, // For periodic backend event draining
}

impl Application for VidgrabApp {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: Self::Flags) -> (Self, Command<Message>) {
        let settings = AppSettings::load();
        let history = RecentUrls::load();

        // Create a single runtime and keep it alive for the app lifetime
        let runtime = Runtime::new().expect("Failed to create tokio runtime");

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let mut backend_missing = false;
        let mut status = None;

        match BackendActor::new(command_rx, event_tx) {
            Ok(actor) => {
                runtime.spawn(actor.run());
            }
            Err(e) => {
                error!("Backend unavailable: {}", e);
                backend_missing = true;
                status = Some(StatusMessage::error(e.to_string()));
            }
        }

        let app = Self {
            command_tx,
            event_rx,
            _runtime: Arc::new(runtime),
            backend_missing,
            url_input: String::new(),
            url_error: None,
            settings,
            history,
            metadata: None,
            fetching_metadata: false,
            downloading: false,
            progress: None,
            status,
            pending_url: None,
        };

        (app, Command::none())
    }

    fn title(&self) -> String {
        String::from("Vidgrab - Video Downloader")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            // Input events
            Message::UrlInputChanged(url) => {
                self.url_input = url;
                self.url_error = None; // Clear error when user types
                Command::none()
            }

            Message::PasteFromClipboard => {
                match clipboard::read_text() {
                    Ok(content) => {
                        self.url_input = content.trim().to_string();
                        self.url_error = None;
                    }
                    Err(e) => {
                        self.status = Some(StatusMessage::error(format!(
                            "Failed to paste from clipboard: {}",
                            e
                        )));
                    }
                }
                Command::none()
            }

            Message::ClearUrlInput => {
                self.url_input.clear();
                self.url_error = None;
                self.metadata = None;
                Command::none()
            }

            Message::RecentUrlPicked(url) => {
                self.url_input = url;
                self.url_error = None;
                Command::none()
            }

            // Actions
            Message::FetchInfoPressed => {
                if self.can_send() && !self.url_input.trim().is_empty() && !self.fetching_metadata {
                    self.fetching_metadata = true;
                    self.metadata = None;
                    self.status = Some(StatusMessage::info("Fetching video info..."));
                    self.send_command(BackendCommand::FetchMetadata {
                        url: self.url_input.trim().to_string(),
                    });
                }
                Command::none()
            }

            Message::DownloadPressed => {
                if self.can_send() && !self.url_input.trim().is_empty() && !self.downloading {
                    let url = self.url_input.trim().to_string();

                    self.downloading = true;
                    self.progress = None;
                    self.url_error = None;
                    self.status = Some(StatusMessage::info("Starting download..."));
                    self.pending_url = Some(url.clone());

                    self.send_command(BackendCommand::StartDownload {
                        url,
                        options: RequestOptions {
                            quality: self.settings.quality,
                            include_subtitles: self.settings.include_subtitles,
                            include_thumbnail: self.settings.include_thumbnail,
                            output_dir: self.settings.download_dir.clone(),
                        },
                    });
                }
                Command::none()
            }

            // Options
            Message::QualitySelected(quality) => {
                self.settings.quality = quality;
                self.save_settings();
                Command::none()
            }

            Message::SubtitlesToggled(enabled) => {
                self.settings.include_subtitles = enabled;
                self.save_settings();
                Command::none()
            }

            Message::ThumbnailToggled(enabled) => {
                self.settings.include_thumbnail = enabled;
                self.save_settings();
                Command::none()
            }

            Message::BrowseDirectory => {
                if let Some(path) = rfd::FileDialog::new()
                    .set_directory(&self.settings.download_dir)
                    .pick_folder()
                {
                    self.settings.download_dir = path;
                    self.save_settings();
                }
                Command::none()
            }

            Message::OpenDirectory => {
                if let Err(e) = open::that(&self.settings.download_dir) {
                    warn!("Failed to open download folder: {}", e);
                    self.status = Some(StatusMessage::error("Failed to open download folder"));
                }
                Command::none()
            }

            // System
            Message::Tick => {
                while let Ok(event) = self.event_rx.try_recv() {
                    self.handle_event(event);
                }
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        use crate::gui::theme;
        use crate::gui::views::main_view;
        use iced::widget::container;
        use iced::Length;

        let recent = self.history.urls();
        let content = main_view(
            &self.url_input,
            self.url_error.as_deref(),
            &self.settings,
            &recent,
            self.metadata.as_ref(),
            self.fetching_metadata,
            self.downloading,
            self.progress.as_ref(),
            self.status.as_ref(),
        );

        // Wrap in Gradient Container
        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(
                theme::MainGradientContainer,
            )))
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(std::time::Duration::from_millis(100)).map(|_| Message::Tick)
    }

    fn theme(&self) -> Self::Theme {
        Theme::Light
    }
}

impl VidgrabApp {
    fn can_send(&self) -> bool {
        !self.backend_missing
    }

    fn send_command(&mut self, command: BackendCommand) {
        if self.command_tx.send(command).is_err() {
            error!("Backend channel closed");
            self.backend_missing = true;
            self.status = Some(StatusMessage::error(
                "The download backend stopped. Please restart the application",
            ));
        }
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save() {
            warn!("Failed to save settings: {}", e);
        }
    }

    fn handle_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::MetadataStarted => {
                self.fetching_metadata = true;
            }

            BackendEvent::MetadataFetched(result) => {
                self.fetching_metadata = false;
                match *result {
                    Ok(fetched) => {
                        self.metadata = Some(fetched);
                        self.status = None;
                    }
                    Err(e) => {
                        let friendly = make_error_user_friendly(&e);
                        if e.to_lowercase().contains("invalid url") {
                            self.url_error = Some(friendly);
                            self.status = None;
                        } else {
                            self.status = Some(StatusMessage::error(friendly));
                        }
                    }
                }
            }

            BackendEvent::DownloadStarted { session_id } => {
                self.downloading = true;
                self.status = Some(StatusMessage::info("Downloading..."));

                if let Some(url) = self.pending_url.take() {
                    self.history.push(&url);
                    if let Err(e) = self.history.save() {
                        warn!("Failed to save URL history: {}", e);
                    }
                }

                tracing::debug!("Download session {} started", session_id);
            }

            BackendEvent::DownloadProgress(update) => {
                self.progress = Some(update);
            }

            BackendEvent::DownloadCompleted { .. } => {
                self.downloading = false;
                self.status = Some(StatusMessage::success(format!(
                    "Download complete. Saved to {}",
                    self.settings.download_dir.display()
                )));
            }

            BackendEvent::DownloadFailed { error, .. } => {
                self.downloading = false;
                self.status = Some(StatusMessage::error(make_error_user_friendly(&error)));
            }

            BackendEvent::DownloadRejected { error } => {
                self.downloading = false;
                self.pending_url = None;

                let friendly = make_error_user_friendly(&error);
                if error.to_lowercase().contains("invalid url") {
                    self.url_error = Some(friendly);
                    self.status = None;
                } else {
                    self.status = Some(StatusMessage::error(friendly));
                }
            }
        }
    }
}

/// Convert technical error messages to user-friendly text
fn make_error_user_friendly(error: &str) -> String {
    let error_lower = error.to_lowercase();

    if error_lower.contains("invalid url") {
        "This doesn't appear to be a valid video URL".to_string()
    } else if error_lower.contains("not found. please install") {
        // Dependency errors already carry install instructions
        error.to_string()
    } else if error_lower.contains("already in progress") {
        "A download is already in progress. Please wait for it to finish".to_string()
    } else if error_lower.contains("unsupported platform") {
        "This site is not supported".to_string()
    } else if error_lower.contains("network")
        || error_lower.contains("connection")
        || error_lower.contains("timed out")
    {
        "Unable to connect. Please check your internet connection".to_string()
    } else if error_lower.contains("unavailable")
        || error_lower.contains("not available")
        || error_lower.contains("removed")
    {
        "This video is not available or has been removed".to_string()
    } else if error_lower.contains("private") || error_lower.contains("restricted") {
        "This video is private or restricted".to_string()
    } else if error_lower.contains("geo") || error_lower.contains("region") {
        "This video is not available in your region".to_string()
    } else {
        format!("Download failed: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendly_invalid_url() {
        let msg = make_error_user_friendly("Invalid URL: not a link");
        assert_eq!(msg, "This doesn't appear to be a valid video URL");
    }

    #[test]
    fn test_friendly_missing_dependency_passthrough() {
        let raw = "ffmpeg not found. Please install ffmpeg and make sure it is on PATH";
        assert_eq!(make_error_user_friendly(raw), raw);
    }

    #[test]
    fn test_friendly_network() {
        let msg = make_error_user_friendly("Network failure: connection reset by peer");
        assert_eq!(msg, "Unable to connect. Please check your internet connection");
    }

    #[test]
    fn test_friendly_busy() {
        let msg = make_error_user_friendly("A download is already in progress");
        assert!(msg.contains("already in progress"));
    }

    #[test]
    fn test_friendly_fallback_keeps_detail() {
        let msg = make_error_user_friendly("Extraction failed: something odd");
        assert!(msg.contains("something odd"));
    }
}
