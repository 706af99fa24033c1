//! Vidgrab library

pub mod backend;
pub mod coordinator;
pub mod extractor;
pub mod gui;
pub mod progress;
pub mod utils;

// Re-export main types for easier use
pub use backend::{BackendActor, BackendCommand, BackendEvent};
pub use coordinator::{DownloadCoordinator, SessionStart};
pub use extractor::{Extractor, FetchedMetadata, VideoMetadata, YtDlpExtractor};
pub use gui::{Message, VidgrabApp};
pub use progress::{DownloadStage, ProgressRelay, ProgressUpdate};
pub use utils::{AppError, AppSettings, RecentUrls};
