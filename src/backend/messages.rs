use crate::coordinator::request::RequestOptions;
use crate::extractor::models::FetchedMetadata;
use crate::progress::relay::ProgressUpdate;
use uuid::Uuid;

/// Commands sent from GUI to Backend
#[derive(Debug, Clone)]
pub enum BackendCommand {
    FetchMetadata {
        url: String,
    },
    StartDownload {
        url: String,
        options: RequestOptions,
    },
    // System
    Shutdown,
}

/// Events sent from Backend to GUI
#[derive(Debug, Clone)]
pub enum BackendEvent {
    // Metadata
    MetadataStarted,
    MetadataFetched(Box<Result<FetchedMetadata, String>>),

    // Download life-cycle
    DownloadStarted {
        session_id: Uuid,
    },
    DownloadProgress(ProgressUpdate),
    DownloadCompleted {
        session_id: Uuid,
    },
    DownloadFailed {
        session_id: Uuid,
        error: String,
    },

    /// Request never dispatched (bad URL, missing dependency, busy)
    DownloadRejected {
        error: String,
    },
}
