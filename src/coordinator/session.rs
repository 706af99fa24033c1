//! Session bookkeeping for the in-flight download

use crate::coordinator::request::DownloadRequest;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// State for one dispatched request
///
/// Owned by the coordinator; a finished worker means the session is over
/// and a new request may be dispatched.
#[derive(Debug)]
pub struct DownloadSession {
    pub id: Uuid,
    pub request: DownloadRequest,
    pub started_at: DateTime<Utc>,
    handle: JoinHandle<()>,
}

impl DownloadSession {
    pub fn new(id: Uuid, request: DownloadRequest, handle: JoinHandle<()>) -> Self {
        Self {
            id,
            request,
            started_at: Utc::now(),
            handle,
        }
    }

    /// Whether the worker task has run to its end
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abort the worker; the spawned subprocess is killed on drop
    pub fn abort(&self) {
        self.handle.abort();
    }
}
