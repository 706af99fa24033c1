pub mod parse;
pub mod relay;

pub use relay::{DownloadStage, ProgressRelay, ProgressUpdate};
