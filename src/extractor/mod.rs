pub mod classify;
pub mod format;
pub mod models;
pub mod traits;
pub mod ytdlp;

pub use models::{FetchedMetadata, VideoMetadata};
pub use traits::Extractor;
pub use ytdlp::YtDlpExtractor;
