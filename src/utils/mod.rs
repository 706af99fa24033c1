//! Utility modules for error handling, configuration and history

pub mod config;
pub mod error;
pub mod history;
pub mod platform;

// Re-export for convenience
pub use config::AppSettings;
pub use error::AppError;
pub use history::RecentUrls;
