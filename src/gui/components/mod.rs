//! GUI components

pub mod metadata_panel;
pub mod progress_bar;
pub mod url_input;

// Re-export for convenience
pub use metadata_panel::metadata_panel;
pub use progress_bar::progress_bar;
pub use url_input::url_input;
