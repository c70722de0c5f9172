//! View-model JSON export.
//!
//! The export is the "portable" representation of one dashboard render:
//! the selection, dataset stats, and all nine aggregate results. It is meant
//! to be easy to consume in notebooks or downstream scripts.

use std::path::{Path, PathBuf};

use crate::app::pipeline::ViewModel;
use crate::error::AppError;

/// Write a view JSON file.
pub fn write_view_json(path: &Path, view: &ViewModel) -> Result<(), AppError> {
    let file = std::fs::File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create view JSON '{}': {e}", path.display()),
        )
    })?;

    serde_json::to_writer_pretty(file, view)
        .map_err(|e| AppError::new(2, format!("Failed to write view JSON: {e}")))?;

    Ok(())
}

/// Timestamped default path for exports triggered from the TUI.
pub fn timestamped_view_path() -> PathBuf {
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("bikedash_view_{ts}.json"))
}
