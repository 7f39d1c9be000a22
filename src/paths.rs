//! Storage path resolution for the per-day log files.
//!
//! Log files live under `<base>/LogFile/`, one file per calendar day named
//! `YYYY-MM-DD.txt`. The base defaults to the platform's writable data
//! directory but can be overridden through [`CollectorConfig`].
//!
//! [`CollectorConfig`]: crate::config::CollectorConfig

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Subdirectory that holds all day files.
pub const LOG_DIR_NAME: &str = "LogFile";

/// Returns the default base directory: the platform data dir, falling back
/// to the home directory when the platform reports none.
pub fn default_base_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .context("Could not determine a writable data directory for log storage")
}

/// Returns the file name for the day containing `at`: `YYYY-MM-DD.txt`.
pub fn file_name_for(at: DateTime<Local>) -> String {
    format!("{}.txt", at.format("%Y-%m-%d"))
}

/// Returns today's file name.
pub fn file_name_today() -> String {
    file_name_for(Local::now())
}
