//! Utility functions for output paths, file cleanup, and string helpers.
//!
//! This module provides the file-system plumbing shared by the output
//! writers:
//! - Dated output directory naming (`ITWorld_YYYYMMDD`)
//! - Writability probing before any file is produced
//! - Stale-file cleanup so each run leaves exactly one file per format
//! - String truncation for logging

use chrono::Local;
use std::error::Error;
use std::fs as stdfs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

/// Path of today's data directory under `base_dir`, e.g.
/// `./data/ITWorld_20250506`.
pub fn today_data_dir(base_dir: &str) -> PathBuf {
    let today = Local::now().format("%Y%m%d");
    Path::new(base_dir).join(format!("ITWorld_{today}"))
}

/// Timestamp component for output file names, e.g. `20250506_143000`.
pub fn file_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes with an ellipsis and
/// byte count indicator appended. The cut lands on the nearest char
/// boundary at or below `max`, so multi-byte text never splits mid-char.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let end = (0..=max)
        .rev()
        .find(|i| s.is_char_boundary(*i))
        .unwrap_or(0);
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Delete files in `dir` matching `{prefix}*.{extension}`.
///
/// Each save replaces the previous run's file of the same format, so stale
/// files from earlier runs the same day are removed first. A missing
/// directory is not an error.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), extension))]
pub async fn clean_existing_files(
    dir: &Path,
    prefix: &str,
    extension: &str,
) -> Result<(), Box<dyn Error>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };

    let suffix = format!(".{extension}");
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(prefix) && name.ends_with(&suffix) {
            match fs::remove_file(entry.path()).await {
                Ok(()) => info!(file = %name, "Removed stale output file"),
                Err(e) => warn!(file = %name, error = %e, "Failed to remove stale file"),
            }
        }
    }
    Ok(())
}
