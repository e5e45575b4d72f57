//! Output artifact writer.
//!
//! The artifact is written with the write-to-temp-then-rename pattern so
//! the destination is never left in a partial state — the display layer may
//! read it at any moment.

use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::model::CanonicalItem;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serializes the item sequence as pretty JSON and writes it atomically.
///
/// The parent directory is created if missing. The content goes to a
/// temporary file with a randomized suffix in the same directory, is synced
/// to disk, and only then renamed over the destination (rename on one
/// filesystem is atomic on POSIX).
///
/// # Errors
///
/// [`OutputError`] on serialization or I/O failure. Both are fatal to the
/// run: an artifact that cannot be persisted means a non-zero exit.
pub fn write_items(path: &Path, items: &[CanonicalItem]) -> Result<(), OutputError> {
    let content = serde_json::to_vec_pretty(items)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Randomized temp filename so a concurrent run cannot collide
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

    let result = (|| -> std::io::Result<()> {
        let mut temp_file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        temp_file.write_all(&content)?;
        // Sync to disk to ensure data is persisted before rename
        temp_file.sync_all()?;
        drop(temp_file);

        // On Windows, rename fails if destination exists, so remove it first
        #[cfg(windows)]
        if path.exists() {
            std::fs::remove_file(path)?;
        }

        std::fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }

    result.map_err(OutputError::Io)
}
