//! Filesystem helpers for run directories.

use anyhow::{Context, Result};
use std::path::Path;

/// Write `contents` to `path`, creating the parent directory first.
///
/// Directory creation completes before the write starts; writes to different
/// files in the same directory are independent of each other.
pub async fn write_file_ensuring_dir(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Path has no parent directory: {}", path.display()))?;

    tokio::fs::create_dir_all(parent)
        .await
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::debug!("Wrote {}", path.display());
    Ok(())
}
