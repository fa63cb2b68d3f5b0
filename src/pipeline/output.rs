//! Per-run output directory
//!
//! Every run writes into its own directory `<output_dir>/<run-id>`, where the
//! run id is a UTC timestamp plus a short random suffix, so concurrent runs
//! never share files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::splitter::SplitResult;
use crate::utils::constants::{
    PAGE_FILE_NAME, PURGED_FILE_NAME, SPLIT_DIR_NAME, SPLIT_INDEX_FILE_NAME,
};
use crate::utils::write_file_ensuring_dir;

/// One emitted split file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndexEntry {
    pub key: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub media: Option<String>,
}

/// Contents of `index.json` in the split directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndex {
    pub entries: Vec<SplitIndexEntry>,
}

impl SplitIndex {
    #[must_use]
    pub fn from_split(split: &SplitResult) -> Self {
        let entries = split
            .groups()
            .iter()
            .map(|g| SplitIndexEntry {
                key: g.key.clone(),
                file_name: format!("{}.css", g.key),
                media: g.media.clone(),
            })
            .collect();
        Self { entries }
    }

    /// `<link>` tags for every entry, with `href` relative to `base_href`
    #[must_use]
    pub fn render_link_tags(&self, base_href: &str) -> String {
        let base = base_href.trim_end_matches('/');
        self.entries
            .iter()
            .map(|entry| {
                let href = if base.is_empty() {
                    entry.file_name.clone()
                } else {
                    format!("{base}/{}", entry.file_name)
                };
                match &entry.media {
                    Some(media) => format!(
                        r#"<link rel="stylesheet" href="{}" media="{}">"#,
                        escape_attr(&href),
                        escape_attr(media)
                    ),
                    None => format!(r#"<link rel="stylesheet" href="{}">"#, escape_attr(&href)),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Generate a run id: `20261019T101500Z-1a2b3c4d`
#[must_use]
pub fn new_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().format("%Y%m%dT%H%M%SZ"), &uuid[..8])
}

/// Scratch directory of one run
#[derive(Debug, Clone)]
pub struct RunWorkspace {
    run_id: String,
    root: PathBuf,
}

impl RunWorkspace {
    /// Create `<output_dir>/<run-id>`
    pub async fn create(output_dir: &Path) -> Result<Self> {
        let run_id = new_run_id();
        let root = output_dir.join(&run_id);
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("Failed to create run directory {}", root.display()))?;
        log::debug!("Created run directory {}", root.display());
        Ok(Self { run_id, root })
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn split_dir(&self) -> PathBuf {
        self.root.join(SPLIT_DIR_NAME)
    }

    /// Save the page markup the run purged against
    pub async fn write_page(&self, markup: &str) -> Result<PathBuf> {
        let path = self.root.join(PAGE_FILE_NAME);
        write_file_ensuring_dir(&path, markup).await?;
        Ok(path)
    }

    /// Write the unsplit result as `purged.css`
    pub async fn write_purged(&self, css: &str) -> Result<PathBuf> {
        let path = self.root.join(PURGED_FILE_NAME);
        write_file_ensuring_dir(&path, css).await?;
        log::info!("Wrote {} ({} bytes)", path.display(), css.len());
        Ok(path)
    }

    /// Write one `<key>.css` per group plus `index.json`
    pub async fn write_split(&self, split: &SplitResult) -> Result<SplitIndex> {
        let dir = self.split_dir();
        let index = SplitIndex::from_split(split);

        for (group, entry) in split.groups().iter().zip(&index.entries) {
            write_file_ensuring_dir(&dir.join(&entry.file_name), &group.css).await?;
        }

        let json = serde_json::to_string_pretty(&index).context("Failed to serialize split index")?;
        write_file_ensuring_dir(&dir.join(SPLIT_INDEX_FILE_NAME), json).await?;

        log::info!(
            "Wrote {} split files to {}",
            index.entries.len(),
            dir.display()
        );
        Ok(index)
    }
}
