//! Error types for the purge pipeline
//!
//! Per-reference failures (`FetchFailed`) are skipped by the pipeline; every
//! other variant aborts the request. `user_message()` is what a front-end
//! should show: one line, with the URL or file that failed, and nothing from
//! the internals.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type PurgeResult<T> = Result<T, PurgeError>;

/// Error types for the purge pipeline
#[derive(Debug, Error)]
pub enum PurgeError {
    /// A single stylesheet could not be downloaded
    #[error("Failed to fetch stylesheet {url}: {cause}")]
    FetchFailed { url: String, cause: String },

    /// A configured override file could not be read
    #[error("Override file missing or unreadable: {}", path.display())]
    OverrideFileMissing { path: PathBuf },

    /// Resolved content is not plausibly CSS
    #[error("Content from {source_name} is not valid CSS")]
    InvalidCss { source_name: String },

    /// A transform pass failed
    #[error("CSS transform failed in {stage} pass: {cause}")]
    TransformError { stage: &'static str, cause: String },

    /// Nothing usable to purge
    #[error("No external stylesheets found")]
    NoStylesheetsFound,

    /// The page markup itself could not be obtained
    #[error("Failed to load page {target}: {cause}")]
    PageFetch { target: String, cause: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PurgeError {
    pub(crate) fn fetch_failed(url: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::FetchFailed {
            url: url.into(),
            cause: cause.to_string(),
        }
    }

    pub(crate) fn transform(stage: &'static str, cause: impl std::fmt::Display) -> Self {
        Self::TransformError {
            stage,
            cause: cause.to_string(),
        }
    }

    /// Whether this error aborts the whole request
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::FetchFailed { .. } | Self::NoStylesheetsFound)
    }

    /// Whether this is the empty-result condition rather than a failure
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::NoStylesheetsFound)
    }

    /// Single-line message suitable for an end user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::FetchFailed { url, .. } => format!("Could not download stylesheet {url}"),
            Self::OverrideFileMissing { path } => {
                format!("Override file {} does not exist", path.display())
            }
            Self::InvalidCss { source_name } => {
                format!("{source_name} did not contain valid CSS; nothing was generated")
            }
            Self::TransformError { stage, .. } => {
                format!("Processing failed during the {stage} step; nothing was generated")
            }
            Self::NoStylesheetsFound => {
                "No external CSS files found on the provided page".to_string()
            }
            Self::PageFetch { target, .. } => format!("Could not load page {target}"),
            Self::Config(msg) => format!("Invalid configuration: {msg}"),
            Self::Io(_) => "Could not write output files".to_string(),
        }
    }
}

impl From<anyhow::Error> for PurgeError {
    fn from(error: anyhow::Error) -> Self {
        // {:#} keeps the context chain
        PurgeError::Config(format!("{error:#}"))
    }
}
