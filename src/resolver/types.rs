//! Type definitions for stylesheet resolution

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// What a fetch is for; selects the `Accept` header and size limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Page,
    Stylesheet,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Page => write!(f, "page"),
            ResourceKind::Stylesheet => write!(f, "stylesheet"),
        }
    }
}

/// Type alias for a boxed fetch future
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;

/// Where a resolved stylesheet's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylesheetOrigin {
    LocalOverride,
    Remote,
}

impl std::fmt::Display for StylesheetOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StylesheetOrigin::LocalOverride => write!(f, "local-override"),
            StylesheetOrigin::Remote => write!(f, "remote"),
        }
    }
}

/// A stylesheet reference whose CSS text is ready for the transform chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStylesheet {
    pub url: String,
    pub file_name: String,
    /// Rewritten and, when `media` is set, already wrapped in `@media`
    pub css_text: String,
    pub origin: StylesheetOrigin,
    pub media: Option<String>,
}

/// A reference dropped because its download failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedReference {
    pub url: String,
    pub cause: String,
}

/// Result of resolving every reference of one request
#[derive(Debug, Clone, Default)]
pub struct ResolutionOutcome {
    /// In reference order
    pub stylesheets: Vec<ResolvedStylesheet>,
    pub skipped: Vec<SkippedReference>,
}

impl ResolutionOutcome {
    /// Concatenate the resolved CSS in reference order
    #[must_use]
    pub fn concatenated_css(&self) -> String {
        self.stylesheets
            .iter()
            .map(|s| s.css_text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.skipped.is_empty()
    }
}
