//! Core configuration types for the purge pipeline
//!
//! `PurgeConfig` is built once at process start (from a JSON file or the
//! builder) and shared read-only between requests.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Main configuration for purge requests
#[derive(Debug, Clone)]
pub struct PurgeConfig {
    pub(crate) overrides: Vec<OverrideRule>,
    pub(crate) safelist: SafelistSet,
    pub(crate) fetch_timeout_secs: u64,
    pub(crate) max_concurrent_fetches: usize,
    pub(crate) max_stylesheet_bytes: usize,
    pub(crate) max_page_bytes: usize,
    pub(crate) targets: BrowserTargets,
    /// Drop unparseable declarations instead of failing the transform
    pub(crate) error_recovery: bool,
    /// Root for per-run scratch directories
    pub(crate) output_dir: PathBuf,
}

/// Local file substituted for a remote stylesheet with the same basename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    /// Basename of the remote stylesheet, e.g. `fonts.css`
    pub original: String,
    /// Local replacement file
    pub path: PathBuf,
}

impl OverrideRule {
    pub fn new(original: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            original: original.into(),
            path: path.into(),
        }
    }
}

/// Selector tokens the unused-selector pass must never remove
#[derive(Debug, Clone, Default)]
pub struct SafelistSet {
    tokens: HashSet<String>,
    /// Compiled from the configured pattern strings
    patterns: Vec<Regex>,
}

impl SafelistSet {
    /// Build a safelist from tokens and regular-expression patterns.
    ///
    /// Tokens may be written as selectors (`.active`, `#main`); the leading
    /// `.` or `#` is stripped.
    pub fn new<I, S>(tokens: I, patterns: &[String]) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| {
                t.as_ref()
                    .trim()
                    .trim_start_matches(['.', '#'])
                    .to_string()
            })
            .filter(|t| !t.is_empty())
            .collect();

        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| anyhow::anyhow!("Invalid safelist pattern '{p}': {e}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self { tokens, patterns })
    }

    /// Whether a selector identifier is safelisted
    #[must_use]
    pub fn contains(&self, ident: &str) -> bool {
        self.tokens.contains(ident) || self.patterns.iter().any(|p| p.is_match(ident))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.patterns.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len() + self.patterns.len()
    }
}

/// Minimum browser versions the transform chain compiles for
///
/// Versions are major versions; `None` means the browser is not targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserTargets {
    pub chrome: Option<u32>,
    pub firefox: Option<u32>,
    pub safari: Option<u32>,
    pub ios_saf: Option<u32>,
    pub edge: Option<u32>,
    pub ie: Option<u32>,
    pub android: Option<u32>,
    pub samsung: Option<u32>,
    pub opera: Option<u32>,
}

impl Default for BrowserTargets {
    fn default() -> Self {
        Self {
            chrome: Some(61),
            firefox: Some(60),
            safari: Some(11),
            ios_saf: Some(11),
            edge: Some(16),
            ie: Some(11),
            android: None,
            samsung: None,
            opera: None,
        }
    }
}

/// On-disk shape of the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub overrides: Vec<OverrideRule>,
    pub safelist: SafelistFile,
    pub fetch_timeout_secs: Option<u64>,
    pub max_concurrent_fetches: Option<usize>,
    pub max_stylesheet_bytes: Option<usize>,
    pub max_page_bytes: Option<usize>,
    pub targets: Option<BrowserTargets>,
    pub error_recovery: Option<bool>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SafelistFile {
    pub tokens: Vec<String>,
    pub patterns: Vec<String>,
}
