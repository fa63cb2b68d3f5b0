//! Builder for `PurgeConfig`
//!
//! Every field has a default, so `PurgeConfig::builder().build()` is a
//! valid configuration with no overrides and an empty safelist. Validation
//! happens once, in `build()`.

use crate::utils::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_FETCHES, DEFAULT_MAX_PAGE_BYTES,
    DEFAULT_MAX_STYLESHEET_BYTES, DEFAULT_OUTPUT_DIR,
};
use anyhow::{Result, anyhow, bail};
use std::collections::HashSet;
use std::path::PathBuf;

use super::types::{BrowserTargets, OverrideRule, PurgeConfig, SafelistSet};

impl PurgeConfig {
    #[must_use]
    pub fn builder() -> PurgeConfigBuilder {
        PurgeConfigBuilder::default()
    }

    /// Same configuration writing to a different output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            overrides: Vec::new(),
            safelist: SafelistSet::default(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            max_stylesheet_bytes: DEFAULT_MAX_STYLESHEET_BYTES,
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
            targets: BrowserTargets::default(),
            error_recovery: true,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

pub struct PurgeConfigBuilder {
    pub(crate) overrides: Vec<OverrideRule>,
    pub(crate) safelist_tokens: Vec<String>,
    pub(crate) safelist_patterns: Vec<String>,
    pub(crate) fetch_timeout_secs: u64,
    pub(crate) max_concurrent_fetches: usize,
    pub(crate) max_stylesheet_bytes: usize,
    pub(crate) max_page_bytes: usize,
    pub(crate) targets: BrowserTargets,
    pub(crate) error_recovery: bool,
    pub(crate) output_dir: PathBuf,
}

impl Default for PurgeConfigBuilder {
    fn default() -> Self {
        Self {
            overrides: Vec::new(),
            safelist_tokens: Vec::new(),
            safelist_patterns: Vec::new(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            max_stylesheet_bytes: DEFAULT_MAX_STYLESHEET_BYTES,
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
            targets: BrowserTargets::default(),
            error_recovery: true,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl PurgeConfigBuilder {
    /// Substitute the local file at `path` for any stylesheet named `original`
    #[must_use]
    pub fn override_file(mut self, original: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.overrides.push(OverrideRule::new(original, path));
        self
    }

    #[must_use]
    pub fn overrides(mut self, rules: impl IntoIterator<Item = OverrideRule>) -> Self {
        self.overrides.extend(rules);
        self
    }

    #[must_use]
    pub fn safelist<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.safelist_tokens.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Regular expressions matched against selector identifiers
    #[must_use]
    pub fn safelist_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.safelist_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn max_concurrent_fetches(mut self, n: usize) -> Self {
        self.max_concurrent_fetches = n;
        self
    }

    #[must_use]
    pub fn max_stylesheet_bytes(mut self, bytes: usize) -> Self {
        self.max_stylesheet_bytes = bytes;
        self
    }

    #[must_use]
    pub fn max_page_bytes(mut self, bytes: usize) -> Self {
        self.max_page_bytes = bytes;
        self
    }

    #[must_use]
    pub fn targets(mut self, targets: BrowserTargets) -> Self {
        self.targets = targets;
        self
    }

    #[must_use]
    pub fn error_recovery(mut self, enabled: bool) -> Self {
        self.error_recovery = enabled;
        self
    }

    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Fails on duplicate or non-basename override names, zero timeouts or
    /// concurrency, and invalid safelist patterns.
    pub fn build(self) -> Result<PurgeConfig> {
        let mut seen = HashSet::new();
        for rule in &self.overrides {
            if rule.original.is_empty() || rule.original.contains('/') {
                bail!(
                    "Override name '{}' must be a bare file name",
                    rule.original
                );
            }
            if !seen.insert(rule.original.as_str()) {
                bail!("Duplicate override for '{}'", rule.original);
            }
        }

        if self.fetch_timeout_secs == 0 {
            bail!("fetch_timeout_secs must be at least 1");
        }
        if self.max_concurrent_fetches == 0 {
            bail!("max_concurrent_fetches must be at least 1");
        }

        let safelist = SafelistSet::new(&self.safelist_tokens, &self.safelist_patterns)
            .map_err(|e| anyhow!("Invalid safelist: {e}"))?;

        Ok(PurgeConfig {
            overrides: self.overrides,
            safelist,
            fetch_timeout_secs: self.fetch_timeout_secs,
            max_concurrent_fetches: self.max_concurrent_fetches,
            max_stylesheet_bytes: self.max_stylesheet_bytes,
            max_page_bytes: self.max_page_bytes,
            targets: self.targets,
            error_recovery: self.error_recovery,
            output_dir: self.output_dir,
        })
    }
}
