//! Getter methods for `PurgeConfig`

use std::path::Path;
use std::time::Duration;

use super::types::{BrowserTargets, OverrideRule, PurgeConfig, SafelistSet};

impl PurgeConfig {
    #[must_use]
    pub fn overrides(&self) -> &[OverrideRule] {
        &self.overrides
    }

    /// Override configured for a stylesheet basename, if any
    #[must_use]
    pub fn override_for(&self, file_name: &str) -> Option<&OverrideRule> {
        self.overrides.iter().find(|rule| rule.original == file_name)
    }

    #[must_use]
    pub fn safelist(&self) -> &SafelistSet {
        &self.safelist
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches
    }

    #[must_use]
    pub fn max_stylesheet_bytes(&self) -> usize {
        self.max_stylesheet_bytes
    }

    #[must_use]
    pub fn max_page_bytes(&self) -> usize {
        self.max_page_bytes
    }

    #[must_use]
    pub fn targets(&self) -> &BrowserTargets {
        &self.targets
    }

    #[must_use]
    pub fn error_recovery(&self) -> bool {
        self.error_recovery
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
