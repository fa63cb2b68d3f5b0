//! Loading `PurgeConfig` from a JSON file
//!
//! ```json
//! {
//!   "overrides": [{ "original": "fonts.css", "path": "overrides/fonts.css" }],
//!   "safelist": { "tokens": ["active", ".open"], "patterns": ["^modal-"] },
//!   "fetch_timeout_secs": 20
//! }
//! ```
//!
//! Relative override paths are resolved against the directory holding the
//! config file, not the working directory.

use anyhow::{Context, Result};
use std::path::Path;

use super::types::{ConfigFile, PurgeConfig};

impl PurgeConfig {
    /// Read and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json_str(&raw, base_dir)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse a JSON configuration; relative paths resolve against `base_dir`
    pub fn from_json_str(raw: &str, base_dir: &Path) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(raw).context("Malformed configuration JSON")?;
        Self::from_config_file(file, base_dir)
    }

    pub fn from_config_file(file: ConfigFile, base_dir: &Path) -> Result<Self> {
        let overrides = file.overrides.into_iter().map(|mut rule| {
            if rule.path.is_relative() {
                rule.path = base_dir.join(&rule.path);
            }
            rule
        });

        let mut builder = Self::builder()
            .overrides(overrides)
            .safelist(file.safelist.tokens)
            .safelist_patterns(file.safelist.patterns);

        if let Some(secs) = file.fetch_timeout_secs {
            builder = builder.fetch_timeout_secs(secs);
        }
        if let Some(n) = file.max_concurrent_fetches {
            builder = builder.max_concurrent_fetches(n);
        }
        if let Some(bytes) = file.max_stylesheet_bytes {
            builder = builder.max_stylesheet_bytes(bytes);
        }
        if let Some(bytes) = file.max_page_bytes {
            builder = builder.max_page_bytes(bytes);
        }
        if let Some(targets) = file.targets {
            builder = builder.targets(targets);
        }
        if let Some(enabled) = file.error_recovery {
            builder = builder.error_recovery(enabled);
        }
        if let Some(dir) = file.output_dir {
            builder = builder.output_dir(dir);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrowserTargets;

    #[test]
    fn test_relative_override_resolved_against_config_dir() {
        let json = r#"{ "overrides": [{ "original": "fonts.css", "path": "local/fonts.css" }] }"#;
        let config = PurgeConfig::from_json_str(json, Path::new("/etc/css-purge")).unwrap();
        let rule = config.override_for("fonts.css").unwrap();
        assert_eq!(rule.path, Path::new("/etc/css-purge/local/fonts.css"));
    }

    #[test]
    fn test_partial_targets_keep_default_tier_for_other_browsers() {
        let json = r#"{ "targets": { "chrome": 90 } }"#;
        let config = PurgeConfig::from_json_str(json, Path::new(".")).unwrap();
        assert_eq!(config.targets().chrome, Some(90));
        assert_eq!(config.targets().firefox, BrowserTargets::default().firefox);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(PurgeConfig::from_json_str("{ overrides: ", Path::new(".")).is_err());
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = PurgeConfig::from_json_str("{}", Path::new(".")).unwrap();
        assert!(config.overrides().is_empty());
        assert!(config.error_recovery());
    }
}
