//! Vendor prefixing for the configured browser tier

use super::chain::CssPass;
use super::lightning::compile;
use super::targets::full_targets;
use crate::config::BrowserTargets;

#[derive(Debug, Clone, Copy)]
pub struct PrefixPass {
    targets: BrowserTargets,
    error_recovery: bool,
}

impl PrefixPass {
    #[must_use]
    pub fn new(targets: BrowserTargets, error_recovery: bool) -> Self {
        Self {
            targets,
            error_recovery,
        }
    }
}

impl CssPass for PrefixPass {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn apply(&self, css: &str, _markup: &str) -> anyhow::Result<String> {
        compile(css, full_targets(&self.targets), self.error_recovery, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_select_prefixed_for_legacy_tier() {
        let out = PrefixPass::new(BrowserTargets::default(), true)
            .apply(".a { user-select: none; }", "")
            .unwrap();
        assert!(out.contains("-webkit-user-select"), "{out}");
    }

    #[test]
    fn test_modern_tier_needs_no_prefix() {
        let modern = BrowserTargets {
            chrome: Some(120),
            firefox: Some(120),
            safari: None,
            ios_saf: None,
            edge: Some(120),
            ie: None,
            android: None,
            samsung: None,
            opera: None,
        };
        let out = PrefixPass::new(modern, true)
            .apply(".a { transform: rotate(1deg); }", "")
            .unwrap();
        assert!(!out.contains("-webkit-transform"), "{out}");
    }
}
