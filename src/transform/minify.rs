//! Final minification
//!
//! The flexbox workarounds are re-applied to the printed output, since the
//! printer collapses `flex: 1 1 0%` back to `flex:1`.

use super::chain::CssPass;
use super::compat::fix_flexbugs_compact;
use super::lightning::compile;
use super::targets::full_targets;
use crate::config::BrowserTargets;

#[derive(Debug, Clone, Copy)]
pub struct MinifyPass {
    targets: BrowserTargets,
    error_recovery: bool,
}

impl MinifyPass {
    #[must_use]
    pub fn new(targets: BrowserTargets, error_recovery: bool) -> Self {
        Self {
            targets,
            error_recovery,
        }
    }
}

impl CssPass for MinifyPass {
    fn name(&self) -> &'static str {
        "minify"
    }

    fn apply(&self, css: &str, _markup: &str) -> anyhow::Result<String> {
        let minified = compile(css, full_targets(&self.targets), self.error_recovery, true)?;
        Ok(fix_flexbugs_compact(&minified))
    }
}
