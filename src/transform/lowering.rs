//! Modern-syntax lowering
//!
//! Nesting, range media queries, modern color functions and similar syntax
//! are compiled down to what the configured browser tier understands.
//! Vendor prefixing is left to the next pass.

use super::chain::CssPass;
use super::lightning::compile;
use super::targets::lowering_targets;
use crate::config::BrowserTargets;

#[derive(Debug, Clone, Copy)]
pub struct LoweringPass {
    targets: BrowserTargets,
    error_recovery: bool,
}

impl LoweringPass {
    #[must_use]
    pub fn new(targets: BrowserTargets, error_recovery: bool) -> Self {
        Self {
            targets,
            error_recovery,
        }
    }
}

impl CssPass for LoweringPass {
    fn name(&self) -> &'static str {
        "lowering"
    }

    fn apply(&self, css: &str, _markup: &str) -> anyhow::Result<String> {
        compile(
            css,
            lowering_targets(&self.targets),
            self.error_recovery,
            false,
        )
    }
}
