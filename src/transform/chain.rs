//! The ordered transform chain
//!
//! Each pass consumes and produces full CSS text. The chain either returns
//! the output of the last pass or a `TransformError` naming the pass that
//! failed; partial output is never returned.

use std::time::Instant;

use super::compat::CompatibilityPass;
use super::lowering::LoweringPass;
use super::minify::MinifyPass;
use super::prefix::PrefixPass;
use super::purge::PurgePass;
use crate::config::PurgeConfig;
use crate::error::{PurgeError, PurgeResult};

/// A CSS-to-CSS transformation
pub trait CssPass: Send + Sync {
    /// Stage name reported in errors and logs
    fn name(&self) -> &'static str;

    /// Transform `css`; `markup` is the page the stylesheet belongs to
    fn apply(&self, css: &str, markup: &str) -> anyhow::Result<String>;
}

pub struct TransformChain {
    passes: Vec<Box<dyn CssPass>>,
}

impl TransformChain {
    /// The fixed production order: compatibility, lowering, prefix, purge, minify
    #[must_use]
    pub fn standard(config: &PurgeConfig) -> Self {
        let targets = *config.targets();
        let error_recovery = config.error_recovery();

        Self::from_passes(vec![
            Box::new(CompatibilityPass),
            Box::new(LoweringPass::new(targets, error_recovery)),
            Box::new(PrefixPass::new(targets, error_recovery)),
            Box::new(PurgePass::new(config.safelist().clone(), targets, error_recovery)),
            Box::new(MinifyPass::new(targets, error_recovery)),
        ])
    }

    #[must_use]
    pub fn from_passes(passes: Vec<Box<dyn CssPass>>) -> Self {
        Self { passes }
    }

    /// Stage names in execution order
    #[must_use]
    pub fn stages(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass in order
    ///
    /// # Errors
    ///
    /// `TransformError` carrying the failing stage's name.
    pub fn run(&self, css: &str, markup: &str) -> PurgeResult<String> {
        let mut current = css.to_string();

        for pass in &self.passes {
            let started = Instant::now();
            let input_len = current.len();

            current = pass.apply(&current, markup).map_err(|e| {
                log::error!("{} pass failed: {e:#}", pass.name());
                PurgeError::transform(pass.name(), format!("{e:#}"))
            })?;

            log::debug!(
                "{} pass: {input_len} -> {} bytes in {:?}",
                pass.name(),
                current.len(),
                started.elapsed()
            );
        }

        Ok(current)
    }
}
