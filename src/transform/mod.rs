//! CSS transform chain
//!
//! Fixed, ordered CSS-to-CSS passes applied once per request to the
//! concatenated stylesheet: compatibility fixes, syntax lowering, vendor
//! prefixing, unused-selector removal and minification.

// Sub-modules
pub mod chain;
pub mod compat;
mod lightning;
pub mod lowering;
pub mod minify;
pub mod prefix;
pub mod purge;
pub mod targets;
pub mod tokens;

// Re-exports for public API
pub use chain::{CssPass, TransformChain};
pub use compat::{CompatibilityPass, fix_flexbugs, fix_flexbugs_compact};
pub use lowering::LoweringPass;
pub use minify::MinifyPass;
pub use prefix::PrefixPass;
pub use purge::{PurgePass, purge_unused};
pub use tokens::extract_used_tokens;

use crate::config::PurgeConfig;
use crate::error::PurgeResult;

/// Run the standard chain over `css` for the page `markup`
pub fn transform(css: &str, markup: &str, config: &PurgeConfig) -> PurgeResult<String> {
    TransformChain::standard(config).run(css, markup)
}
