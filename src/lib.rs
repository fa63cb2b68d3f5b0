//! Collects a page's linked stylesheets, drops the selectors its markup never
//! uses, and optionally splits the result by media query.
//!
//! ```no_run
//! use std::sync::Arc;
//! use css_purge::{HttpFetcher, PageSource, PurgeConfig, run};
//!
//! # async fn demo() -> css_purge::PurgeResult<()> {
//! let config = Arc::new(PurgeConfig::default());
//! let fetcher = HttpFetcher::new(&config)?;
//! let source = PageSource::from_target("https://example.com/");
//! let (output, workspace) = run(&source, config, &fetcher, false).await?;
//! println!("{} bytes in {}", output.css.len(), workspace.root().display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod resolver;
pub mod splitter;
pub mod transform;
pub mod utils;

pub use config::{BrowserTargets, OverrideRule, PurgeConfig, PurgeConfigBuilder, SafelistSet};
pub use error::{PurgeError, PurgeResult};
pub use extractor::{StylesheetReference, extract};
pub use pipeline::{
    PageSource, PurgeOutput, RunReport, RunWorkspace, SplitIndex, purge_page, run,
};
pub use resolver::{
    HttpFetcher, ResolvedStylesheet, ResourceFetcher, ResourceKind, StylesheetOrigin,
    resolve_all,
};
pub use splitter::{SplitGroup, SplitResult, split};
pub use transform::{TransformChain, transform};
