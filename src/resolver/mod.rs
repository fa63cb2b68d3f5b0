//! Stylesheet resolution
//!
//! Turns extracted references into CSS text: local override or download,
//! relative `url()` rewriting, plausibility check, media wrapping.

// Sub-modules
pub mod core;
pub mod fetcher;
pub mod types;
pub mod url_rewrite;

// Re-exports for public API
pub use self::core::{is_plausible_css, resolve_all, resolve_reference, wrap_in_media};
pub use fetcher::{DownloadLimits, HttpFetcher, ResourceFetcher};
pub use types::{
    FetchFuture, ResolutionOutcome, ResolvedStylesheet, ResourceKind, SkippedReference,
    StylesheetOrigin,
};
pub use url_rewrite::rewrite_relative_urls;
