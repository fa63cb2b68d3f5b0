//! Shared configuration constants for css_purge
//!
//! Default values used by the configuration builder and the output writers,
//! kept in one place to avoid magic numbers.

/// Default per-fetch timeout: 30 seconds
///
/// Applies to the page markup and to every stylesheet download. A timeout is
/// reported the same way as any other failed download.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default number of stylesheet downloads in flight at once
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 6;

/// Maximum size for a single stylesheet download (bytes)
///
/// Typical: 50-200KB, large frameworks: 500KB-1MB.
pub const DEFAULT_MAX_STYLESHEET_BYTES: usize = 2 * 1024 * 1024;

/// Maximum size for the page markup (bytes)
pub const DEFAULT_MAX_PAGE_BYTES: usize = 10 * 1024 * 1024;

/// Default root for per-run scratch directories
pub const DEFAULT_OUTPUT_DIR: &str = ".cache/css-purge";

/// File name of the unsplit output
pub const PURGED_FILE_NAME: &str = "purged.css";

/// Content type the HTTP layer serves `purged.css` with
pub const PURGED_CONTENT_TYPE: &str = "text/css";

/// Content disposition the HTTP layer serves `purged.css` with
pub const PURGED_CONTENT_DISPOSITION: &str = "attachment; filename=\"purged.css\"";

/// Directory (inside the run directory) that receives split output
pub const SPLIT_DIR_NAME: &str = "css-split";

/// Index file written next to the split stylesheets
pub const SPLIT_INDEX_FILE_NAME: &str = "index.json";

/// Copy of the page markup kept in the run directory
pub const PAGE_FILE_NAME: &str = "page.html";

/// Chrome user agent string sent with every request
///
/// Some CDNs serve stripped or empty stylesheets to unknown agents.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
