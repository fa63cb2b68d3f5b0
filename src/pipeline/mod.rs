//! End-to-end purge pipeline
//!
//! extract → resolve → concatenate → transform → (split). The configuration
//! is shared read-only; everything else lives for one request.

pub mod output;
pub mod page;

use std::sync::Arc;

use serde::Serialize;

pub use output::{RunWorkspace, SplitIndex, SplitIndexEntry, new_run_id};
pub use page::PageSource;

use crate::config::PurgeConfig;
use crate::error::{PurgeError, PurgeResult};
use crate::extractor::extract;
use crate::resolver::{ResourceFetcher, SkippedReference, StylesheetOrigin, resolve_all};
use crate::splitter::{SplitResult, split};
use crate::transform::TransformChain;
use crate::utils::constants::{PURGED_CONTENT_DISPOSITION, PURGED_CONTENT_TYPE};

/// A stylesheet that made it into the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSummary {
    pub url: String,
    pub file_name: String,
    pub origin: StylesheetOrigin,
    pub media: Option<String>,
}

/// What a run used and what it skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub resolved: Vec<ResolvedSummary>,
    pub skipped: Vec<SkippedReference>,
    pub input_bytes: usize,
    pub output_bytes: usize,
}

/// Result of one purge request
#[derive(Debug, Clone)]
pub struct PurgeOutput {
    pub css: String,
    /// Present when splitting was requested
    pub split: Option<SplitResult>,
    pub report: RunReport,
}

impl PurgeOutput {
    /// Response headers for serving the unsplit result as a download;
    /// `None` in split mode
    #[must_use]
    pub fn download_headers(&self) -> Option<[(&'static str, &'static str); 2]> {
        self.split.is_none().then_some([
            ("Content-Type", PURGED_CONTENT_TYPE),
            ("Content-Disposition", PURGED_CONTENT_DISPOSITION),
        ])
    }
}

/// Purge the stylesheets linked from `markup`
///
/// # Errors
///
/// `NoStylesheetsFound` when the page links no usable stylesheet or every
/// download failed; any fatal resolver or transform error aborts the run.
pub async fn purge_page(
    markup: &str,
    config: Arc<PurgeConfig>,
    fetcher: &dyn ResourceFetcher,
    split_output: bool,
) -> PurgeResult<PurgeOutput> {
    let references = extract(markup);
    if references.is_empty() {
        log::info!("Page links no external stylesheets");
        return Err(PurgeError::NoStylesheetsFound);
    }
    log::info!("Found {} stylesheet links", references.len());

    let outcome = resolve_all(&references, &config, fetcher).await?;
    if outcome.stylesheets.is_empty() {
        log::warn!(
            "All {} stylesheet downloads failed, nothing to purge",
            outcome.skipped.len()
        );
        return Err(PurgeError::NoStylesheetsFound);
    }

    if outcome.has_failures() {
        log::warn!(
            "Continuing without {} of {} stylesheets",
            outcome.skipped.len(),
            references.len()
        );
    }

    let concatenated = outcome.concatenated_css();
    let input_bytes = concatenated.len();

    let chain_config = Arc::clone(&config);
    let markup_owned: Arc<str> = Arc::from(markup);
    let css = tokio::task::spawn_blocking(move || {
        TransformChain::standard(&chain_config).run(&concatenated, &markup_owned)
    })
    .await
    .map_err(|e| PurgeError::transform("chain", format!("transform task panicked: {e}")))??;

    log::info!(
        "Purged {} stylesheets: {input_bytes} bytes in, {} bytes out",
        outcome.stylesheets.len(),
        css.len()
    );

    let groups = split_output.then(|| split(&css));

    let report = RunReport {
        resolved: outcome
            .stylesheets
            .into_iter()
            .map(|s| ResolvedSummary {
                url: s.url,
                file_name: s.file_name,
                origin: s.origin,
                media: s.media,
            })
            .collect(),
        skipped: outcome.skipped,
        input_bytes,
        output_bytes: css.len(),
    };

    Ok(PurgeOutput {
        css,
        split: groups,
        report,
    })
}

fn output_error(e: anyhow::Error) -> PurgeError {
    PurgeError::Io(std::io::Error::other(format!("{e:#}")))
}

/// Load the page, purge it, and write the run's files
///
/// Returns the output together with the workspace the files went to.
pub async fn run(
    source: &PageSource,
    config: Arc<PurgeConfig>,
    fetcher: &dyn ResourceFetcher,
    split_output: bool,
) -> PurgeResult<(PurgeOutput, RunWorkspace)> {
    let markup = source.load(&config, fetcher).await?;

    let workspace = RunWorkspace::create(config.output_dir())
        .await
        .map_err(output_error)?;
    log::info!("Run {} for {}", workspace.run_id(), source.describe());

    workspace
        .write_page(&markup)
        .await
        .map_err(output_error)?;

    let output = purge_page(&markup, config, fetcher, split_output).await?;

    let written = match &output.split {
        Some(split) => workspace.write_split(split).await.map(|_| ()),
        None => workspace.write_purged(&output.css).await.map(|_| ()),
    };
    written.map_err(output_error)?;

    Ok((output, workspace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{FetchFuture, ResourceKind};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapFetcher(HashMap<String, String>);

    impl MapFetcher {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.0.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl ResourceFetcher for MapFetcher {
        fn fetch<'a>(&'a self, url: &'a str, _kind: ResourceKind) -> FetchFuture<'a> {
            let body = self.0.get(url).cloned();
            Box::pin(async move { body.ok_or_else(|| anyhow::anyhow!("HTTP 404")) })
        }
    }

    #[tokio::test]
    async fn test_no_links() {
        let err = purge_page(
            "<html><head></head></html>",
            Arc::new(PurgeConfig::default()),
            &MapFetcher::default(),
            false,
        )
        .await
        .unwrap_err();
        assert!(err.is_empty_result());
    }

    #[tokio::test]
    async fn test_all_downloads_failed() {
        let markup = r#"<link rel="stylesheet" href="https://ex.com/a.css">"#;
        let err = purge_page(
            markup,
            Arc::new(PurgeConfig::default()),
            &MapFetcher::default(),
            false,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PurgeError::NoStylesheetsFound));
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported() {
        let markup = r#"
            <link rel="stylesheet" href="https://ex.com/a.css">
            <link rel="stylesheet" href="https://ex.com/gone.css">
            <div class="a"></div>
        "#;
        let fetcher = MapFetcher::default().with("https://ex.com/a.css", ".a{color:red}.b{color:blue}");
        let output = purge_page(markup, Arc::new(PurgeConfig::default()), &fetcher, false)
            .await
            .unwrap();

        assert!(output.css.contains(".a{color:red}"), "{}", output.css);
        assert!(!output.css.contains(".b"), "{}", output.css);
        assert_eq!(output.report.resolved.len(), 1);
        assert_eq!(output.report.skipped.len(), 1);
        assert_eq!(output.report.skipped[0].url, "https://ex.com/gone.css");
        assert!(output.split.is_none());

        let headers = output.download_headers().unwrap();
        assert_eq!(headers[0], ("Content-Type", "text/css"));
        assert_eq!(
            headers[1],
            ("Content-Disposition", "attachment; filename=\"purged.css\"")
        );
    }

    #[tokio::test]
    async fn test_media_link_is_split_out() {
        let markup = r#"
            <link rel="stylesheet" href="https://ex.com/a.css">
            <link rel="stylesheet" href="https://ex.com/wide.css" media="(min-width: 961px)">
            <div class="a wide"></div>
        "#;
        let fetcher = MapFetcher::default()
            .with("https://ex.com/a.css", ".a{color:red}")
            .with("https://ex.com/wide.css", ".wide{margin:0 auto}");
        let output = purge_page(markup, Arc::new(PurgeConfig::default()), &fetcher, true)
            .await
            .unwrap();

        assert!(output.download_headers().is_none());
        let split = output.split.unwrap();
        assert_eq!(split.base(), ".a{color:red}");
        let keys: Vec<&str> = split.keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(keys[1].starts_with("media-min-width"), "{keys:?}");
        assert!(split.groups()[1].css.contains(".wide"));
    }
}
