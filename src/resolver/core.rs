//! Resolving stylesheet references into CSS text
//!
//! Each reference is served from a local override when one matches its
//! basename, otherwise downloaded. Downloads run with bounded concurrency but
//! results land in index-addressed slots, so the output follows reference
//! order no matter which download finishes first.

use futures::StreamExt;
use futures::stream;
use regex::Regex;
use std::sync::LazyLock;

use super::fetcher::ResourceFetcher;
use super::types::{
    ResolutionOutcome, ResolvedStylesheet, ResourceKind, SkippedReference, StylesheetOrigin,
};
use super::url_rewrite::rewrite_relative_urls;
use crate::config::PurgeConfig;
use crate::error::{PurgeError, PurgeResult};
use crate::extractor::StylesheetReference;
use crate::utils::file_name_of;

// @charset is only valid as the very first statement of a file, so it cannot
// survive concatenation or media wrapping.
static CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\s*@charset\s+(?:"[^"]*"|'[^']*')\s*;"#)
        .expect("CHARSET_RE: hardcoded regex is valid")
});

/// Structural plausibility check: at least one `{` and one `}`
#[must_use]
pub fn is_plausible_css(css: &str) -> bool {
    css.contains('{') && css.contains('}')
}

/// Wrap CSS text in `@media <condition> { ... }`
#[must_use]
pub fn wrap_in_media(css: &str, condition: &str) -> String {
    format!("@media {condition} {{\n{css}\n}}")
}

fn strip_charset(css: &str) -> &str {
    match CHARSET_RE.find(css) {
        Some(m) => &css[m.end()..],
        None => css,
    }
}

/// Resolve a single reference
///
/// # Errors
///
/// `FetchFailed` when the download fails or times out (the caller skips the
/// reference); `OverrideFileMissing` and `InvalidCss` abort the request.
pub async fn resolve_reference(
    reference: &StylesheetReference,
    config: &PurgeConfig,
    fetcher: &dyn ResourceFetcher,
) -> PurgeResult<ResolvedStylesheet> {
    let file_name = file_name_of(&reference.url);

    let (css, origin, source_name) = if let Some(rule) = config.override_for(&file_name) {
        let css = tokio::fs::read_to_string(&rule.path).await.map_err(|e| {
            log::error!(
                "Override for {file_name} points at unreadable file {}: {e}",
                rule.path.display()
            );
            PurgeError::OverrideFileMissing {
                path: rule.path.clone(),
            }
        })?;
        log::info!(
            "Using local override {} for {}",
            rule.path.display(),
            reference.url
        );
        (css, StylesheetOrigin::LocalOverride, rule.path.display().to_string())
    } else {
        let fetched = tokio::time::timeout(
            config.fetch_timeout(),
            fetcher.fetch(&reference.url, ResourceKind::Stylesheet),
        )
        .await;

        let css = match fetched {
            Ok(Ok(css)) => css,
            Ok(Err(e)) => return Err(PurgeError::fetch_failed(&reference.url, format!("{e:#}"))),
            Err(_) => {
                return Err(PurgeError::fetch_failed(
                    &reference.url,
                    format!("timed out after {:?}", config.fetch_timeout()),
                ));
            }
        };

        let css = rewrite_relative_urls(&css, &reference.url);
        (css, StylesheetOrigin::Remote, reference.url.clone())
    };

    if !is_plausible_css(&css) {
        return Err(PurgeError::InvalidCss { source_name });
    }

    let css = strip_charset(&css);
    let css_text = match &reference.media {
        Some(condition) => wrap_in_media(css, condition),
        None => css.to_string(),
    };

    Ok(ResolvedStylesheet {
        url: reference.url.clone(),
        file_name,
        css_text,
        origin,
        media: reference.media.clone(),
    })
}

/// Resolve all references of a request, preserving reference order
///
/// Failed downloads are logged and reported in `skipped`. The first fatal
/// error aborts the request; downloads still in flight are dropped.
pub async fn resolve_all(
    references: &[StylesheetReference],
    config: &PurgeConfig,
    fetcher: &dyn ResourceFetcher,
) -> PurgeResult<ResolutionOutcome> {
    let mut slots: Vec<Option<PurgeResult<ResolvedStylesheet>>> =
        (0..references.len()).map(|_| None).collect();

    let mut in_flight = stream::iter(references.iter().enumerate())
        .map(|(index, reference)| async move {
            (index, resolve_reference(reference, config, fetcher).await)
        })
        .buffer_unordered(config.max_concurrent_fetches());

    while let Some((index, result)) = in_flight.next().await {
        match result {
            Err(e) if e.is_fatal() => {
                log::error!("Aborting request: {e}");
                return Err(e);
            }
            result => slots[index] = Some(result),
        }
    }

    let mut outcome = ResolutionOutcome::default();
    for (reference, slot) in references.iter().zip(slots) {
        match slot {
            Some(Ok(stylesheet)) => {
                log::debug!(
                    "Resolved {} ({}, {} bytes)",
                    stylesheet.file_name,
                    stylesheet.origin,
                    stylesheet.css_text.len()
                );
                outcome.stylesheets.push(stylesheet);
            }
            Some(Err(PurgeError::FetchFailed { url, cause })) => {
                log::warn!("Failed to download CSS from {url}: {cause}");
                outcome.skipped.push(SkippedReference { url, cause });
            }
            Some(Err(other)) => return Err(other),
            None => {
                log::warn!("No result recorded for {}", reference.url);
            }
        }
    }

    Ok(outcome)
}
