//! Fetching pages and stylesheets
//!
//! `ResourceFetcher` is the seam between the pipeline and the network. The
//! pipeline calls it for the page markup and for every stylesheet; tests
//! substitute an in-memory implementation.

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;

use super::types::{FetchFuture, ResourceKind};
use crate::config::PurgeConfig;
use crate::utils::constants::CHROME_USER_AGENT;

/// Given a URL, return its text or fail
pub trait ResourceFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str, kind: ResourceKind) -> FetchFuture<'a>;
}

/// Timeouts and size limits for HTTP downloads
#[derive(Debug, Clone)]
pub struct DownloadLimits {
    pub timeout: Duration,
    /// Maximum size for stylesheet downloads (bytes)
    pub max_stylesheet_bytes: usize,
    /// Maximum size for page markup (bytes)
    pub max_page_bytes: usize,
}

impl DownloadLimits {
    #[must_use]
    pub fn from_config(config: &PurgeConfig) -> Self {
        Self {
            timeout: config.fetch_timeout(),
            max_stylesheet_bytes: config.max_stylesheet_bytes(),
            max_page_bytes: config.max_page_bytes(),
        }
    }

    fn max_bytes(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Page => self.max_page_bytes,
            ResourceKind::Stylesheet => self.max_stylesheet_bytes,
        }
    }
}

/// reqwest-backed fetcher shared by every request of the process
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    limits: DownloadLimits,
}

impl HttpFetcher {
    pub fn new(config: &PurgeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            limits: DownloadLimits::from_config(config),
        })
    }

    /// Reuse an existing client (it is `Arc`-backed, clones are cheap)
    #[must_use]
    pub fn with_client(client: Client, limits: DownloadLimits) -> Self {
        Self { client, limits }
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str, kind: ResourceKind) -> FetchFuture<'a> {
        Box::pin(download_text(url, &self.client, kind, &self.limits))
    }
}

fn accept_header(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Page => "text/html,application/xhtml+xml,*/*;q=0.8",
        ResourceKind::Stylesheet => "text/css,*/*;q=0.1",
    }
}

/// Download a text resource with timeout and size limits
///
/// The size limit is checked against `Content-Length` before the body is
/// read and again while streaming, since the header can be absent or wrong.
async fn download_text(
    url: &str,
    client: &Client,
    kind: ResourceKind,
    limits: &DownloadLimits,
) -> Result<String> {
    let max_bytes = limits.max_bytes(kind);

    let response = client
        .get(url)
        .timeout(limits.timeout)
        .header("Accept", accept_header(kind))
        .send()
        .await
        .with_context(|| format!("Failed to download {kind}"))?;

    if !response.status().is_success() {
        return Err(anyhow::anyhow!(
            "{kind} download failed with status: {}",
            response.status()
        ));
    }

    let expected_size = response.content_length().unwrap_or(0);
    if expected_size > max_bytes as u64 {
        return Err(anyhow::anyhow!(
            "{kind} too large: {expected_size} bytes exceeds limit of {max_bytes} bytes"
        ));
    }

    let mut buffer = if expected_size > 0 {
        Vec::with_capacity(expected_size as usize)
    } else {
        Vec::new()
    };

    let mut stream = response.bytes_stream();
    let mut total_size = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.with_context(|| format!("Failed to read {kind} chunk"))?;

        let new_total = total_size + chunk.len();
        if new_total > max_bytes {
            return Err(anyhow::anyhow!(
                "{kind} exceeded size limit during download: {new_total} bytes (max: {max_bytes})"
            ));
        }

        buffer.extend_from_slice(&chunk);
        total_size = new_total;
    }

    let text = String::from_utf8(buffer).with_context(|| format!("{kind} is not valid UTF-8"))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> DownloadLimits {
        DownloadLimits {
            timeout: Duration::from_secs(5),
            max_stylesheet_bytes: 64,
            max_page_bytes: 1024,
        }
    }

    #[tokio::test]
    async fn test_downloads_stylesheet_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/a.css")
            .match_header("accept", "text/css,*/*;q=0.1")
            .with_status(200)
            .with_body(".a{color:red}")
            .create_async()
            .await;

        let fetcher = HttpFetcher::with_client(Client::new(), limits());
        let url = format!("{}/a.css", server.url());
        let css = fetcher.fetch(&url, ResourceKind::Stylesheet).await.unwrap();

        assert_eq!(css, ".a{color:red}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.css")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpFetcher::with_client(Client::new(), limits());
        let url = format!("{}/missing.css", server.url());
        let err = fetcher
            .fetch(&url, ResourceKind::Stylesheet)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_oversized_stylesheet_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/big.css")
            .with_status(200)
            .with_body("a{}".repeat(100))
            .create_async()
            .await;

        let fetcher = HttpFetcher::with_client(Client::new(), limits());
        let url = format!("{}/big.css", server.url());
        let result = fetcher.fetch(&url, ResourceKind::Stylesheet).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_byte_order_mark_stripped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bom.css")
            .with_status(200)
            .with_body("\u{feff}a{}")
            .create_async()
            .await;

        let fetcher = HttpFetcher::with_client(Client::new(), limits());
        let url = format!("{}/bom.css", server.url());
        let css = fetcher.fetch(&url, ResourceKind::Stylesheet).await.unwrap();

        assert_eq!(css, "a{}");
    }
}
