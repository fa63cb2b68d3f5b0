//! Where the page markup comes from

use std::path::PathBuf;

use crate::config::PurgeConfig;
use crate::error::{PurgeError, PurgeResult};
use crate::resolver::{ResourceFetcher, ResourceKind};
use crate::utils::is_valid_url;

/// Page to purge against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// Remote page, fetched over HTTP
    Url(String),
    /// Local HTML file
    File(PathBuf),
    /// Markup already in memory
    Markup(String),
}

impl PageSource {
    /// Interpret a command-line target: `http(s)://` URLs are fetched,
    /// anything else is a file path
    #[must_use]
    pub fn from_target(target: &str) -> Self {
        let trimmed = target.trim();
        if (trimmed.starts_with("http://") || trimmed.starts_with("https://"))
            && is_valid_url(trimmed)
        {
            PageSource::Url(trimmed.to_string())
        } else {
            PageSource::File(PathBuf::from(trimmed))
        }
    }

    /// Human-readable name for logs and error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            PageSource::Url(url) => url.clone(),
            PageSource::File(path) => path.display().to_string(),
            PageSource::Markup(_) => "<inline markup>".to_string(),
        }
    }

    /// Load the markup
    ///
    /// # Errors
    ///
    /// `PageFetch` when the page cannot be downloaded, times out, or the file
    /// cannot be read.
    pub async fn load(
        &self,
        config: &PurgeConfig,
        fetcher: &dyn ResourceFetcher,
    ) -> PurgeResult<String> {
        match self {
            PageSource::Markup(markup) => Ok(markup.clone()),
            PageSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                PurgeError::PageFetch {
                    target: self.describe(),
                    cause: e.to_string(),
                }
            }),
            PageSource::Url(url) => {
                log::info!("Fetching page {url}");
                match tokio::time::timeout(
                    config.fetch_timeout(),
                    fetcher.fetch(url, ResourceKind::Page),
                )
                .await
                {
                    Ok(Ok(markup)) => Ok(markup),
                    Ok(Err(e)) => Err(PurgeError::PageFetch {
                        target: url.clone(),
                        cause: format!("{e:#}"),
                    }),
                    Err(_) => Err(PurgeError::PageFetch {
                        target: url.clone(),
                        cause: format!("timed out after {:?}", config.fetch_timeout()),
                    }),
                }
            }
        }
    }
}
