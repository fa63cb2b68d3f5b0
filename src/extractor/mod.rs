//! Stylesheet link extraction
//!
//! Parses page markup as a static HTML tree (nothing is executed) and
//! returns the external stylesheets it links, in document order. Order is
//! load-bearing: later rules with equal specificity win, so concatenation
//! downstream must follow it.

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::utils::normalize_stylesheet_href;

lazy_static! {
    // Hardcoded and syntactically valid; a parse failure is a compile-time bug.
    static ref CSS_LINK_SELECTOR: Selector =
        Selector::parse("link[rel=\"stylesheet\"]")
            .expect("BUG: hardcoded CSS selector 'link[rel=\"stylesheet\"]' is invalid");
}

/// An external stylesheet discovered in the markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylesheetReference {
    /// Absolute `http(s)` URL
    pub url: String,
    /// Media condition from the link's `media` attribute
    pub media: Option<String>,
}

impl StylesheetReference {
    pub fn new(url: impl Into<String>, media: Option<String>) -> Self {
        Self {
            url: url.into(),
            media,
        }
    }
}

/// Extract stylesheet references from markup, in document order
///
/// Relative and empty hrefs are skipped without error: many pages mix inline
/// and external styles, and only absolute links can be fetched without a
/// page base. Protocol-relative hrefs are promoted to `https://`.
#[must_use]
pub fn extract(markup: &str) -> Vec<StylesheetReference> {
    let document = Html::parse_document(markup);
    extract_from_document(&document)
}

/// Same as [`extract`] for an already-parsed document
#[must_use]
pub fn extract_from_document(document: &Html) -> Vec<StylesheetReference> {
    let mut references = Vec::new();

    for element in document.select(&CSS_LINK_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(url) = normalize_stylesheet_href(href) else {
            log::debug!("Skipping non-absolute stylesheet href: {href:?}");
            continue;
        };

        let media = element
            .value()
            .attr("media")
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        references.push(StylesheetReference { url, media });
    }

    references
}
