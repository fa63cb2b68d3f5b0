//! URL helpers for stylesheet references.

use url::Url;

/// Normalize a `<link>` href into an absolute stylesheet URL.
///
/// Only `http://`, `https://` and protocol-relative `//` hrefs are accepted;
/// protocol-relative ones are promoted to `https://`. Everything else
/// (relative paths, empty values, `data:` and friends) yields `None`.
#[must_use]
pub fn normalize_stylesheet_href(href: &str) -> Option<String> {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else if let Some(rest) = href.strip_prefix("//") {
        if rest.is_empty() {
            None
        } else {
            Some(format!("https://{rest}"))
        }
    } else {
        None
    }
}

/// Last path segment of a URL, without query or fragment.
///
/// `https://ex.com/assets/fonts.css?v=3` yields `fonts.css`. A URL with an
/// empty path yields an empty string.
#[must_use]
pub fn file_name_of(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        return parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string();
    }

    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    without_query
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Check if a string is an http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
