//! Absolutizing relative asset URLs inside fetched CSS
//!
//! Once a remote stylesheet is concatenated with others and served from a
//! different location, `url(../img/bg.png)` no longer points anywhere. Only
//! paths starting with `./` or `../` are rewritten; absolute, root-relative
//! and `data:` URLs are left as written.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use url::Url;

// url("..."), url('...') or url(...), with optional inner whitespace
static CSS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^'"\s)]*))\s*\)"#)
        .expect("CSS_URL_RE: hardcoded regex is valid")
});

fn is_dot_relative(path: &str) -> bool {
    path.starts_with("./") || path.starts_with("../")
}

/// Rewrite `./` and `../` `url()` references against `stylesheet_url`
///
/// Quoting style is preserved. If `stylesheet_url` is not a valid URL the CSS
/// is returned unchanged.
#[must_use]
pub fn rewrite_relative_urls(css: &str, stylesheet_url: &str) -> String {
    let Ok(base) = Url::parse(stylesheet_url) else {
        log::warn!("Cannot rewrite url() references: invalid stylesheet URL {stylesheet_url}");
        return css.to_string();
    };

    CSS_URL_RE
        .replace_all(css, |caps: &Captures| {
            let (path, quote) = if let Some(m) = caps.get(1) {
                (m.as_str(), "\"")
            } else if let Some(m) = caps.get(2) {
                (m.as_str(), "'")
            } else {
                (caps.get(3).map_or("", |m| m.as_str()), "")
            };

            if !is_dot_relative(path) {
                return caps[0].to_string();
            }

            match base.join(path) {
                Ok(absolute) => format!("url({quote}{absolute}{quote})"),
                Err(e) => {
                    log::debug!("Leaving url({path}) untouched: {e}");
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}
