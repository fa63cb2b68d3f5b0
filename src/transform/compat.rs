//! Flexbox bug workarounds
//!
//! IE10-11 and old Safari mishandle the `flex` shorthand when the basis is
//! omitted or written as a unitless zero. The shorthand is rewritten so the
//! basis is always explicit and carries a unit:
//!
//! - `flex: 1` → `flex: 1 1 0%`
//! - `flex: 1 2` → `flex: 1 2 0%`
//! - `flex: 1 1 0` → `flex: 1 1 0%`
//!
//! The `-ms-` and `-webkit-` prefixed shorthands get the same treatment.
//! lightningcss prints `flex: 1 1 0%` back as `flex:1`, so the minify pass
//! runs [`fix_flexbugs_compact`] again over its printed output.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::chain::CssPass;

static FLEX_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|[{;\s])((?:-ms-|-webkit-)?flex)\s*:\s*([^;{}]*)")
        .expect("FLEX_DECL_RE: hardcoded regex is valid")
});

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d*\.?\d+$").expect("NUMBER_RE: hardcoded regex is valid")
});

fn is_number(token: &str) -> bool {
    NUMBER_RE.is_match(token)
}

/// Rewritten shorthand value, or `None` when no workaround applies
fn fix_flex_value(value: &str) -> Option<String> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [grow] if is_number(grow) => Some(format!("{grow} 1 0%")),
        [grow, shrink] if is_number(grow) && is_number(shrink) => {
            Some(format!("{grow} {shrink} 0%"))
        }
        [grow, shrink, "0"] if is_number(grow) && is_number(shrink) => {
            Some(format!("{grow} {shrink} 0%"))
        }
        _ => None,
    }
}

fn split_important(value: &str) -> (&str, &str) {
    let trimmed = value.trim_end();
    let lower = trimmed.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(idx) if lower[idx..].trim_end() == "!important" => {
            (trimmed[..idx].trim_end(), &trimmed[idx..])
        }
        _ => (trimmed, ""),
    }
}

/// Apply the flexbox workarounds to a stylesheet's text
#[must_use]
pub fn fix_flexbugs(css: &str) -> String {
    rewrite_flex(css, false)
}

/// Same as [`fix_flexbugs`], written without optional whitespace
#[must_use]
pub fn fix_flexbugs_compact(css: &str) -> String {
    rewrite_flex(css, true)
}

fn rewrite_flex(css: &str, compact: bool) -> String {
    FLEX_DECL_RE
        .replace_all(css, |caps: &Captures| {
            let whole = &caps[0];
            let end = caps.get(0).map_or(0, |m| m.end());

            // `flex:hover {` is a selector, not a declaration
            if css[end..].starts_with('{') {
                return whole.to_string();
            }

            let (value, important) = split_important(&caps[3]);
            match fix_flex_value(value) {
                Some(fixed) if compact => {
                    format!("{}{}:{fixed}{important}", &caps[1], &caps[2])
                }
                Some(fixed) => {
                    let separator = if important.is_empty() { "" } else { " " };
                    format!("{}{}: {fixed}{separator}{important}", &caps[1], &caps[2])
                }
                None => whole.to_string(),
            }
        })
        .into_owned()
}

/// Compatibility-fix pass
#[derive(Debug, Default, Clone, Copy)]
pub struct CompatibilityPass;

impl CssPass for CompatibilityPass {
    fn name(&self) -> &'static str {
        "compatibility"
    }

    fn apply(&self, css: &str, _markup: &str) -> anyhow::Result<String> {
        Ok(fix_flexbugs(css))
    }
}
