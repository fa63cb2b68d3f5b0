//! Used-token extraction from raw markup
//!
//! Any run of word characters, hyphens, slashes and colons counts, except
//! that a token never ends in a colon. The whole text is scanned, not just
//! class and id attributes, so the resulting set over-approximates what the
//! page uses.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Linear-time scan; the trailing-colon rule is applied per match instead of
// with a lookbehind.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w\-/:]+").expect("TOKEN_RE: hardcoded regex is valid"));

/// Every token-like substring of `markup`
#[must_use]
pub fn extract_used_tokens(markup: &str) -> HashSet<String> {
    TOKEN_RE
        .find_iter(markup)
        .map(|m| m.as_str().trim_end_matches(':'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
