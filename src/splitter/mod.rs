//! Media splitter
//!
//! Partitions a final stylesheet into a `base` group plus one group per
//! distinct `@media` condition, so each group can be served as its own file
//! and linked with a matching `media` attribute.

pub mod outline;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use self::outline::{TopLevelNode, top_level_nodes};

/// Key of the group holding everything outside `@media` blocks
pub const BASE_KEY: &str = "base";

static NON_KEY_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w-]+").expect("NON_KEY_CHARS: hardcoded regex is valid")
});

static HYPHEN_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("HYPHEN_RUNS: hardcoded regex is valid"));

/// One output file's worth of CSS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitGroup {
    pub key: String,
    /// Exact condition text, `None` for the base group
    pub media: Option<String>,
    pub css: String,
}

impl SplitGroup {
    /// The group as standalone CSS, re-wrapped in its `@media` block when it has one
    #[must_use]
    pub fn to_wrapped_css(&self) -> String {
        match &self.media {
            Some(condition) if !self.css.is_empty() => {
                format!("@media {condition}{{{}}}", self.css)
            }
            _ => self.css.clone(),
        }
    }
}

/// Ordered groups produced by [`split`]; `base` always comes first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    groups: Vec<SplitGroup>,
}

impl SplitResult {
    #[must_use]
    pub fn groups(&self) -> &[SplitGroup] {
        &self.groups
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SplitGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    #[must_use]
    pub fn base(&self) -> &str {
        self.get(BASE_KEY).map_or("", |g| g.css.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Key to CSS mapping
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.groups
            .iter()
            .map(|g| (g.key.clone(), g.css.clone()))
            .collect()
    }

    /// Rebuild one stylesheet from the groups
    ///
    /// The base group comes first, then each media group wrapped in its
    /// original condition. Rule order across groups is not the input order.
    #[must_use]
    pub fn reassemble(&self) -> String {
        self.groups
            .iter()
            .map(SplitGroup::to_wrapped_css)
            .filter(|css| !css.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl IntoIterator for SplitResult {
    type Item = SplitGroup;
    type IntoIter = std::vec::IntoIter<SplitGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// `media-` key for a condition, without collision handling
#[must_use]
pub fn media_key(condition: &str) -> String {
    let replaced = NON_KEY_CHARS.replace_all(condition, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&replaced, "-");
    let slug = collapsed.trim_matches('-').to_lowercase();
    if slug.is_empty() {
        "media-all".to_string()
    } else {
        format!("media-{slug}")
    }
}

/// Partition `css` by top-level `@media` condition
#[must_use]
pub fn split(css: &str) -> SplitResult {
    let mut base: Vec<&str> = Vec::new();
    // condition -> index into `media`
    let mut by_condition: HashMap<&str, usize> = HashMap::new();
    let mut media: Vec<(&str, Vec<&str>)> = Vec::new();

    for node in top_level_nodes(css) {
        match node.media_condition() {
            Some(condition) => {
                let body = node.body().unwrap_or_default().trim();
                let slot = *by_condition.entry(condition).or_insert_with(|| {
                    media.push((condition, Vec::new()));
                    media.len() - 1
                });
                if !body.is_empty() {
                    media[slot].1.push(body);
                }
            }
            None => base.push(node.text()),
        }
    }

    let mut taken: HashSet<String> = HashSet::from([BASE_KEY.to_string()]);
    let mut groups = Vec::with_capacity(media.len() + 1);
    groups.push(SplitGroup {
        key: BASE_KEY.to_string(),
        media: None,
        css: base.join("\n"),
    });

    for (condition, bodies) in media {
        let key = unique_key(media_key(condition), &mut taken);
        if key != media_key(condition) {
            log::debug!("Media condition {condition:?} collides with an earlier key, using {key}");
        }
        groups.push(SplitGroup {
            key,
            media: Some(condition.to_string()),
            css: bodies.join("\n"),
        });
    }

    log::debug!("Split stylesheet into {} groups", groups.len());
    SplitResult { groups }
}

fn unique_key(candidate: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(candidate.clone()) {
        return candidate;
    }
    let mut n = 2;
    loop {
        let next = format!("{candidate}-{n}");
        if taken.insert(next.clone()) {
            return next;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_and_one_media_group() {
        let result = split(".a{color:red}@media (min-width: 961px){.b{color:blue}}");
        let keys: Vec<&str> = result.keys().collect();
        assert_eq!(keys, vec!["base", "media-min-width-961px"]);
        assert_eq!(result.base(), ".a{color:red}");
        let group = result.get("media-min-width-961px").unwrap();
        assert_eq!(group.css, ".b{color:blue}");
        assert_eq!(group.media.as_deref(), Some("(min-width: 961px)"));
    }

    #[test]
    fn test_same_condition_merges_in_order() {
        let css = "@media print{.a{x:1}}.z{}@media print{.b{x:2}}";
        let result = split(css);
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("media-print").unwrap().css, ".a{x:1}\n.b{x:2}");
        assert_eq!(result.base(), ".z{}");
    }

    #[test]
    fn test_empty_input() {
        let result = split("");
        assert_eq!(result.len(), 1);
        assert_eq!(result.groups()[0].key, "base");
        assert_eq!(result.base(), "");
    }

    #[test]
    fn test_colliding_keys_get_suffixes() {
        let css = "@media (min-width:600px){.a{}}@media (min-width: 600px){.b{}}@media (MIN-WIDTH:600px){.c{}}";
        let result = split(css);
        let keys: Vec<&str> = result.keys().collect();
        assert_eq!(
            keys,
            vec![
                "base",
                "media-min-width-600px",
                "media-min-width-600px-2",
                "media-min-width-600px-3"
            ]
        );
        assert_eq!(
            result.get("media-min-width-600px-2").unwrap().media.as_deref(),
            Some("(min-width: 600px)")
        );
    }

    #[test]
    fn test_media_key_sanitizing() {
        assert_eq!(
            media_key("screen and (max-width: 960px)"),
            "media-screen-and-max-width-960px"
        );
        assert_eq!(media_key("print"), "media-print");
        assert_eq!(
            media_key("(min-width:30em) and (orientation:landscape)"),
            "media-min-width-30em-and-orientation-landscape"
        );
        assert_eq!(media_key("()"), "media-all");
    }

    #[test]
    fn test_other_at_rules_stay_in_base() {
        let css = "@font-face{font-family:x}@supports (display:grid){.g{}}@keyframes k{0%{top:0}}";
        let result = split(css);
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.base(),
            "@font-face{font-family:x}\n@supports (display:grid){.g{}}\n@keyframes k{0%{top:0}}"
        );
    }

    #[test]
    fn test_reassemble_wraps_media_groups() {
        let result = split(".a{}@media print{.b{}}");
        assert_eq!(result.reassemble(), ".a{}\n@media print{.b{}}");
        assert_eq!(result.to_map().len(), 2);
    }
}
