//! Unused-selector removal
//!
//! A selector survives when any of its identifiers (tag, class or id,
//! including those inside `:not()`, `:is()`, `:where()` and `:has()`) appears
//! in the markup's used-token set or the safelist. Selectors with no such
//! identifiers (`*`, `[hidden]`, `:root`) always survive. A rule is dropped
//! once all of its selectors are gone.
//!
//! This is a textual heuristic: a class mentioned anywhere in the page text
//! keeps its rules alive even if no element carries it. The safelist covers
//! the opposite case, classes only ever added by scripts.

use lightningcss::rules::CssRule;
use lightningcss::selector::{Component, Selector};
use lightningcss::stylesheet::{PrinterOptions, StyleSheet};
use std::collections::HashSet;

use super::chain::CssPass;
use super::lightning::parser_options;
use super::targets::full_targets;
use super::tokens::extract_used_tokens;
use crate::config::{BrowserTargets, SafelistSet};

/// Identifiers referenced by a selector, nested pseudo-class arguments included
fn collect_identifiers<'s>(selector: &'s Selector<'_>, out: &mut Vec<&'s str>) {
    for component in selector.iter_raw_match_order() {
        match component {
            Component::Class(ident) | Component::ID(ident) => out.push(&*ident.0),
            Component::LocalName(local) => {
                out.push(&*local.name.0);
                out.push(&*local.lower_name.0);
            }
            Component::Negation(list)
            | Component::Is(list)
            | Component::Where(list)
            | Component::Has(list) => {
                for inner in list.iter() {
                    collect_identifiers(inner, out);
                }
            }
            _ => {}
        }
    }
}

struct UsageIndex<'a> {
    used: HashSet<String>,
    safelist: &'a SafelistSet,
}

impl UsageIndex<'_> {
    fn is_selector_used(&self, selector: &Selector<'_>) -> bool {
        let mut identifiers = Vec::new();
        collect_identifiers(selector, &mut identifiers);

        if identifiers.is_empty() {
            return true;
        }

        identifiers
            .iter()
            .any(|ident| self.used.contains(*ident) || self.safelist.contains(ident))
    }
}

/// Remove unused selectors in place; returns how many selectors were dropped
fn prune_rules(rules: &mut Vec<CssRule<'_>>, index: &UsageIndex<'_>) -> usize {
    let mut removed = 0;

    rules.retain_mut(|rule| match rule {
        CssRule::Style(style_rule) => {
            let before = style_rule.selectors.0.len();
            style_rule
                .selectors
                .0
                .retain(|selector| index.is_selector_used(selector));
            removed += before - style_rule.selectors.0.len();
            if style_rule.selectors.0.is_empty() {
                return false;
            }
            // nested rules survive lowering when the tier supports nesting
            removed += prune_rules(&mut style_rule.rules.0, index);
            true
        }
        CssRule::Media(media_rule) => {
            removed += prune_rules(&mut media_rule.rules.0, index);
            !media_rule.rules.0.is_empty()
        }
        CssRule::Supports(supports_rule) => {
            removed += prune_rules(&mut supports_rule.rules.0, index);
            !supports_rule.rules.0.is_empty()
        }
        CssRule::Container(container_rule) => {
            removed += prune_rules(&mut container_rule.rules.0, index);
            !container_rule.rules.0.is_empty()
        }
        CssRule::LayerBlock(layer_rule) => {
            removed += prune_rules(&mut layer_rule.rules.0, index);
            !layer_rule.rules.0.is_empty()
        }
        // @font-face, @keyframes, @import and friends are kept as-is
        _ => true,
    });

    removed
}

/// Remove rules whose selectors reference nothing in `markup` or `safelist`
pub fn purge_unused(
    css: &str,
    markup: &str,
    safelist: &SafelistSet,
    targets: &BrowserTargets,
    error_recovery: bool,
) -> anyhow::Result<String> {
    let index = UsageIndex {
        used: extract_used_tokens(markup),
        safelist,
    };

    let mut stylesheet = StyleSheet::parse(css, parser_options(error_recovery))
        .map_err(|e| anyhow::anyhow!("CSS parse error: {e}"))?;

    let removed = prune_rules(&mut stylesheet.rules.0, &index);
    log::debug!(
        "Removed {removed} unused selectors ({} used tokens, {} safelist entries)",
        index.used.len(),
        safelist.len()
    );

    let result = stylesheet
        .to_css(PrinterOptions {
            targets: full_targets(targets),
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow::anyhow!("CSS print error: {e}"))?;

    Ok(result.code)
}

/// Unused-selector removal pass
#[derive(Debug, Clone)]
pub struct PurgePass {
    safelist: SafelistSet,
    targets: BrowserTargets,
    error_recovery: bool,
}

impl PurgePass {
    #[must_use]
    pub fn new(safelist: SafelistSet, targets: BrowserTargets, error_recovery: bool) -> Self {
        Self {
            safelist,
            targets,
            error_recovery,
        }
    }
}

impl CssPass for PurgePass {
    fn name(&self) -> &'static str {
        "purge"
    }

    fn apply(&self, css: &str, markup: &str) -> anyhow::Result<String> {
        purge_unused(
            css,
            markup,
            &self.safelist,
            &self.targets,
            self.error_recovery,
        )
    }
}
