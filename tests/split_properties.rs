use css_purge::splitter::{split, top_level_nodes};
use proptest::prelude::*;

/// (media condition, rule text) for every effective rule of `css`
fn effective_rules(css: &str) -> Vec<(Option<String>, String)> {
    let mut rules = Vec::new();
    for node in top_level_nodes(css) {
        match (node.media_condition(), node.body()) {
            (Some(condition), Some(body)) => {
                for inner in top_level_nodes(body) {
                    rules.push((Some(condition.to_string()), inner.text().to_string()));
                }
            }
            _ => rules.push((None, node.text().to_string())),
        }
    }
    rules.sort();
    rules
}

fn node() -> impl Strategy<Value = String> {
    let rule = ("[a-z]{1,6}", "[a-z]{1,6}").prop_map(|(sel, val)| format!(".{sel}{{color:{val}}}"));
    let condition = prop_oneof![
        Just("print".to_string()),
        Just("(min-width: 961px)".to_string()),
        Just("(min-width:961px)".to_string()),
        Just("screen and (max-width: 600px)".to_string()),
    ];
    prop_oneof![
        3 => rule.clone(),
        2 => (condition, prop::collection::vec(rule, 1..4))
            .prop_map(|(c, rules)| format!("@media {c}{{{}}}", rules.concat())),
        1 => Just("@font-face{font-family:x;src:url(\"a{b}.woff\")}".to_string()),
    ]
}

proptest! {
    #[test]
    fn split_partitions_without_loss(nodes in prop::collection::vec(node(), 0..10)) {
        let css = nodes.join("\n");
        let result = split(&css);

        prop_assert_eq!(result.groups()[0].key.as_str(), "base");
        prop_assert_eq!(effective_rules(&result.reassemble()), effective_rules(&css));

        let mut keys: Vec<&str> = result.keys().collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        prop_assert_eq!(keys.len(), total);

        for group in &result.groups()[1..] {
            prop_assert!(group.key.starts_with("media-"));
            prop_assert!(!group.css.contains("@media"));
        }
    }
}
