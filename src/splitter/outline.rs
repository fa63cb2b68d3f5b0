//! Top-level structure of a stylesheet
//!
//! A small scanner that finds the top-level statements and blocks of a
//! stylesheet without interpreting them. At-rule parameters come back
//! byte-for-byte as written, which a full parse and re-print would not
//! guarantee (`(min-width: 961px)` can come back as `(width >= 961px)`).
//! Strings, escapes and comments are skipped so braces inside them do not
//! count.

/// One top-level node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevelNode<'a> {
    /// A qualified rule such as `.a { color: red }`
    Rule { text: &'a str },
    /// An at-rule, with or without a block
    AtRule {
        name: &'a str,
        params: &'a str,
        body: Option<&'a str>,
        text: &'a str,
    },
}

impl<'a> TopLevelNode<'a> {
    /// The node's full source text
    #[must_use]
    pub fn text(&self) -> &'a str {
        match self {
            TopLevelNode::Rule { text } | TopLevelNode::AtRule { text, .. } => text,
        }
    }

    /// Media condition when this is an `@media` block
    #[must_use]
    pub fn media_condition(&self) -> Option<&'a str> {
        match self {
            TopLevelNode::AtRule {
                name,
                params,
                body: Some(_),
                ..
            } if name.eq_ignore_ascii_case("media") => Some(params),
            _ => None,
        }
    }

    /// Block contents, without the braces
    #[must_use]
    pub fn body(&self) -> Option<&'a str> {
        match self {
            TopLevelNode::AtRule { body, .. } => *body,
            TopLevelNode::Rule { .. } => None,
        }
    }
}

/// Index just past a comment starting at `i` (`/*` already matched)
fn skip_comment(bytes: &[u8], i: usize) -> usize {
    let mut j = i + 2;
    while j + 1 < bytes.len() {
        if bytes[j] == b'*' && bytes[j + 1] == b'/' {
            return j + 2;
        }
        j += 1;
    }
    bytes.len()
}

/// Index just past a string starting at `i`
fn skip_string(bytes: &[u8], i: usize) -> usize {
    let quote = bytes[i];
    let mut j = i + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j + 1,
            c if c == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

fn is_comment_start(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*')
}

/// Index of the `}` matching the `{` at `open`, or `bytes.len()` if unbalanced
fn matching_brace(bytes: &[u8], open: usize) -> usize {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'\\' => {
                i += 2;
                continue;
            }
            b'/' if is_comment_start(bytes, i) => {
                i = skip_comment(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

fn make_node(
    css: &str,
    start: usize,
    prelude_end: usize,
    body: Option<(usize, usize)>,
    end: usize,
) -> Option<TopLevelNode<'_>> {
    let text = css[start..end].trim();
    if text.is_empty() {
        return None;
    }

    let prelude = css[start..prelude_end].trim();
    let Some(after_at) = prelude.strip_prefix('@') else {
        return Some(TopLevelNode::Rule { text });
    };

    let name_len = after_at
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after_at.len());

    Some(TopLevelNode::AtRule {
        name: &after_at[..name_len],
        params: after_at[name_len..].trim(),
        body: body.map(|(from, to)| &css[from..to]),
        text,
    })
}

/// Top-level nodes of `css`, in source order
///
/// Top-level comments are dropped. A stray `}` is skipped. An unterminated
/// trailing block or statement runs to the end of input.
#[must_use]
pub fn top_level_nodes(css: &str) -> Vec<TopLevelNode<'_>> {
    let bytes = css.as_bytes();
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        // leading whitespace, comments and stray closers
        if bytes[i].is_ascii_whitespace() || bytes[i] == b'}' {
            i += 1;
            continue;
        }
        if is_comment_start(bytes, i) {
            i = skip_comment(bytes, i);
            continue;
        }

        let start = i;
        loop {
            if i >= bytes.len() {
                nodes.extend(make_node(css, start, bytes.len(), None, bytes.len()));
                break;
            }
            match bytes[i] {
                b'"' | b'\'' => i = skip_string(bytes, i),
                b'\\' => i += 2,
                b'/' if is_comment_start(bytes, i) => i = skip_comment(bytes, i),
                b';' => {
                    nodes.extend(make_node(css, start, i, None, i + 1));
                    i += 1;
                    break;
                }
                b'{' => {
                    let close = matching_brace(bytes, i);
                    let end = (close + 1).min(bytes.len());
                    nodes.extend(make_node(css, start, i, Some((i + 1, close)), end));
                    i = end;
                    break;
                }
                _ => i += 1,
            }
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_and_media() {
        let css = ".a{color:red}@media (min-width: 961px){.b{color:blue}}";
        let nodes = top_level_nodes(css);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0], TopLevelNode::Rule { text: ".a{color:red}" });
        assert_eq!(nodes[1].media_condition(), Some("(min-width: 961px)"));
        assert_eq!(nodes[1].body(), Some(".b{color:blue}"));
    }

    #[test]
    fn test_statement_at_rules() {
        let css = "@import url(\"x.css\") screen;\n@charset \"utf-8\";\n.a{}";
        let nodes = top_level_nodes(css);
        assert_eq!(nodes.len(), 3);
        match nodes[0] {
            TopLevelNode::AtRule { name, params, body, .. } => {
                assert_eq!(name, "import");
                assert_eq!(params, "url(\"x.css\") screen");
                assert!(body.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_braces_in_strings_and_comments() {
        let css = r#".a{content:"}"}/* { */.b{background:url('a{b}.png')}"#;
        let nodes = top_level_nodes(css);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text(), r#".a{content:"}"}"#);
        assert_eq!(nodes[1].text(), ".b{background:url('a{b}.png')}");
    }

    #[test]
    fn test_nested_blocks() {
        let css = "@supports (display:grid){@media print{.a{b:c}}}.z{}";
        let nodes = top_level_nodes(css);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].body(), Some("@media print{.a{b:c}}"));
        assert_eq!(nodes[0].media_condition(), None);
    }

    #[test]
    fn test_unbalanced_tail() {
        let nodes = top_level_nodes(".a{color:red");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text(), ".a{color:red");
    }

    #[test]
    fn test_uppercase_media_name() {
        let nodes = top_level_nodes("@MEDIA print{.a{}}");
        assert_eq!(nodes[0].media_condition(), Some("print"));
    }
}
