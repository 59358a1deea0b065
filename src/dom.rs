//! Content node abstraction and DOM helpers.
//!
//! Extraction works against the [`ContentNode`] trait so the same walker can
//! run over a parsed HTML document (`dom_query`) or over a JSON snapshot of a
//! live page ([`SnapshotNode`](crate::snapshot::SnapshotNode)). The trait is
//! read-only: nothing in this crate mutates or clones an input subtree.
//!
//! Helpers in this module are free functions over any `ContentNode`: class
//! queries, shadow-aware descendant search and flattened text access.

pub use dom_query::{Document, NodeRef, Selection};

use tendril::StrTendril;

use crate::patterns::{TEMPLATE_CLOSE, TEMPLATE_OPEN, WHITESPACE_RUN};
use crate::selector::artifacts;

/// Tag that declarative shadow roots and inert templates are lifted to.
pub const SHADOW_ROOT_TAG: &str = "shadow-root";

/// What kind of node a [`ContentNode`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    /// Documents, fragments, comments, doctypes.
    Other,
}

/// A read-only node of a rendered document tree.
pub trait ContentNode: Clone {
    fn kind(&self) -> NodeKind;

    /// Lowercase tag name; `None` for non-elements.
    fn tag(&self) -> Option<String>;

    fn attribute(&self, name: &str) -> Option<String>;

    /// All attributes in source order.
    fn attributes(&self) -> Vec<(String, String)>;

    /// Light-tree children in document order.
    fn child_nodes(&self) -> Vec<Self>;

    /// Children of the attached shadow tree, if the node hosts one.
    fn shadow_children(&self) -> Option<Vec<Self>>;

    /// Character data of a text node; empty for other kinds.
    fn own_text(&self) -> String;

    fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    fn is_text(&self) -> bool {
        self.kind() == NodeKind::Text
    }
}

// === dom_query adapter ===

impl<'a> ContentNode for NodeRef<'a> {
    fn kind(&self) -> NodeKind {
        if NodeRef::is_element(self) {
            NodeKind::Element
        } else if NodeRef::is_text(self) {
            NodeKind::Text
        } else {
            NodeKind::Other
        }
    }

    fn tag(&self) -> Option<String> {
        if !NodeRef::is_element(self) {
            return None;
        }
        self.node_name().map(|name| name.to_ascii_lowercase())
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attr(name).map(|value| value.to_string())
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.attrs()
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect()
    }

    fn child_nodes(&self) -> Vec<Self> {
        self.children()
            .into_iter()
            .filter(|child| !is_lifted_template(child))
            .collect()
    }

    fn shadow_children(&self) -> Option<Vec<Self>> {
        self.children()
            .into_iter()
            .find(|child| is_lifted_template(child) && is_shadow_root_host_slot(child))
            .map(|slot| slot.children().into_iter().collect())
    }

    fn own_text(&self) -> String {
        if NodeRef::is_text(self) {
            let text: StrTendril = self.text();
            text.to_string()
        } else {
            String::new()
        }
    }
}

fn is_lifted_template(node: &NodeRef<'_>) -> bool {
    node.tag().as_deref() == Some(SHADOW_ROOT_TAG)
}

fn is_shadow_root_host_slot<N: ContentNode>(node: &N) -> bool {
    node.attribute("shadowrootmode").is_some() || node.attribute("shadowroot").is_some()
}

/// Parse HTML into a document, lifting `<template>` elements first.
///
/// Template contents are not part of the parsed light tree, so declarative
/// shadow roots (`<template shadowrootmode="open">`) are renamed to
/// `<shadow-root>` before parsing. The adapter then exposes them through
/// [`ContentNode::shadow_children`]; lifted templates without a shadow root
/// mode stay inert.
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(lift_templates(html))
}

/// Rename `<template>` tags to [`SHADOW_ROOT_TAG`].
#[must_use]
pub fn lift_templates(html: &str) -> String {
    if !TEMPLATE_OPEN.is_match(html) {
        return html.to_string();
    }
    let opened = TEMPLATE_OPEN.replace_all(html, format!("<{SHADOW_ROOT_TAG}$1").as_str());
    TEMPLATE_CLOSE
        .replace_all(&opened, format!("</{SHADOW_ROOT_TAG}>").as_str())
        .into_owned()
}

/// First `<body>` node of a document, or the document root.
#[must_use]
pub fn body_or_root(doc: &Document) -> NodeRef<'_> {
    doc.select("body")
        .nodes()
        .first()
        .copied()
        .unwrap_or_else(|| doc.root())
}

// === Attribute Helpers ===

/// Whitespace-separated class tokens of an element.
#[must_use]
pub fn classes<N: ContentNode>(node: &N) -> Vec<String> {
    node.attribute("class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

#[must_use]
pub fn has_class<N: ContentNode>(node: &N, name: &str) -> bool {
    node.attribute("class")
        .is_some_and(|value| value.split_whitespace().any(|token| token == name))
}

#[must_use]
pub fn has_any_class<N: ContentNode>(node: &N, names: &[&str]) -> bool {
    node.attribute("class").is_some_and(|value| {
        value
            .split_whitespace()
            .any(|token| names.contains(&token))
    })
}

#[must_use]
pub fn tag_in<N: ContentNode>(node: &N, tags: &[&str]) -> bool {
    node.tag().is_some_and(|tag| tags.contains(&tag.as_str()))
}

/// Element children, with shadow children first when the node hosts a shadow tree.
#[must_use]
pub fn composed_children<N: ContentNode>(node: &N) -> Vec<N> {
    let mut kids = node.shadow_children().unwrap_or_default();
    kids.extend(node.child_nodes());
    kids
}

#[must_use]
pub fn element_children<N: ContentNode>(node: &N) -> Vec<N> {
    node.child_nodes()
        .into_iter()
        .filter(ContentNode::is_element)
        .collect()
}

// === Tree Search ===

/// Control flow for [`visit_descendants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    SkipChildren,
    Stop,
}

/// Visit element descendants of `root` in pre-order document order.
///
/// Shadow children of a node are visited before its light children. The
/// root itself is not visited.
pub fn visit_descendants<N, F>(root: &N, mut visit: F)
where
    N: ContentNode,
    F: FnMut(&N) -> Visit,
{
    let mut stack: Vec<N> = composed_children(root);
    stack.reverse();
    while let Some(node) = stack.pop() {
        if !node.is_element() {
            continue;
        }
        match visit(&node) {
            Visit::Stop => return,
            Visit::SkipChildren => {}
            Visit::Continue => {
                let mut kids = composed_children(&node);
                kids.reverse();
                stack.extend(kids);
            }
        }
    }
}

/// First element descendant matching `pred`.
#[must_use]
pub fn find_first<N, P>(root: &N, pred: P) -> Option<N>
where
    N: ContentNode,
    P: Fn(&N) -> bool,
{
    let mut found = None;
    visit_descendants(root, |node| {
        if pred(node) {
            found = Some(node.clone());
            Visit::Stop
        } else {
            Visit::Continue
        }
    });
    found
}

/// All element descendants matching `pred`, in document order.
#[must_use]
pub fn find_all<N, P>(root: &N, pred: P) -> Vec<N>
where
    N: ContentNode,
    P: Fn(&N) -> bool,
{
    let mut found = Vec::new();
    visit_descendants(root, |node| {
        if pred(node) {
            found.push(node.clone());
        }
        Visit::Continue
    });
    found
}

// === Text Content ===

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tr", "ul",
];

const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "head", "title"];

#[must_use]
pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

fn is_invisible<N: ContentNode>(node: &N) -> bool {
    tag_in(node, INVISIBLE_TAGS) || node.attribute("hidden").is_some()
}

/// Flattened visible text of a node.
///
/// Whitespace inside text runs collapses to single spaces, block-level
/// elements and `<br>` start new lines, `<pre>` keeps its whitespace.
/// Hidden elements and artifacts contribute nothing.
#[must_use]
pub fn text_content<N: ContentNode>(node: &N) -> String {
    enum Step<N> {
        Enter(N),
        Break,
    }

    let mut out = String::new();
    let mut stack = vec![Step::Enter(node.clone())];

    while let Some(step) = stack.pop() {
        let current = match step {
            Step::Break => {
                push_line_break(&mut out);
                continue;
            }
            Step::Enter(current) => current,
        };

        match current.kind() {
            NodeKind::Text => {
                let text = current.own_text();
                out.push_str(&WHITESPACE_RUN.replace_all(&text, " "));
            }
            NodeKind::Other => {
                let mut kids = composed_children(&current);
                kids.reverse();
                stack.extend(kids.into_iter().map(Step::Enter));
            }
            NodeKind::Element => {
                if is_invisible(&current) || artifacts::should_skip(&current) {
                    continue;
                }
                let tag = current.tag().unwrap_or_default();
                if tag == "br" {
                    out.push('\n');
                    continue;
                }
                if tag == "pre" {
                    push_line_break(&mut out);
                    out.push_str(&raw_text(&current));
                    push_line_break(&mut out);
                    continue;
                }
                let block = is_block_tag(&tag);
                if block {
                    push_line_break(&mut out);
                    stack.push(Step::Break);
                }
                let mut kids = composed_children(&current);
                kids.reverse();
                stack.extend(kids.into_iter().map(Step::Enter));
            }
        }
    }

    out.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn push_line_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Concatenated character data of a subtree, whitespace preserved.
///
/// `<br>` becomes a newline; artifacts and invisible elements are skipped.
#[must_use]
pub fn raw_text<N: ContentNode>(node: &N) -> String {
    let mut out = String::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        match current.kind() {
            NodeKind::Text => out.push_str(&current.own_text()),
            NodeKind::Element if is_invisible(&current) || artifacts::should_skip(&current) => {}
            NodeKind::Element if current.tag().as_deref() == Some("br") => out.push('\n'),
            NodeKind::Element | NodeKind::Other => {
                let mut kids = composed_children(&current);
                kids.reverse();
                stack.extend(kids);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(doc: &'a Document, selector: &str) -> Option<NodeRef<'a>> {
        doc.select(selector).nodes().first().copied()
    }

    #[test]
    fn test_tag_and_attributes() {
        let doc = parse(r#"<div id="main" class="container wide">content</div>"#);
        let div = first(&doc, "div");
        assert!(div.is_some());
        if let Some(div) = div {
            assert_eq!(div.tag(), Some("div".to_string()));
            assert_eq!(div.attribute("id"), Some("main".to_string()));
            assert!(has_class(&div, "wide"));
            assert!(!has_class(&div, "contain"));
            assert_eq!(classes(&div), vec!["container".to_string(), "wide".to_string()]);
            assert_eq!(div.attributes().len(), 2);
        }
    }

    #[test]
    fn test_text_nodes_are_children() {
        let doc = parse("<p>before <b>bold</b> after</p>");
        let p = first(&doc, "p");
        let kinds: Vec<NodeKind> = p.map(|p| p.child_nodes().iter().map(ContentNode::kind).collect()).unwrap_or_default();
        assert_eq!(kinds, vec![NodeKind::Text, NodeKind::Element, NodeKind::Text]);
    }

    #[test]
    fn test_lift_templates_renames_tags() {
        let html = r#"<x-host><template shadowrootmode="open"><p>in</p></template></x-host>"#;
        let lifted = lift_templates(html);
        assert!(lifted.contains(r#"<shadow-root shadowrootmode="open">"#));
        assert!(lifted.contains("</shadow-root>"));
        assert!(!lifted.contains("template"));
    }

    #[test]
    fn test_shadow_children_exposed_and_hidden_from_light_tree() {
        let doc = parse(
            r#"<x-host><template shadowrootmode="open"><p>shadow</p></template><span>light</span></x-host>"#,
        );
        let host = first(&doc, "x-host");
        assert!(host.is_some());
        if let Some(host) = host {
            let shadow = host.shadow_children().unwrap_or_default();
            assert_eq!(shadow.len(), 1);
            assert_eq!(shadow[0].tag(), Some("p".to_string()));
            let light = element_children(&host);
            assert_eq!(light.len(), 1);
            assert_eq!(light[0].tag(), Some("span".to_string()));
            assert_eq!(text_content(&host), "shadow\nlight");
        }
    }

    #[test]
    fn test_plain_template_is_inert() {
        let doc = parse("<div><template><p>inert</p></template><p>shown</p></div>");
        let div = first(&doc, "div");
        assert!(div.is_some());
        if let Some(div) = div {
            assert!(div.shadow_children().is_none());
            assert_eq!(text_content(&div), "shown");
        }
    }

    #[test]
    fn test_text_content_blocks_and_breaks() {
        let doc = parse("<div><p>One   two</p><p>three<br>four</p><script>x()</script></div>");
        let div = first(&doc, "div");
        assert_eq!(div.map(|d| text_content(&d)), Some("One two\nthree\nfour".to_string()));
    }

    #[test]
    fn test_text_content_skips_artifacts() {
        let doc = parse("<div><p>keep</p><button>Copy</button></div>");
        let div = first(&doc, "div");
        assert_eq!(div.map(|d| text_content(&d)), Some("keep".to_string()));
    }

    #[test]
    fn test_raw_text_preserves_whitespace() {
        let doc = parse("<pre><code>fn main() {\n    run();\n}</code></pre>");
        let pre = first(&doc, "pre");
        assert_eq!(pre.map(|p| raw_text(&p)), Some("fn main() {\n    run();\n}".to_string()));
    }

    #[test]
    fn test_find_first_and_all_in_document_order() {
        let doc = parse(r#"<div><p class="a">1</p><section><p class="a">2</p></section></div>"#);
        let div = first(&doc, "div");
        assert!(div.is_some());
        if let Some(div) = div {
            let all = find_all(&div, |n| has_class(n, "a"));
            let texts: Vec<String> = all.iter().map(text_content).collect();
            assert_eq!(texts, vec!["1".to_string(), "2".to_string()]);
            let section = find_first(&div, |n| n.tag().as_deref() == Some("section"));
            assert!(section.is_some());
        }
    }

    #[test]
    fn test_visit_descendants_skip_children() {
        let doc = parse("<div><aside><p>hidden</p></aside><p>seen</p></div>");
        let div = first(&doc, "div");
        let mut seen = Vec::new();
        if let Some(div) = div {
            visit_descendants(&div, |n| {
                seen.push(n.tag().unwrap_or_default());
                if n.tag().as_deref() == Some("aside") {
                    Visit::SkipChildren
                } else {
                    Visit::Continue
                }
            });
        }
        assert_eq!(seen, vec!["aside".to_string(), "p".to_string()]);
    }

    #[test]
    fn test_body_or_root() {
        let doc = parse("<html><body><p>x</p></body></html>");
        assert_eq!(body_or_root(&doc).tag(), Some("body".to_string()));
    }
}
