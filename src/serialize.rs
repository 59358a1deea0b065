//! Markup serialization of source subtrees.
//!
//! Two named steps produce markup straight from the source tree:
//!
//! - [`serialize_cleaned_copy`]: the markup of a disposable copy of the
//!   subtree with every artifact stripped. Tables and lists use it for their
//!   markup form.
//! - [`serialize_verbatim`]: the full, unstripped markup. Math uses it so
//!   the rendered formula survives for print.
//!
//! Both stream the source instead of cloning it; the input is never touched.
//! Text is escaped and attribute values are quoted, comments are dropped.

use crate::dom::{composed_children, ContentNode, NodeKind};
use crate::escape::{escape_attr, escape_html};
use crate::selector::artifacts;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

#[must_use]
pub fn is_void_tag(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Markup of `node` with all artifact subtrees removed.
#[must_use]
pub fn serialize_cleaned_copy<N: ContentNode>(node: &N) -> String {
    serialize(node, true, None)
}

/// Markup of `node` exactly as rendered.
///
/// `ensure_attr` is set on the root element when the source lacks it.
#[must_use]
pub fn serialize_verbatim<N: ContentNode>(node: &N, ensure_attr: Option<(&str, &str)>) -> String {
    serialize(node, false, ensure_attr)
}

enum Op<N> {
    Open(N, bool),
    Close(String),
}

fn serialize<N: ContentNode>(node: &N, strip_artifacts: bool, ensure_attr: Option<(&str, &str)>) -> String {
    let mut out = String::new();
    let mut stack = vec![Op::Open(node.clone(), true)];

    while let Some(op) = stack.pop() {
        let (current, is_root) = match op {
            Op::Close(tag) => {
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
                continue;
            }
            Op::Open(current, is_root) => (current, is_root),
        };

        match current.kind() {
            NodeKind::Text => out.push_str(&escape_html(&current.own_text())),
            NodeKind::Other => {
                let mut kids = composed_children(&current);
                kids.reverse();
                stack.extend(kids.into_iter().map(|kid| Op::Open(kid, false)));
            }
            NodeKind::Element => {
                if strip_artifacts && artifacts::should_skip(&current) {
                    continue;
                }
                let tag = current.tag().unwrap_or_else(|| "span".to_string());
                out.push('<');
                out.push_str(&tag);
                let attrs = current.attributes();
                for (name, value) in &attrs {
                    push_attr(&mut out, name, value);
                }
                if is_root {
                    if let Some((name, value)) = ensure_attr {
                        if !attrs.iter().any(|(n, _)| n == name) {
                            push_attr(&mut out, name, value);
                        }
                    }
                }
                out.push('>');
                if is_void_tag(&tag) {
                    continue;
                }
                stack.push(Op::Close(tag));
                let mut kids = composed_children(&current);
                kids.reverse();
                stack.extend(kids.into_iter().map(|kid| Op::Open(kid, false)));
            }
        }
    }

    out
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attr(value));
    out.push('"');
}
