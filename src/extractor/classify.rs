//! Node classification for the walker.
//!
//! One function decides what a child node is. Leaf types are tried in a
//! fixed priority order; when a leaf converter cannot extract anything the
//! walker asks again with `after` set, which resumes the search at the next
//! leaf type before falling back to a generic container or unknown node.

use crate::dom::{find_first, has_class, is_block_tag, tag_in, ContentNode};
use crate::markers::{
    is_attribution, is_code_block, is_container, is_generated_image, is_image_result_wrapper,
    is_math, is_table_wrapper, MATH_INLINE_CLASS,
};

/// What the walker does with a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Image,
    Math,
    CodeBlock,
    Table,
    Rule,
    Paragraph,
    Heading,
    List,
    Blockquote,
    /// Recurse into the children with the same walk.
    GenericContainer,
    /// Emit the flattened visible text verbatim.
    Unknown,
}

/// Leaf classes in priority order.
pub const LEAF_PRIORITY: [NodeClass; 9] = [
    NodeClass::Image,
    NodeClass::Math,
    NodeClass::CodeBlock,
    NodeClass::Table,
    NodeClass::Rule,
    NodeClass::Paragraph,
    NodeClass::Heading,
    NodeClass::List,
    NodeClass::Blockquote,
];

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Tags that flow inline and are batched into one paragraph by the walker.
const PHRASING_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "del", "dfn", "em", "i",
    "ins", "kbd", "mark", "q", "s", "samp", "small", "strike", "strong", "sub", "sup", "time",
    "u", "var",
];

/// Classify `node`, resuming after the leaf class `after` if given.
#[must_use]
pub fn classify<N: ContentNode>(node: &N, after: Option<NodeClass>) -> NodeClass {
    let start = after
        .and_then(|class| LEAF_PRIORITY.iter().position(|leaf| *leaf == class))
        .map_or(0, |idx| idx + 1);

    for leaf in &LEAF_PRIORITY[start..] {
        let claimed = match leaf {
            NodeClass::Image => is_image(node),
            NodeClass::Math => is_math(node),
            NodeClass::CodeBlock => is_code_block(node),
            NodeClass::Table => tag_in(node, &["table"]) || is_table_wrapper(node),
            NodeClass::Rule => tag_in(node, &["hr"]),
            NodeClass::Paragraph => tag_in(node, &["p"]),
            NodeClass::Heading => tag_in(node, HEADING_TAGS),
            NodeClass::List => tag_in(node, &["ul", "ol"]),
            NodeClass::Blockquote => tag_in(node, &["blockquote"]),
            NodeClass::GenericContainer | NodeClass::Unknown => false,
        };
        if claimed {
            return *leaf;
        }
    }

    if is_container(node) {
        NodeClass::GenericContainer
    } else {
        NodeClass::Unknown
    }
}

fn is_image<N: ContentNode>(node: &N) -> bool {
    if tag_in(node, &["img"]) || is_generated_image(node) {
        return true;
    }
    is_image_result_wrapper(node)
        && find_first(node, is_attribution).is_some()
        && find_first(node, |n| tag_in(n, &["img"])).is_some()
}

/// Heading level for `h1`..`h6`.
#[must_use]
pub fn heading_level<N: ContentNode>(node: &N) -> Option<usize> {
    let tag = node.tag()?;
    let level = tag.strip_prefix('h')?.parse::<usize>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// True if `node` flows inline: text, phrasing tags, inline math, and spans
/// without block-level content.
#[must_use]
pub fn is_phrasing<N: ContentNode>(node: &N) -> bool {
    if node.is_text() {
        return true;
    }
    if has_class(node, MATH_INLINE_CLASS) {
        return true;
    }
    if tag_in(node, PHRASING_TAGS) {
        return true;
    }
    tag_in(node, &["span"])
        && find_first(node, |n| {
            n.tag().is_some_and(|t| is_block_tag(&t) || t == "img")
                || is_container(n)
                || is_math(n)
                || is_code_block(n)
        })
        .is_none()
}
