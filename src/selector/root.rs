//! Canonical Root Locator
//!
//! Picks the single node holding the authoritative rendered content of a
//! turn. A collapsed reasoning panel renders an earlier, decoy body marker,
//! so candidates under a reasoning panel are never accepted.
//!
//! Fallback order:
//! 1. first message-body marker outside any reasoning panel
//! 2. first looser Markdown-content marker outside any reasoning panel
//! 3. the outer container, if it carries a content marker itself
//! 4. the outer container, unconditionally

use crate::dom::{visit_descendants, ContentNode, Visit};
use crate::markers::{is_content_marked, is_markdown_content, is_message_body};

use super::artifacts::is_reasoning_panel;

/// Which fallback step produced the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    MessageBody,
    MarkdownContent,
    MarkedContainer,
    Container,
}

/// Locate the canonical content root inside `outer`.
///
/// Never fails: the last fallback is `outer` itself.
#[must_use]
pub fn locate_root<N: ContentNode>(outer: &N) -> (N, RootSource) {
    if let Some(body) = first_outside_thoughts(outer, is_message_body) {
        return (body, RootSource::MessageBody);
    }
    if let Some(markdown) = first_outside_thoughts(outer, is_markdown_content) {
        return (markdown, RootSource::MarkdownContent);
    }
    if is_content_marked(outer) {
        return (outer.clone(), RootSource::MarkedContainer);
    }
    (outer.clone(), RootSource::Container)
}

/// First descendant matching `pred` whose ancestor chain (below `outer`)
/// contains no reasoning panel.
fn first_outside_thoughts<N, P>(outer: &N, pred: P) -> Option<N>
where
    N: ContentNode,
    P: Fn(&N) -> bool,
{
    let mut found = None;
    visit_descendants(outer, |node| {
        if is_reasoning_panel(node) {
            return Visit::SkipChildren;
        }
        if pred(node) {
            found = Some(node.clone());
            return Visit::Stop;
        }
        Visit::Continue
    });
    found
}
