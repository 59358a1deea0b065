//! Shadow-aware recursive walker.
//!
//! `walk` visits the shadow children of a node before its light children,
//! drops artifacts, batches loose inline content into paragraphs and
//! dispatches every other child through [`classify`]. A leaf converter that
//! yields nothing sends the node back to `classify` to resume at the next
//! leaf type, ending in a generic-container recursion or flattened text.

use crate::dom::{composed_children, text_content, ContentNode, NodeKind};
use crate::escape::escape_html;
use crate::markdown::{normalize_text, quote_lines};
use crate::result::ContentKind;
use crate::selector::artifacts::should_skip;

use super::classify::{classify, is_phrasing, NodeClass};
use super::handlers::{
    convert_code_block, convert_heading, convert_image, convert_inline_siblings, convert_list,
    convert_math, convert_paragraph, convert_rule, convert_table, MathDisplay,
};
use super::state::{Fragment, FragmentAccumulator};
use super::Context;

/// Walk the children of `node` into `acc`.
pub fn walk<N: ContentNode>(node: &N, acc: &mut FragmentAccumulator, ctx: &Context<'_>, depth: usize) {
    if depth > ctx.options.max_depth {
        ctx.trace(format_args!(
            "depth limit {} reached at <{}>, flattening",
            ctx.options.max_depth,
            node.tag().unwrap_or_default()
        ));
        push_flattened(node, acc);
        return;
    }
    walk_children(&composed_children(node), acc, ctx, depth);
}

fn walk_children<N: ContentNode>(
    children: &[N],
    acc: &mut FragmentAccumulator,
    ctx: &Context<'_>,
    depth: usize,
) {
    let mut batch: Vec<N> = Vec::new();

    for child in children {
        match child.kind() {
            NodeKind::Other => continue,
            NodeKind::Text => batch.push(child.clone()),
            NodeKind::Element => {
                if should_skip(child) {
                    ctx.trace(format_args!("skipping artifact <{}>", child.tag().unwrap_or_default()));
                    continue;
                }
                if is_phrasing(child) {
                    batch.push(child.clone());
                    continue;
                }
                flush_batch(&mut batch, acc, ctx);
                dispatch(child, acc, ctx, depth);
            }
        }
    }
    flush_batch(&mut batch, acc, ctx);
}

fn flush_batch<N: ContentNode>(batch: &mut Vec<N>, acc: &mut FragmentAccumulator, ctx: &Context<'_>) {
    if batch.is_empty() {
        return;
    }
    if let Some(fragment) = convert_inline_siblings(batch, ctx, acc.flags_mut()) {
        acc.push(fragment);
    }
    batch.clear();
}

fn content_kind(class: NodeClass) -> Option<ContentKind> {
    match class {
        NodeClass::Image => Some(ContentKind::Image),
        NodeClass::Math => Some(ContentKind::Formula),
        NodeClass::CodeBlock => Some(ContentKind::Code),
        NodeClass::Table => Some(ContentKind::Table),
        _ => None,
    }
}

/// Classify one child and hand it to its converter, falling through on empty results.
fn dispatch<N: ContentNode>(node: &N, acc: &mut FragmentAccumulator, ctx: &Context<'_>, depth: usize) {
    let mut after = None;
    loop {
        let class = classify(node, after);
        let fragment = match class {
            NodeClass::Image => convert_image(node, ctx),
            NodeClass::Math => convert_math(node, MathDisplay::of(node)),
            NodeClass::CodeBlock => convert_code_block(node),
            NodeClass::Table => convert_table(node, ctx, acc.flags_mut()),
            NodeClass::Rule => Some(convert_rule()),
            NodeClass::Paragraph => convert_paragraph(node, ctx, acc.flags_mut()),
            NodeClass::Heading => convert_heading(node, ctx, acc.flags_mut()),
            NodeClass::List => convert_list(node, ctx, acc.flags_mut()),
            NodeClass::Blockquote => convert_blockquote(node, acc, ctx, depth),
            NodeClass::GenericContainer => {
                walk(node, acc, ctx, depth + 1);
                return;
            }
            NodeClass::Unknown => {
                ctx.trace(format_args!(
                    "unrecognized <{}>, emitting flattened text",
                    node.tag().unwrap_or_default()
                ));
                push_flattened(node, acc);
                return;
            }
        };

        match fragment {
            Some(fragment) => {
                if let Some(kind) = content_kind(class) {
                    acc.mark(kind);
                }
                acc.push(fragment);
                return;
            }
            None => {
                ctx.trace(format_args!(
                    "{class:?} converter yielded nothing for <{}>, falling through",
                    node.tag().unwrap_or_default()
                ));
                after = Some(class);
            }
        }
    }
}

/// Walk a blockquote into a nested accumulator and prefix its text lines.
fn convert_blockquote<N: ContentNode>(
    node: &N,
    acc: &mut FragmentAccumulator,
    ctx: &Context<'_>,
    depth: usize,
) -> Option<Fragment> {
    let mut inner = FragmentAccumulator::new();
    walk(node, &mut inner, ctx, depth + 1);
    acc.flags_mut().merge(inner.flags());

    let (markup, text, _) = inner.finish();
    let text = normalize_text(&text);
    if markup.is_empty() && text.is_empty() {
        return None;
    }
    Some(Fragment::new(
        format!("<blockquote>{markup}</blockquote>"),
        format!("{}\n\n", quote_lines(&text)),
    ))
}

/// Last resort: the node's visible text in a bare span.
fn push_flattened<N: ContentNode>(node: &N, acc: &mut FragmentAccumulator) {
    let text = text_content(node);
    if text.is_empty() {
        return;
    }
    acc.push(Fragment::new(
        format!("<span>{}</span>", escape_html(&text)),
        format!("{text}\n\n"),
    ));
}
