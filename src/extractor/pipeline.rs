//! Turn extraction entry points.
//!
//! Assistant turns run the full pipeline: canonical root, shadow-aware walk,
//! then normalization with flattened-text fallbacks. User turns only carry
//! uploaded images and plain query lines, so they use a lighter scan.

use crate::dom::{
    find_all, has_any_class, tag_in, text_content, visit_descendants, ContentNode, Visit,
};
use crate::escape::escape_html;
use crate::markdown::normalize_text;
use crate::markers::{
    is_upload_container, ASSISTANT_TURN_TAGS, QUERY_LINE_CLASSES, QUERY_TEXT_CLASSES,
    USER_TURN_TAGS,
};
use crate::result::{ContentKind, ExtractedContent, Role, Turn};
use crate::selector::artifacts::should_skip;
use crate::selector::root::locate_root;

use super::handlers::image_fragment;
use super::state::{Fragment, FragmentAccumulator};
use super::walker::walk;
use super::Context;

/// Extract the content of one assistant turn.
pub fn extract_assistant<N: ContentNode>(outer: &N, ctx: &Context<'_>) -> ExtractedContent {
    let (root, source) = locate_root(outer);
    ctx.trace(format_args!(
        "canonical root <{}> via {source:?}",
        root.tag().unwrap_or_default()
    ));

    let mut acc = FragmentAccumulator::new();
    walk(&root, &mut acc, ctx, 0);
    finish(acc, &[&root, outer], ctx)
}

enum QueryPart<N> {
    Upload(N),
    Line(N),
    Text(N),
}

/// Extract the content of one user turn.
pub fn extract_user<N: ContentNode>(outer: &N, ctx: &Context<'_>) -> ExtractedContent {
    let mut parts = Vec::new();
    visit_descendants(outer, |node| {
        if should_skip(node) {
            return Visit::SkipChildren;
        }
        if is_upload_container(node) {
            parts.push(QueryPart::Upload(node.clone()));
            return Visit::SkipChildren;
        }
        if has_any_class(node, QUERY_LINE_CLASSES) {
            parts.push(QueryPart::Line(node.clone()));
            return Visit::SkipChildren;
        }
        if has_any_class(node, QUERY_TEXT_CLASSES) {
            parts.push(QueryPart::Text(node.clone()));
        }
        Visit::Continue
    });

    let has_lines = parts.iter().any(|part| matches!(part, QueryPart::Line(_)));
    let mut acc = FragmentAccumulator::new();

    for part in &parts {
        match part {
            QueryPart::Upload(container) => push_uploads(container, &mut acc, ctx),
            QueryPart::Line(line) => push_query_line(&text_content(line), &mut acc),
            QueryPart::Text(block) if !has_lines => {
                for line in text_content(block).lines() {
                    push_query_line(line, &mut acc);
                }
            }
            QueryPart::Text(_) => {}
        }
    }

    finish(acc, &[outer], ctx)
}

fn push_uploads<N: ContentNode>(container: &N, acc: &mut FragmentAccumulator, ctx: &Context<'_>) {
    let images = find_all(container, |n| tag_in(n, &["img"]) && !should_skip(n));
    if images.is_empty() {
        return;
    }
    acc.mark(ContentKind::Image);
    for img in &images {
        if let Some(image) = image_fragment(img, ctx, &ctx.options.uploaded_image_alt) {
            acc.push(Fragment::new(image.markup, format!("{}\n\n", image.text)));
        }
    }
}

/// Query text is emitted verbatim; a blank line keeps the paragraph break.
fn push_query_line(line: &str, acc: &mut FragmentAccumulator) {
    let line = line.trim();
    if line.is_empty() {
        acc.push(Fragment::new("<p><br></p>", "\n"));
    } else {
        acc.push(Fragment::new(format!("<p>{}</p>", escape_html(line)), format!("{line}\n")));
    }
}

/// Normalize the streams, falling back to flattened text when the walk
/// produced no text at all.
fn finish<N: ContentNode>(acc: FragmentAccumulator, fallbacks: &[&N], ctx: &Context<'_>) -> ExtractedContent {
    let (markup, text, flags) = acc.finish();
    let mut text = normalize_text(&text);

    if text.is_empty() {
        for (idx, node) in fallbacks.iter().enumerate() {
            let flattened = normalize_text(&text_content(*node));
            if !flattened.is_empty() {
                ctx.trace(format_args!("empty text, using flattened fallback #{}", idx + 1));
                text = flattened;
                break;
            }
        }
    }

    ExtractedContent::new(text, markup, flags)
}

/// Extract every turn under `root` in document order.
///
/// Turn containers are not searched for nested turns. Turns with no content
/// in either stream are dropped.
pub fn extract_conversation<N: ContentNode>(root: &N, ctx: &Context<'_>) -> Vec<Turn> {
    let mut found = Vec::new();
    visit_descendants(root, |node| {
        if should_skip(node) {
            return Visit::SkipChildren;
        }
        if tag_in(node, USER_TURN_TAGS) {
            found.push((Role::User, node.clone()));
            return Visit::SkipChildren;
        }
        if tag_in(node, ASSISTANT_TURN_TAGS) {
            found.push((Role::Assistant, node.clone()));
            return Visit::SkipChildren;
        }
        Visit::Continue
    });
    ctx.trace(format_args!("found {} turn containers", found.len()));

    found
        .into_iter()
        .map(|(role, node)| {
            let content = match role {
                Role::User => extract_user(&node, ctx),
                Role::Assistant => extract_assistant(&node, ctx),
            };
            Turn { role, content }
        })
        .filter(|turn| !turn.content.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body_or_root, parse};
    use crate::trace::NoopTracer;
    use crate::Options;

    fn with_ctx<R>(f: impl FnOnce(&Context<'_>) -> R) -> R {
        let options = Options::default();
        let ctx = Context {
            options: &options,
            base_url: None,
            tracer: &NoopTracer,
        };
        f(&ctx)
    }

    #[test]
    fn test_assistant_uses_real_body_not_decoy() {
        let doc = parse(
            r#"<model-response>
                <model-thoughts><message-content><p>thinking</p></message-content></model-thoughts>
                <message-content><p>answer</p></message-content>
            </model-response>"#,
        );
        let content = with_ctx(|ctx| extract_assistant(&body_or_root(&doc), ctx));
        assert_eq!(content.text, "answer");
        assert_eq!(content.markup, "<p>answer</p>");
    }

    #[test]
    fn test_assistant_text_fallback() {
        let doc = parse(r#"<message-content><p class="math-block">   </p></message-content>"#);
        let content = with_ctx(|ctx| extract_assistant(&body_or_root(&doc), ctx));
        assert!(content.is_empty());
    }

    #[test]
    fn test_user_lines_and_uploads() {
        let doc = parse(
            r#"<user-query>
                <user-query-file-preview><img src="blob:https://x.test/1" alt=""></user-query-file-preview>
                <div class="query-text">
                    <p class="query-text-line">What is *this*?</p>
                    <p class="query-text-line"></p>
                    <p class="query-text-line">Second &lt;para&gt;</p>
                </div>
            </user-query>"#,
        );
        let content = with_ctx(|ctx| extract_user(&body_or_root(&doc), ctx));
        assert!(content.has_images);
        assert_eq!(
            content.text,
            "![Uploaded image](blob:https://x.test/1)\n\nWhat is *this*?\n\nSecond <para>"
        );
        assert!(content.markup.contains("<p>Second &lt;para&gt;</p>"));
    }

    #[test]
    fn test_user_query_text_fallback_splits_lines() {
        let doc = parse(r#"<user-query><div class="query-text">one<br>two</div></user-query>"#);
        let content = with_ctx(|ctx| extract_user(&body_or_root(&doc), ctx));
        assert_eq!(content.text, "one\ntwo");
        assert_eq!(content.markup, "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn test_conversation_keeps_order_and_drops_empty_turns() {
        let doc = parse(
            r#"<main>
                <user-query><p class="query-text-line">Hi</p></user-query>
                <model-response><message-content><p>Hello!</p></message-content></model-response>
                <model-response><message-content></message-content></model-response>
            </main>"#,
        );
        let turns = with_ctx(|ctx| extract_conversation(&body_or_root(&doc), ctx));
        let roles: Vec<Role> = turns.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(turns[1].content.text, "Hello!");
    }
}
