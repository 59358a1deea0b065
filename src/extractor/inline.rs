//! Inline runs.
//!
//! An inline run flattens the children of a paragraph, heading, list item or
//! table cell into one `(markup, text)` pair. Emphasis, links, inline code,
//! inline images and inline formulas get their own syntax; any other element
//! is flattened into the surrounding run so its text is never dropped.

use crate::dom::{composed_children, is_block_tag, tag_in, text_content, ContentNode, NodeKind};
use crate::escape::{escape_attr, escape_html, escape_link_destination, escape_markdown};
use crate::markdown::inline_code;
use crate::markers::{is_code_block, is_math};
use crate::patterns::WHITESPACE_RUN;
use crate::result::{ContentFlags, ContentKind};
use crate::selector::artifacts::should_skip;

use super::handlers::{
    code_block_source, convert_code_block, convert_math, image_fragment, resolve_src, MathDisplay,
};
use super::state::Fragment;
use super::Context;

/// Where an inline run sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineScope {
    /// Drop `ul`/`ol` children of the run's own node (list items render them separately).
    pub skip_lists: bool,
    /// Inside a code element: no Markdown escaping, no nested syntax.
    pub in_code: bool,
    /// Render code blocks as separate fenced blocks instead of inline spans.
    pub lift_code_blocks: bool,
}

/// Inline run over the children of `node`.
#[must_use]
pub fn inline_run<N: ContentNode>(
    node: &N,
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
    scope: InlineScope,
) -> Fragment {
    inline_nodes(&composed_children(node), ctx, flags, scope)
}

/// Inline run over the children of `node`, plus the code blocks lifted out
/// of it in document order when `scope.lift_code_blocks` is set.
#[must_use]
pub fn inline_run_lifting_blocks<N: ContentNode>(
    node: &N,
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
    scope: InlineScope,
) -> (Fragment, Vec<Fragment>) {
    let mut run = Run::default();
    for child in composed_children(node) {
        push_node(&child, ctx, flags, scope, &mut run, 0);
    }
    let blocks = std::mem::take(&mut run.blocks);
    (run.finish().0, blocks)
}

/// Inline run over a sequence of sibling nodes.
#[must_use]
pub fn inline_nodes<N: ContentNode>(
    nodes: &[N],
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
    scope: InlineScope,
) -> Fragment {
    let mut run = Run::default();
    for node in nodes {
        push_node(node, ctx, flags, scope, &mut run, 0);
    }
    run.finish().0
}

/// Both halves of a run under construction.
///
/// Whitespace is held back as a pending separator so runs never start or
/// end with a space and never contain two in a row.
#[derive(Default)]
struct Run {
    markup: String,
    text: String,
    pending_space: bool,
    leading_space: bool,
    blocks: Vec<Fragment>,
}

impl Run {
    fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.text.is_empty()
    }

    fn space(&mut self) {
        if self.is_empty() {
            self.leading_space = true;
        } else {
            self.pending_space = true;
        }
    }

    fn push(&mut self, markup: &str, text: &str) {
        if markup.is_empty() && text.is_empty() {
            return;
        }
        if self.pending_space {
            if !self.text.ends_with('\n') {
                self.text.push(' ');
            }
            self.markup.push(' ');
            self.pending_space = false;
        }
        self.markup.push_str(markup);
        self.text.push_str(text);
    }

    fn line_break(&mut self) {
        if self.is_empty() {
            return;
        }
        self.pending_space = false;
        self.markup.push_str("<br>");
        self.text.push('\n');
    }

    /// Wrap a finished inner run in `open`/`close` syntax, keeping its outer
    /// whitespace outside the markers.
    fn push_wrapped(&mut self, mut inner: Run, markup: (&str, &str), text: (&str, &str)) {
        self.blocks.append(&mut inner.blocks);
        let (fragment, leading, trailing) = inner.finish();
        if leading {
            self.space();
        }
        if !fragment.text.trim().is_empty() {
            self.push(
                &format!("{}{}{}", markup.0, fragment.markup, markup.1),
                &format!("{}{}{}", text.0, fragment.text.trim(), text.1),
            );
        }
        if trailing {
            self.space();
        }
    }

    /// Consume into the fragment plus whether it had leading and trailing whitespace.
    fn finish(self) -> (Fragment, bool, bool) {
        let text = self.text.trim_end_matches('\n').to_string();
        (
            Fragment::new(self.markup, text),
            self.leading_space,
            self.pending_space,
        )
    }
}

fn push_node<N: ContentNode>(
    node: &N,
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
    scope: InlineScope,
    run: &mut Run,
    depth: usize,
) {
    match node.kind() {
        NodeKind::Text => push_text(&node.own_text(), scope, run),
        NodeKind::Other => {}
        NodeKind::Element => {
            if should_skip(node) || node.attribute("hidden").is_some() {
                return;
            }
            if depth >= ctx.options.max_depth {
                ctx.trace(format_args!(
                    "inline depth limit reached at <{}>, flattening",
                    node.tag().unwrap_or_default()
                ));
                push_text(&text_content(node), scope, run);
                return;
            }
            push_element(node, ctx, flags, scope, run, depth);
        }
    }
}

fn push_text(text: &str, scope: InlineScope, run: &mut Run) {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let trimmed = collapsed.trim();
    if collapsed.starts_with(' ') {
        run.space();
    }
    if !trimmed.is_empty() {
        let text = if scope.in_code {
            trimmed.to_string()
        } else {
            escape_markdown(trimmed)
        };
        run.push(&escape_html(trimmed), &text);
        if collapsed.ends_with(' ') {
            run.space();
        }
    }
}

fn push_children<N: ContentNode>(
    node: &N,
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
    scope: InlineScope,
    run: &mut Run,
    depth: usize,
) {
    let inner_scope = InlineScope {
        skip_lists: false,
        ..scope
    };
    for child in composed_children(node) {
        push_node(&child, ctx, flags, inner_scope, run, depth + 1);
    }
}

fn sub_run<N: ContentNode>(
    node: &N,
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
    scope: InlineScope,
    depth: usize,
) -> Run {
    let mut inner = Run::default();
    push_children(node, ctx, flags, scope, &mut inner, depth);
    inner
}

fn push_element<N: ContentNode>(
    node: &N,
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
    scope: InlineScope,
    run: &mut Run,
    depth: usize,
) {
    let tag = node.tag().unwrap_or_default();

    if tag == "br" {
        if scope.in_code {
            run.space();
        } else {
            run.line_break();
        }
        return;
    }
    if scope.skip_lists && depth == 0 && (tag == "ul" || tag == "ol") {
        return;
    }
    if scope.in_code {
        push_children(node, ctx, flags, scope, run, depth);
        return;
    }

    if tag == "img" {
        if let Some(image) = image_fragment(node, ctx, &ctx.options.image_fallback_alt) {
            flags.mark(ContentKind::Image);
            run.push(&image.markup, &image.text);
        }
        return;
    }

    if is_math(node) {
        if let Some(math) = convert_math(node, MathDisplay::Inline) {
            flags.mark(ContentKind::Formula);
            run.push(&math.markup, &math.text);
            return;
        }
    }

    if tag == "code" || is_code_block(node) {
        let block = tag != "code";
        if block && scope.lift_code_blocks {
            if let Some(code) = convert_code_block(node) {
                flags.mark(ContentKind::Code);
                run.blocks.push(code);
                return;
            }
        }
        push_code(node, ctx, flags, scope, run, depth, block);
        return;
    }

    match tag.as_str() {
        "em" | "i" => {
            let inner = sub_run(node, ctx, flags, scope, depth);
            run.push_wrapped(inner, ("<em>", "</em>"), ("*", "*"));
        }
        "strong" | "b" => {
            let inner = sub_run(node, ctx, flags, scope, depth);
            run.push_wrapped(inner, ("<strong>", "</strong>"), ("**", "**"));
        }
        "del" | "s" | "strike" => {
            let inner = sub_run(node, ctx, flags, scope, depth);
            run.push_wrapped(inner, ("<del>", "</del>"), ("~~", "~~"));
        }
        "sup" | "sub" => {
            let inner = sub_run(node, ctx, flags, scope, depth);
            let (open, close) = (format!("<{tag}>"), format!("</{tag}>"));
            run.push_wrapped(inner, (&open, &close), ("", ""));
        }
        "a" => push_link(node, ctx, flags, scope, run, depth),
        _ if is_block_tag(&tag) || tag_in(node, &["td", "th"]) => {
            run.space();
            push_children(node, ctx, flags, scope, run, depth);
            run.space();
        }
        _ => push_children(node, ctx, flags, scope, run, depth),
    }
}

fn push_code<N: ContentNode>(
    node: &N,
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
    scope: InlineScope,
    run: &mut Run,
    depth: usize,
    block: bool,
) {
    let code = if block {
        code_block_source(node)
            .map(|code| WHITESPACE_RUN.replace_all(code.trim(), " ").into_owned())
            .unwrap_or_default()
    } else {
        let inner = sub_run(node, ctx, flags, InlineScope { in_code: true, ..scope }, depth);
        inner.finish().0.text
    };
    if code.is_empty() {
        return;
    }
    if block {
        flags.mark(ContentKind::Code);
    }
    run.push(&format!("<code>{}</code>", escape_html(&code)), &inline_code(&code));
}

fn push_link<N: ContentNode>(
    node: &N,
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
    scope: InlineScope,
    run: &mut Run,
    depth: usize,
) {
    let href = node
        .attribute("href")
        .filter(|href| !href.trim_start().to_ascii_lowercase().starts_with("javascript:"))
        .and_then(|href| resolve_src(&href, ctx.base_url));

    let Some(href) = href else {
        push_children(node, ctx, flags, scope, run, depth);
        return;
    };

    let inner = sub_run(node, ctx, flags, scope, depth);
    let open_markup = format!(r#"<a href="{}">"#, escape_attr(&href));
    let close_text = format!("]({})", escape_link_destination(&href));
    run.push_wrapped(inner, (&open_markup, "</a>"), ("[", &close_text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse, Document, NodeRef};
    use crate::trace::NoopTracer;
    use crate::Options;

    fn first<'a>(doc: &'a Document, selector: &str) -> Option<NodeRef<'a>> {
        doc.select(selector).nodes().first().copied()
    }

    fn run_of(html: &str, selector: &str) -> (Fragment, ContentFlags) {
        let doc = parse(html);
        let options = Options::default();
        let ctx = Context {
            options: &options,
            base_url: None,
            tracer: &NoopTracer,
        };
        let mut flags = ContentFlags::default();
        let fragment = first(&doc, selector)
            .map(|node| inline_run(&node, &ctx, &mut flags, InlineScope::default()))
            .unwrap_or_default();
        (fragment, flags)
    }

    #[test]
    fn test_emphasis_and_strong() {
        let (frag, _) = run_of("<p>a <em>b</em> and <strong>c d</strong>.</p>", "p");
        assert_eq!(frag.text, "a *b* and **c d**.");
        assert_eq!(frag.markup, "a <em>b</em> and <strong>c d</strong>.");
    }

    #[test]
    fn test_spaces_move_outside_markers() {
        let (frag, _) = run_of("<p>x<b> bold </b>y</p>", "p");
        assert_eq!(frag.text, "x **bold** y");
    }

    #[test]
    fn test_text_is_escaped_per_stream() {
        let (frag, _) = run_of("<p>a_b &lt;tag&gt; *x*</p>", "p");
        assert_eq!(frag.text, r"a\_b \<tag\> \*x\*");
        assert_eq!(frag.markup, "a_b &lt;tag&gt; *x*");
    }

    #[test]
    fn test_inline_code_is_not_escaped() {
        let (frag, flags) = run_of("<p>call <code>my_fn(*args)</code> now</p>", "p");
        assert_eq!(frag.text, "call `my_fn(*args)` now");
        assert_eq!(frag.markup, "call <code>my_fn(*args)</code> now");
        assert!(!flags.has(ContentKind::Code));
    }

    #[test]
    fn test_code_inside_code_is_flattened() {
        let (frag, _) = run_of("<p><code>a <b>b</b> <code>c</code></code></p>", "p");
        assert_eq!(frag.text, "`a b c`");
    }

    #[test]
    fn test_links() {
        let (frag, _) = run_of(r#"<p>see <a href="https://x.test/a b">the docs</a></p>"#, "p");
        assert_eq!(frag.text, "see [the docs](https://x.test/a%20b)");
        assert!(frag.markup.contains(r#"<a href="https://x.test/a b">the docs</a>"#));
    }

    #[test]
    fn test_javascript_link_keeps_only_text() {
        let (frag, _) = run_of(r#"<p><a href="javascript:void(0)">click</a></p>"#, "p");
        assert_eq!(frag.text, "click");
    }

    #[test]
    fn test_line_break_and_strike() {
        let (frag, _) = run_of("<p>one<br>two <del>old</del></p>", "p");
        assert_eq!(frag.text, "one\ntwo ~~old~~");
        assert_eq!(frag.markup, "one<br>two <del>old</del>");
    }

    #[test]
    fn test_inline_image_and_math_mark_flags() {
        let (frag, flags) = run_of(
            r#"<p>see <img src="https://x.test/i.png" alt="i"> and <span class="math-inline" data-math="a^2">a²</span></p>"#,
            "p",
        );
        assert_eq!(frag.text, "see ![i](https://x.test/i.png) and $a^2$");
        assert!(flags.has(ContentKind::Image));
        assert!(flags.has(ContentKind::Formula));
    }

    #[test]
    fn test_artifacts_are_skipped() {
        let (frag, _) = run_of(
            r#"<p>Hello <source-inline-chip><mat-icon>link</mat-icon>cite</source-inline-chip> World</p>"#,
            "p",
        );
        assert_eq!(frag.text, "Hello World");
        assert!(!frag.markup.contains("cite"));
    }

    #[test]
    fn test_code_block_in_run_reads_inner_code_only() {
        let (frag, flags) = run_of(
            "<div>see <code-block><div class=\"code-block-decoration\">Bash</div>\
             <pre><code>cd x\nmake</code></pre></code-block></div>",
            "div",
        );
        assert_eq!(frag.text, "see `cd x make`");
        assert!(flags.has(ContentKind::Code));
    }

    #[test]
    fn test_subtree_past_depth_limit_is_flattened() {
        let html = format!("<p>head {}deep{} tail</p>", "<span>".repeat(300), "</span>".repeat(300));
        let (frag, _) = run_of(&html, "p");
        assert_eq!(frag.text, "head deep tail");
    }

    #[test]
    fn test_unknown_wrappers_are_flattened() {
        let (frag, _) = run_of("<p><x-widget><span>deep</span> text</x-widget></p>", "p");
        assert_eq!(frag.text, "deep text");
    }

    #[test]
    fn test_list_items_skip_nested_lists() {
        let doc = parse("<ul><li>item <ul><li>nested</li></ul></li></ul>");
        let options = Options::default();
        let ctx = Context {
            options: &options,
            base_url: None,
            tracer: &NoopTracer,
        };
        let mut flags = ContentFlags::default();
        let scope = InlineScope {
            skip_lists: true,
            ..InlineScope::default()
        };
        let text = first(&doc, "li")
            .map(|li| inline_run(&li, &ctx, &mut flags, scope).text)
            .unwrap_or_default();
        assert_eq!(text, "item");
    }
}
