//! Leaf converters.
//!
//! Each converter receives a node already classified as its content type
//! and returns a [`Fragment`], or `None` when the expected inner structure is
//! missing so the walker can fall through to the next classification.

use url::Url;

use crate::dom::{
    element_children, find_first, has_any_class, has_class, raw_text, tag_in, text_content,
    ContentNode,
};
use crate::escape::{escape_alt_text, escape_attr, escape_html, escape_link_destination};
use crate::markdown::{fenced_code, indent_lines, render_table, Alignment, TableModel};
use crate::markers::{
    is_attribution, is_generated_image, CODE_LABEL_CLASSES, MATH_INLINE_CLASS, MATH_LITERAL_ATTR,
};
use crate::patterns::{LANGUAGE_CLASS, TEXT_ALIGN_STYLE};
use crate::result::ContentFlags;
use crate::selector::artifacts::should_skip;
use crate::serialize::{serialize_cleaned_copy, serialize_verbatim};

use super::classify::heading_level;
use super::inline::{inline_run, inline_run_lifting_blocks, InlineScope};
use super::state::Fragment;
use super::Context;

// === Images ===

/// Resolve an image source, treating empty and `about:blank` as absent.
#[must_use]
pub fn resolve_src(raw: &str, base: Option<&Url>) -> Option<String> {
    let src = raw.trim();
    if src.is_empty() || src.eq_ignore_ascii_case("about:blank") {
        return None;
    }
    if Url::parse(src).is_ok() {
        return Some(src.to_string());
    }
    match base {
        Some(base) => base.join(src).ok().map(String::from),
        None => Some(src.to_string()),
    }
}

/// Usable source of an `<img>`: `src`, then `data-src`.
#[must_use]
pub fn image_source<N: ContentNode>(img: &N, base: Option<&Url>) -> Option<String> {
    img.attribute("src")
        .and_then(|src| resolve_src(&src, base))
        .or_else(|| img.attribute("data-src").and_then(|src| resolve_src(&src, base)))
}

/// Image as an inline `(markup, text)` pair, with no surrounding newlines.
#[must_use]
pub fn image_fragment<N: ContentNode>(img: &N, ctx: &Context<'_>, fallback_alt: &str) -> Option<Fragment> {
    let src = image_source(img, ctx.base_url)?;
    let alt = img
        .attribute("alt")
        .map(|alt| alt.trim().to_string())
        .filter(|alt| !alt.is_empty())
        .unwrap_or_else(|| fallback_alt.to_string());

    let markup = format!(r#"<img src="{}" alt="{}">"#, escape_attr(&src), escape_attr(&alt));
    let text = format!("![{}]({})", escape_alt_text(&alt), escape_link_destination(&src));
    Some(Fragment::new(markup, text))
}

/// Plain, search-result and generated images.
#[must_use]
pub fn convert_image<N: ContentNode>(node: &N, ctx: &Context<'_>) -> Option<Fragment> {
    let fallback_alt = ctx.options.image_fallback_alt.as_str();

    if tag_in(node, &["img"]) {
        let image = image_fragment(node, ctx, fallback_alt)?;
        return Some(Fragment::new(image.markup, format!("{}\n\n", image.text)));
    }

    let img = find_first(node, |n| tag_in(n, &["img"]) && !should_skip(n))?;
    let image = image_fragment(&img, ctx, fallback_alt)?;

    if is_generated_image(node) {
        return Some(Fragment::new(image.markup, format!("{}\n\n", image.text)));
    }

    let Some(attribution) = find_first(node, is_attribution) else {
        return Some(Fragment::new(image.markup, format!("{}\n\n", image.text)));
    };
    let (source_markup, source_text) = attribution_line(&attribution, ctx);

    let mut markup = format!("<figure>{}", image.markup);
    let mut text = image.text;
    if ctx.options.include_image_attribution && !source_text.is_empty() {
        markup.push_str(&format!("<figcaption>Source: {source_markup}</figcaption>"));
        text.push_str(&format!("\n*Source: {source_text}*"));
    }
    markup.push_str("</figure>");
    text.push_str("\n\n");
    Some(Fragment::new(markup, text))
}

/// `(markup, text)` of the source label, linked when the attribution has a link.
fn attribution_line<N: ContentNode>(attribution: &N, ctx: &Context<'_>) -> (String, String) {
    let link = find_first(attribution, |n| tag_in(n, &["a"]) && n.attribute("href").is_some());
    let href = link
        .as_ref()
        .and_then(|a| a.attribute("href"))
        .and_then(|href| resolve_src(&href, ctx.base_url));

    let mut label = link
        .as_ref()
        .map(text_content)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| text_content(attribution));
    label = label.split_whitespace().collect::<Vec<_>>().join(" ");

    match href {
        Some(href) => {
            if label.is_empty() {
                label = Url::parse(&href)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string))
                    .unwrap_or_else(|| href.clone());
            }
            (
                format!(r#"<a href="{}">{}</a>"#, escape_attr(&href), escape_html(&label)),
                format!("[{}]({})", escape_alt_text(&label), escape_link_destination(&href)),
            )
        }
        None if label.is_empty() => (String::new(), String::new()),
        None => (escape_html(&label), escape_alt_text(&label)),
    }
}

// === Math ===

/// Where a formula sits in the text flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathDisplay {
    Block,
    Inline,
}

impl MathDisplay {
    #[must_use]
    pub fn of<N: ContentNode>(node: &N) -> Self {
        if has_class(node, MATH_INLINE_CLASS) {
            Self::Inline
        } else {
            Self::Block
        }
    }
}

/// Literal formula source of a math node or its first annotated descendant.
#[must_use]
pub fn math_literal<N: ContentNode>(node: &N) -> Option<String> {
    node.attribute(MATH_LITERAL_ATTR)
        .or_else(|| {
            find_first(node, |n| n.attribute(MATH_LITERAL_ATTR).is_some())
                .and_then(|n| n.attribute(MATH_LITERAL_ATTR))
        })
        .map(|literal| literal.trim().to_string())
        .filter(|literal| !literal.is_empty())
}

/// Math formula: verbatim rendered markup, `$$…$$` or `$…$` text.
#[must_use]
pub fn convert_math<N: ContentNode>(node: &N, display: MathDisplay) -> Option<Fragment> {
    let literal = math_literal(node)?;
    let markup = serialize_verbatim(node, Some((MATH_LITERAL_ATTR, literal.as_str())));
    let text = match display {
        MathDisplay::Block => format!("\n$$\n{literal}\n$$\n\n"),
        MathDisplay::Inline => format!("${literal}$"),
    };
    Some(Fragment::new(markup, text))
}

// === Code Blocks ===

/// Inner element holding the code: role-flagged `code`, any `code`, then `pre`.
fn code_element<N: ContentNode>(node: &N) -> Option<N> {
    find_first(node, |n| {
        tag_in(n, &["code"]) && n.attribute("role").as_deref() == Some("text")
    })
    .or_else(|| find_first(node, |n| tag_in(n, &["code"])))
    .or_else(|| find_first(node, |n| tag_in(n, &["pre"])))
}

/// Source text of a code block, without its decoration label.
#[must_use]
pub fn code_block_source<N: ContentNode>(node: &N) -> Option<String> {
    let source = code_element(node).unwrap_or_else(|| node.clone());
    let code = raw_text(&source);
    let code = code.trim_matches('\n');
    (!code.trim().is_empty()).then(|| code.to_string())
}

/// Fenced code block with an inferred language label.
#[must_use]
pub fn convert_code_block<N: ContentNode>(node: &N) -> Option<Fragment> {
    let code = code_block_source(node)?;
    let code = code.as_str();
    let language = code_language(node, code_element(node).as_ref());
    let class_attr = language
        .as_deref()
        .map(|lang| format!(r#" class="language-{}""#, escape_attr(lang)))
        .unwrap_or_default();

    let markup = format!("<pre><code{class_attr}>{}</code></pre>", escape_html(code));
    let text = format!("\n{}\n", fenced_code(code, language.as_deref()));
    Some(Fragment::new(markup, text))
}

/// Language from the decoration label, else from a `language-X` class.
fn code_language<N: ContentNode>(node: &N, code_el: Option<&N>) -> Option<String> {
    let from_label = find_first(node, |n| has_any_class(n, CODE_LABEL_CLASSES))
        .map(|label| text_content(&label))
        .and_then(|text| text.lines().next().map(str::trim).map(str::to_string))
        .filter(|text| !text.is_empty());

    let from_class = || {
        code_el
            .and_then(|el| el.attribute("class"))
            .into_iter()
            .chain(node.attribute("class"))
            .find_map(|class| {
                LANGUAGE_CLASS
                    .captures(&class)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
            })
    };

    from_label
        .or_else(from_class)
        .map(|lang| lang.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase())
}

// === Tables ===

/// GFM pipe table text and a cleaned copy of the source table as markup.
#[must_use]
pub fn convert_table<N: ContentNode>(
    node: &N,
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
) -> Option<Fragment> {
    let table = if tag_in(node, &["table"]) {
        node.clone()
    } else {
        find_first(node, |n| tag_in(n, &["table"]))?
    };

    let model = table_model(&table, ctx, flags);
    if model.is_empty() {
        return None;
    }

    let text = format!("\n{}\n", render_table(&model));
    Some(Fragment::new(serialize_cleaned_copy(&table), text))
}

/// Build the row model of a table, promoting the first body row to header
/// when there is no `<thead>` row. Later `<thead>` rows lead the body.
#[must_use]
pub fn table_model<N: ContentNode>(table: &N, ctx: &Context<'_>, flags: &mut ContentFlags) -> TableModel {
    let mut head_rows: Vec<N> = Vec::new();
    let mut body_rows: Vec<N> = Vec::new();

    for section in element_children(table) {
        match section.tag().as_deref() {
            Some("thead") => head_rows.extend(rows_of(&section)),
            Some("tbody" | "tfoot") => body_rows.extend(rows_of(&section)),
            Some("tr") => body_rows.push(section),
            _ => {}
        }
    }

    let (header_row, rows): (Option<&N>, Vec<&N>) = match head_rows.split_first() {
        Some((first, rest)) => (Some(first), rest.iter().chain(&body_rows).collect()),
        None => {
            let mut body = body_rows.iter();
            (body.next(), body.collect())
        }
    };

    let mut model = TableModel::default();
    if let Some(header_row) = header_row {
        for cell in cells_of(header_row) {
            model.alignments.push(cell_alignment(&cell));
            push_cell(&mut model.header, &cell, ctx, flags);
        }
    }
    for row in rows {
        let mut cells = Vec::new();
        for cell in cells_of(row) {
            push_cell(&mut cells, &cell, ctx, flags);
        }
        if !cells.is_empty() {
            model.rows.push(cells);
        }
    }
    model
}

fn rows_of<N: ContentNode>(section: &N) -> Vec<N> {
    element_children(section)
        .into_iter()
        .filter(|n| tag_in(n, &["tr"]))
        .collect()
}

fn cells_of<N: ContentNode>(row: &N) -> Vec<N> {
    element_children(row)
        .into_iter()
        .filter(|n| tag_in(n, &["td", "th"]) && !should_skip(n))
        .collect()
}

fn push_cell<N: ContentNode>(cells: &mut Vec<String>, cell: &N, ctx: &Context<'_>, flags: &mut ContentFlags) {
    let content = inline_run(cell, ctx, flags, InlineScope::default());
    cells.push(content.text);
    let span = cell
        .attribute("colspan")
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, 64);
    cells.extend(std::iter::repeat_n(String::new(), span - 1));
}

fn cell_alignment<N: ContentNode>(cell: &N) -> Alignment {
    if let Some(align) = cell.attribute("align") {
        return Alignment::from_keyword(&align);
    }
    cell.attribute("style")
        .and_then(|style| {
            TEXT_ALIGN_STYLE
                .captures(&style)
                .and_then(|caps| caps.get(1))
                .map(|m| Alignment::from_keyword(m.as_str()))
        })
        .unwrap_or_default()
}

// === Rules, Paragraphs, Headings ===

#[must_use]
pub fn convert_rule() -> Fragment {
    Fragment::new("<hr>", "\n---\n\n")
}

#[must_use]
pub fn convert_paragraph<N: ContentNode>(node: &N, ctx: &Context<'_>, flags: &mut ContentFlags) -> Option<Fragment> {
    let content = inline_run(node, ctx, flags, InlineScope::default());
    if content.is_empty() {
        return None;
    }
    Some(Fragment::new(
        format!("<p>{}</p>", content.markup),
        format!("{}\n\n", content.text),
    ))
}

/// Paragraph from loose inline siblings batched by the walker.
#[must_use]
pub fn convert_inline_siblings<N: ContentNode>(
    nodes: &[N],
    ctx: &Context<'_>,
    flags: &mut ContentFlags,
) -> Option<Fragment> {
    let content = super::inline::inline_nodes(nodes, ctx, flags, InlineScope::default());
    if content.is_empty() {
        return None;
    }
    Some(Fragment::new(
        format!("<p>{}</p>", content.markup),
        format!("{}\n\n", content.text),
    ))
}

#[must_use]
pub fn convert_heading<N: ContentNode>(node: &N, ctx: &Context<'_>, flags: &mut ContentFlags) -> Option<Fragment> {
    let level = heading_level(node)?;
    let content = inline_run(node, ctx, flags, InlineScope::default());
    if content.text.is_empty() {
        return None;
    }
    // An ATX heading ends at the first newline.
    let text = content.text.replace('\n', " ");
    Some(Fragment::new(
        format!("<h{level}>{}</h{level}>", content.markup),
        format!("{} {text}\n\n", "#".repeat(level)),
    ))
}

// === Lists ===

/// Markdown list text (nested lists indented two spaces per level) and a
/// cleaned copy of the list as markup.
#[must_use]
pub fn convert_list<N: ContentNode>(node: &N, ctx: &Context<'_>, flags: &mut ContentFlags) -> Option<Fragment> {
    let text = list_text(node, 0, ctx, flags);
    if text.trim().is_empty() {
        return None;
    }
    Some(Fragment::new(serialize_cleaned_copy(node), format!("{text}\n")))
}

/// Text of one list level; `depth` starts at 0.
///
/// Code blocks inside an item are fenced on their own lines after the item
/// line, indented to the item's content column.
#[must_use]
pub fn list_text<N: ContentNode>(list: &N, depth: usize, ctx: &Context<'_>, flags: &mut ContentFlags) -> String {
    let ordered = tag_in(list, &["ol"]);
    let mut number = list
        .attribute("start")
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(1);
    let indent = "  ".repeat(depth);
    let mut out = String::new();

    for item in element_children(list) {
        if !tag_in(&item, &["li"]) || should_skip(&item) {
            continue;
        }

        let scope = InlineScope {
            skip_lists: true,
            lift_code_blocks: true,
            ..InlineScope::default()
        };
        let (content, blocks) = inline_run_lifting_blocks(&item, ctx, flags, scope);
        let marker = if ordered { format!("{number}. ") } else { "- ".to_string() };
        number = number.saturating_add(1);

        out.push_str(&indent);
        out.push_str(&marker);
        out.push_str(&content.text.replace('\n', &format!("\n{indent}  ")));
        out.push('\n');

        let body_indent = format!("{indent}{}", " ".repeat(marker.len()));
        for block in &blocks {
            out.push_str(&indent_lines(block.text.trim_matches('\n'), &body_indent));
            out.push('\n');
        }

        if depth >= ctx.options.max_depth {
            continue;
        }
        for nested in element_children(&item) {
            if tag_in(&nested, &["ul", "ol"]) && !should_skip(&nested) {
                out.push_str(&list_text(&nested, depth + 1, ctx, flags));
            }
        }
    }
    out
}
