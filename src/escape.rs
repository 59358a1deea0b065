//! Escaping utilities for the two output streams.
//!
//! Markup escaping makes raw text safe inside element content and attribute
//! values. Markdown escaping keeps literal characters from being parsed as
//! syntax by a CommonMark reader.

/// Characters that have special meaning in inline Markdown.
const MARKDOWN_SPECIAL_CHARS: &[char] = &['\\', '`', '*', '_', '[', ']', '<', '>'];

/// Escape text for use as HTML element content.
///
/// # Examples
///
/// ```
/// use turn_extract::escape::escape_html;
///
/// assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
/// ```
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text for use inside a double-quoted HTML attribute value.
#[must_use]
pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape Markdown special characters in text content.
///
/// # Characters Escaped
///
/// - `\` `` ` `` `*` `_` `[` `]` `<` `>`
/// - `#` at the start of the text (would open a heading)
///
/// # Examples
///
/// ```
/// use turn_extract::escape::escape_markdown;
///
/// assert_eq!(escape_markdown("*not italic*"), r"\*not italic\*");
/// assert_eq!(escape_markdown("my_variable_name"), r"my\_variable\_name");
/// ```
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(text.len() + text.len() / 4);
    for (i, ch) in text.chars().enumerate() {
        if MARKDOWN_SPECIAL_CHARS.contains(&ch) || (i == 0 && ch == '#') {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

/// Escape image alt text so `![alt](src)` stays parseable.
///
/// Only bracket and backslash characters can break the image syntax.
#[must_use]
pub fn escape_alt_text(alt: &str) -> String {
    let mut out = String::with_capacity(alt.len());
    for ch in alt.chars() {
        if matches!(ch, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape a URL for the destination part of a Markdown link or image.
///
/// Spaces and parentheses would end the destination early.
#[must_use]
pub fn escape_link_destination(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for ch in url.chars() {
        match ch {
            ' ' => out.push_str("%20"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a table cell for a GFM pipe table (one line, no bare pipes).
#[must_use]
pub fn escape_table_cell(cell: &str) -> String {
    let one_line = cell.split_whitespace().collect::<Vec<_>>().join(" ");
    one_line.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_entities() {
        assert_eq!(escape_html("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
        assert_eq!(escape_html("say \"hi\""), "say \"hi\"");
    }

    #[test]
    fn test_escape_attr_quotes() {
        assert_eq!(escape_attr("a\"b'c"), "a&quot;b&#39;c");
    }

    #[test]
    fn test_escape_markdown_brackets_and_backslash() {
        assert_eq!(escape_markdown("[not a link]"), r"\[not a link\]");
        assert_eq!(escape_markdown(r"path\to"), r"path\\to");
        assert_eq!(escape_markdown("`tick`"), r"\`tick\`");
    }

    #[test]
    fn test_escape_markdown_leading_hash_only() {
        assert_eq!(escape_markdown("# not a heading"), r"\# not a heading");
        assert_eq!(escape_markdown("issue #4"), "issue #4");
    }

    #[test]
    fn test_escape_markdown_plain_text_untouched() {
        assert_eq!(escape_markdown("plain text"), "plain text");
        assert_eq!(escape_markdown(""), "");
    }

    #[test]
    fn test_escape_alt_text_closing_bracket() {
        assert_eq!(escape_alt_text("a]b"), r"a\]b");
        assert_eq!(escape_alt_text("[x]"), r"\[x\]");
        assert_eq!(escape_alt_text("a_b*c"), "a_b*c");
    }

    #[test]
    fn test_escape_link_destination() {
        assert_eq!(
            escape_link_destination("https://x.test/a b(1)"),
            "https://x.test/a%20b%281%29"
        );
    }

    #[test]
    fn test_escape_table_cell() {
        assert_eq!(escape_table_cell("a | b\n c"), r"a \| b c");
    }
}
