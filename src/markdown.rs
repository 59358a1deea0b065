//! Markdown building blocks.
//!
//! GFM pipe tables from a row model, code fences and inline code spans that
//! survive backticks in their content, and the final whitespace
//! normalization of the text stream.

use crate::escape::escape_table_cell;
use crate::patterns::{MULTIPLE_NEWLINES, TRAILING_LINE_WHITESPACE};

/// Column alignment of a GFM table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    #[must_use]
    pub fn from_keyword(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::None,
        }
    }
}

/// Two-dimensional text model of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableModel {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub alignments: Vec<Alignment>,
}

impl TableModel {
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.column_count() == 0
    }
}

/// Render a table model as a GitHub Flavored Markdown pipe table.
///
/// # Example Output
///
/// ```text
/// | Header A | Header B |
/// | --- | --- |
/// | Cell 1 | Cell 2 |
/// ```
#[must_use]
pub fn render_table(model: &TableModel) -> String {
    let col_count = model.column_count();
    if col_count == 0 {
        return String::new();
    }

    let mut output = String::new();
    push_row(&mut output, &model.header, col_count);

    output.push('|');
    for col_idx in 0..col_count {
        let align = model.alignments.get(col_idx).copied().unwrap_or_default();
        output.push(' ');
        output.push_str(format_separator(align));
        output.push_str(" |");
    }
    output.push('\n');

    for row in &model.rows {
        push_row(&mut output, row, col_count);
    }

    output
}

fn push_row(output: &mut String, row: &[String], col_count: usize) {
    output.push('|');
    for col_idx in 0..col_count {
        output.push(' ');
        if let Some(cell) = row.get(col_idx) {
            output.push_str(&escape_table_cell(cell));
        }
        output.push_str(" |");
    }
    output.push('\n');
}

fn format_separator(align: Alignment) -> &'static str {
    match align {
        Alignment::None => "---",
        Alignment::Left => ":---",
        Alignment::Center => ":---:",
        Alignment::Right => "---:",
    }
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Fenced code block, with a fence longer than any backtick run in `code`.
#[must_use]
pub fn fenced_code(code: &str, language: Option<&str>) -> String {
    let fence = "`".repeat((longest_backtick_run(code) + 1).max(3));
    let body = code.trim_end_matches('\n');
    format!("{fence}{}\n{body}\n{fence}\n", language.unwrap_or(""))
}

/// Inline code span that tolerates backticks inside `code`.
#[must_use]
pub fn inline_code(code: &str) -> String {
    let ticks = "`".repeat(longest_backtick_run(code) + 1);
    if code.starts_with('`') || code.ends_with('`') {
        format!("{ticks} {code} {ticks}")
    } else {
        format!("{ticks}{code}{ticks}")
    }
}

/// Final whitespace normalization of the text stream.
///
/// Strips trailing spaces on each line, collapses three or more newlines
/// to exactly two and trims the ends.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    let stripped = TRAILING_LINE_WHITESPACE.replace_all(&unified, "\n");
    MULTIPLE_NEWLINES
        .replace_all(&stripped, "\n\n")
        .trim()
        .to_string()
}

/// Prefix every non-empty line with `prefix`.
#[must_use]
pub fn indent_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("{prefix}{line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix every line with a blockquote marker.
#[must_use]
pub fn quote_lines(text: &str) -> String {
    text.lines()
        .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_simple_table() {
        let model = TableModel {
            header: cells(&["A", "B"]),
            rows: vec![cells(&["1", "2"])],
            alignments: Vec::new(),
        };
        assert_eq!(render_table(&model), "| A | B |\n| --- | --- |\n| 1 | 2 |\n");
    }

    #[test]
    fn test_table_alignment_separators() {
        let model = TableModel {
            header: cells(&["L", "C", "R"]),
            rows: Vec::new(),
            alignments: vec![Alignment::Left, Alignment::Center, Alignment::Right],
        };
        assert!(render_table(&model).contains("| :--- | :---: | ---: |"));
    }

    #[test]
    fn test_table_uneven_rows_are_padded() {
        let model = TableModel {
            header: cells(&["A", "B", "C"]),
            rows: vec![cells(&["1"])],
            alignments: Vec::new(),
        };
        assert!(render_table(&model).ends_with("| 1 |  |  |\n"));
    }

    #[test]
    fn test_table_cells_escape_pipes() {
        let model = TableModel {
            header: cells(&["a|b"]),
            rows: Vec::new(),
            alignments: Vec::new(),
        };
        assert!(render_table(&model).starts_with(r"| a\|b |"));
    }

    #[test]
    fn test_empty_table() {
        assert!(render_table(&TableModel::default()).is_empty());
    }

    #[test]
    fn test_fenced_code_with_language() {
        assert_eq!(fenced_code("x = 1\n", Some("python")), "```python\nx = 1\n```\n");
    }

    #[test]
    fn test_fence_grows_past_backticks_in_code() {
        assert_eq!(fenced_code("```\ninner\n```", None), "````\n```\ninner\n```\n````\n");
    }

    #[test]
    fn test_inline_code_with_backtick() {
        assert_eq!(inline_code("a`b"), "``a`b``");
        assert_eq!(inline_code("`x"), "`` `x ``");
        assert_eq!(inline_code("plain"), "`plain`");
    }

    #[test]
    fn test_normalize_collapses_newlines() {
        assert_eq!(normalize_text("\n\na  \n\n\n\nb\n\n"), "a\n\nb");
    }

    #[test]
    fn test_indent_lines_leaves_blank_lines_bare() {
        assert_eq!(indent_lines("a\n\nb", "   "), "   a\n\n   b");
    }

    #[test]
    fn test_quote_lines() {
        assert_eq!(quote_lines("a\n\nb"), "> a\n>\n> b");
    }
}
