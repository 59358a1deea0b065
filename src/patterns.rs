//! Compiled regex patterns used during extraction.
//!
//! All patterns are compiled once on first use with `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Text Normalization Patterns
// =============================================================================

/// Matches three or more consecutive newlines.
pub static MULTIPLE_NEWLINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("MULTIPLE_NEWLINES regex")
});

/// Matches trailing horizontal whitespace before a newline.
pub static TRAILING_LINE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]+\n").expect("TRAILING_LINE_WHITESPACE regex")
});

/// Matches runs of whitespace for inline collapsing.
pub static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_RUN regex")
});

// =============================================================================
// Attribute Patterns
// =============================================================================

/// Captures the language from a `language-X` / `lang-X` class token.
pub static LANGUAGE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:language|lang)-([A-Za-z0-9_+#.\-]+)").expect("LANGUAGE_CLASS regex")
});

/// Captures the alignment from an inline `text-align` style.
pub static TEXT_ALIGN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)text-align\s*:\s*(left|center|right)").expect("TEXT_ALIGN_STYLE regex")
});

// =============================================================================
// Declarative Shadow Root Patterns
// =============================================================================

/// Matches an opening `<template` tag name.
pub static TEMPLATE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<template(\s|>|/)").expect("TEMPLATE_OPEN regex")
});

/// Matches a closing `</template>` tag.
pub static TEMPLATE_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</template\s*>").expect("TEMPLATE_CLOSE regex")
});

// =============================================================================
// Charset Declaration Patterns
// =============================================================================

/// Captures the label of a `<meta charset="...">` declaration.
pub static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("META_CHARSET regex")
});

/// Captures the charset of a `<meta http-equiv="Content-Type" content="...; charset=...">`.
pub static META_CONTENT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>;]+)"#,
    )
    .expect("META_CONTENT_TYPE regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_newlines_matches_three_or_more() {
        assert!(MULTIPLE_NEWLINES.is_match("a\n\n\nb"));
        assert!(!MULTIPLE_NEWLINES.is_match("a\n\nb"));
    }

    #[test]
    fn language_class_captures_language() {
        let caps = LANGUAGE_CLASS.captures("hljs language-rust");
        assert_eq!(caps.and_then(|c| c.get(1)).map(|m| m.as_str()), Some("rust"));
        assert!(!LANGUAGE_CLASS.is_match("mylanguage-rust"));
    }

    #[test]
    fn template_open_does_not_match_longer_tags() {
        assert!(TEMPLATE_OPEN.is_match("<template shadowrootmode=\"open\">"));
        assert!(TEMPLATE_OPEN.is_match("<TEMPLATE>"));
        assert!(!TEMPLATE_OPEN.is_match("<templates>"));
    }
}
