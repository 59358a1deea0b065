//! Per-call extraction state.
//!
//! `FragmentAccumulator` is the only mutable state that crosses a recursion
//! boundary: two ordered fragment streams plus the presence flags. It is
//! created fresh for each top-level call and consumed into the result.

use crate::result::{ContentFlags, ContentKind};

/// A `(markup, text)` pair produced by one leaf converter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub markup: String,
    pub text: String,
}

impl Fragment {
    #[must_use]
    pub fn new(markup: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.text.is_empty()
    }
}

/// Ordered markup and text streams plus content flags for one call.
#[derive(Debug, Default)]
pub struct FragmentAccumulator {
    markup: Vec<String>,
    text: Vec<String>,
    flags: ContentFlags,
}

impl FragmentAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fragment to both streams.
    ///
    /// Empty halves are not pushed, so a fragment with markup but no text
    /// still lands in the markup stream, and an empty fragment leaves no trace.
    pub fn push(&mut self, fragment: Fragment) {
        if !fragment.markup.is_empty() {
            self.markup.push(fragment.markup);
        }
        if !fragment.text.is_empty() {
            self.text.push(fragment.text);
        }
    }

    pub fn mark(&mut self, kind: ContentKind) {
        self.flags.mark(kind);
    }

    pub fn flags_mut(&mut self) -> &mut ContentFlags {
        &mut self.flags
    }

    #[must_use]
    pub fn flags(&self) -> ContentFlags {
        self.flags
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.text.is_empty()
    }

    /// Markup fragments joined with newlines.
    #[must_use]
    pub fn joined_markup(&self) -> String {
        self.markup.join("\n")
    }

    /// Text fragments joined with no separator; each converter owns its newlines.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.text.concat()
    }

    /// Consume into `(markup, text, flags)`.
    #[must_use]
    pub fn finish(self) -> (String, String, ContentFlags) {
        let markup = self.joined_markup();
        let text = self.joined_text();
        (markup, text, self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streams_keep_push_order() {
        let mut acc = FragmentAccumulator::new();
        acc.push(Fragment::new("<p>a</p>", "a\n\n"));
        acc.push(Fragment::new("<p>b</p>", "b\n\n"));
        let (markup, text, _) = acc.finish();
        assert_eq!(markup, "<p>a</p>\n<p>b</p>");
        assert_eq!(text, "a\n\nb\n\n");
    }

    #[test]
    fn test_empty_fragment_leaves_no_trace() {
        let mut acc = FragmentAccumulator::new();
        acc.push(Fragment::default());
        assert!(acc.is_empty());
    }

    #[test]
    fn test_markup_only_fragment_is_kept() {
        let mut acc = FragmentAccumulator::new();
        acc.push(Fragment::new("<hr>", ""));
        assert_eq!(acc.joined_markup(), "<hr>");
        assert_eq!(acc.joined_text(), "");
    }

    #[test]
    fn test_flags_are_monotonic() {
        let mut acc = FragmentAccumulator::new();
        acc.mark(ContentKind::Image);
        acc.flags_mut().merge(ContentFlags::default());
        assert!(acc.flags().has(ContentKind::Image));
    }
}
