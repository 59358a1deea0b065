//! Result types for extraction output.
//!
//! `ExtractedContent` is the immutable record returned for one side of a
//! chat turn: the Markdown-flavored text, the sanitized markup fragment, and
//! the content-type presence flags.

use serde::{Deserialize, Serialize};

/// Presence flags for the content types found during one extraction call.
///
/// Flags are monotonic: the only mutator is [`ContentFlags::mark`], which
/// can set a flag but never clear it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentFlags {
    images: bool,
    formulas: bool,
    tables: bool,
    code: bool,
}

/// A content type tracked by [`ContentFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Formula,
    Table,
    Code,
}

impl ContentFlags {
    /// Record that content of `kind` was seen.
    pub fn mark(&mut self, kind: ContentKind) {
        match kind {
            ContentKind::Image => self.images = true,
            ContentKind::Formula => self.formulas = true,
            ContentKind::Table => self.tables = true,
            ContentKind::Code => self.code = true,
        }
    }

    /// Fold another set of flags into this one.
    pub fn merge(&mut self, other: ContentFlags) {
        self.images |= other.images;
        self.formulas |= other.formulas;
        self.tables |= other.tables;
        self.code |= other.code;
    }

    #[must_use]
    pub fn has(&self, kind: ContentKind) -> bool {
        match kind {
            ContentKind::Image => self.images,
            ContentKind::Formula => self.formulas,
            ContentKind::Table => self.tables,
            ContentKind::Code => self.code,
        }
    }
}

/// Content extracted from one side of a chat turn.
///
/// `text` and `markup` describe the same content in the same order; `text`
/// is CommonMark-flavored and whitespace-normalized, `markup` is an HTML
/// fragment built only from escaped text and cleaned copies of the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractedContent {
    /// Markdown-flavored plain text.
    pub text: String,

    /// Sanitized markup fragment suitable for embedding in a print view.
    pub markup: String,

    /// At least one image was emitted.
    pub has_images: bool,

    /// At least one math formula was emitted.
    pub has_formulas: bool,

    /// At least one table was emitted.
    pub has_tables: bool,

    /// At least one code block was emitted.
    pub has_code: bool,
}

impl ExtractedContent {
    #[must_use]
    pub fn new(text: String, markup: String, flags: ContentFlags) -> Self {
        Self {
            text,
            markup,
            has_images: flags.has(ContentKind::Image),
            has_formulas: flags.has(ContentKind::Formula),
            has_tables: flags.has(ContentKind::Table),
            has_code: flags.has(ContentKind::Code),
        }
    }

    /// True when neither output carries any content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.markup.is_empty()
    }
}

/// Which side of the conversation a turn belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One extracted turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: ExtractedContent,
}
