//! # turn-extract
//!
//! Extract chat turns from a rendered conversation page into two parallel
//! forms: sanitized markup for printing and Markdown text for export.
//!
//! Assistant turns are walked structurally (images, formulas, code blocks,
//! tables, lists, headings, paragraphs) from a canonical content root, with
//! UI chrome such as buttons and citation chips dropped from both outputs.
//! User turns carry their query text and uploaded images.
//!
//! ## Quick Start
//!
//! ```rust
//! use turn_extract::extract_assistant_html;
//!
//! let html = r#"<model-response><message-content>
//!   <p>Use <code>cargo</code>:</p>
//!   <button>Copy</button>
//! </message-content></model-response>"#;
//!
//! let content = extract_assistant_html(html);
//! assert_eq!(content.text, "Use `cargo`:");
//! assert!(!content.has_code);
//! ```
//!
//! ## Inputs
//!
//! Extraction is generic over [`dom::ContentNode`], implemented for parsed
//! HTML nodes ([`dom::NodeRef`]) and for JSON snapshots of a live page
//! ([`snapshot::SnapshotNode`]), which can carry attached shadow trees.

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// Content node abstraction and DOM helpers.
pub mod dom;

/// Serde tree of a live page, including shadow roots.
pub mod snapshot;

/// Marker vocabulary of the chat application's markup.
pub mod markers;

/// Artifact filter and canonical root locator.
pub mod selector;

/// Classification, leaf converters, walker and entry points.
pub mod extractor;

/// Cleaned and verbatim markup serialization.
pub mod serialize;

/// Escaping for markup and Markdown.
pub mod escape;

/// Markdown building blocks (tables, code fences, normalization).
pub mod markdown;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Injected diagnostics.
pub mod trace;

// Public API - re-exports
pub use error::{Error, Result};
pub use extract::Extractor;
pub use options::Options;
pub use result::{ContentFlags, ContentKind, ExtractedContent, Role, Turn};
pub use snapshot::SnapshotNode;
pub use trace::{LogTracer, NoopTracer, Tracer};

use dom::ContentNode;

/// Extracts a user turn from its outer container with default options.
#[must_use]
pub fn extract_user_content<N: ContentNode>(outer: &N) -> ExtractedContent {
    Extractor::default().extract_user(outer)
}

/// Extracts an assistant turn from its outer container with default options.
///
/// # Example
///
/// ```rust
/// use turn_extract::{extract_assistant_content, SnapshotNode};
///
/// let turn = SnapshotNode::from_json(r#"{
///   "tag": "message-content",
///   "children": [{"tag": "h2", "children": [{"text": "Done"}]}]
/// }"#)?;
/// let content = extract_assistant_content(&&turn);
/// assert_eq!(content.text, "## Done");
/// # Ok::<(), turn_extract::Error>(())
/// ```
#[must_use]
pub fn extract_assistant_content<N: ContentNode>(outer: &N) -> ExtractedContent {
    Extractor::default().extract_assistant(outer)
}

/// Extracts every turn under `root` with default options.
#[must_use]
pub fn extract_conversation<N: ContentNode>(root: &N) -> Vec<Turn> {
    Extractor::default().extract_conversation(root)
}

/// Parses `html` and extracts its body as one user turn.
#[must_use]
pub fn extract_user_html(html: &str) -> ExtractedContent {
    let doc = dom::parse(html);
    extract_user_content(&dom::body_or_root(&doc))
}

/// Parses `html` and extracts its body as one assistant turn.
#[must_use]
pub fn extract_assistant_html(html: &str) -> ExtractedContent {
    let doc = dom::parse(html);
    extract_assistant_content(&dom::body_or_root(&doc))
}

/// Parses `html` and extracts every turn in it.
///
/// # Example
///
/// ```rust
/// use turn_extract::{extract_conversation_html, Role};
///
/// let turns = extract_conversation_html(
///     r#"<user-query><p class="query-text-line">2+2?</p></user-query>
///        <model-response><message-content><p>4</p></message-content></model-response>"#,
/// );
/// assert_eq!(turns.len(), 2);
/// assert_eq!(turns[0].role, Role::User);
/// assert_eq!(turns[1].content.text, "4");
/// ```
#[must_use]
pub fn extract_conversation_html(html: &str) -> Vec<Turn> {
    let doc = dom::parse(html);
    extract_conversation(&dom::body_or_root(&doc))
}

/// Extracts an assistant turn from HTML bytes with automatic encoding detection.
///
/// # Character Encoding
///
/// The function detects encoding from:
/// - `<meta charset="...">`
/// - `<meta http-equiv="Content-Type" content="...; charset=...">`
/// - Defaults to UTF-8 if no declaration found
///
/// Invalid characters are replaced with � (Unicode replacement character)
/// rather than causing errors.
///
/// # Example
///
/// ```rust
/// use turn_extract::extract_assistant_bytes;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><p>Caf\xE9</p></body></html>";
/// let content = extract_assistant_bytes(html);
/// assert_eq!(content.text, "Café");
/// ```
#[must_use]
pub fn extract_assistant_bytes(html: &[u8]) -> ExtractedContent {
    extract_assistant_html(&encoding::transcode_to_utf8(html))
}

/// Extracts a user turn from HTML bytes with automatic encoding detection.
#[must_use]
pub fn extract_user_bytes(html: &[u8]) -> ExtractedContent {
    extract_user_html(&encoding::transcode_to_utf8(html))
}

/// Extracts every turn from HTML bytes with automatic encoding detection.
#[must_use]
pub fn extract_conversation_bytes(html: &[u8]) -> Vec<Turn> {
    extract_conversation_html(&encoding::transcode_to_utf8(html))
}
