//! Character encoding detection and transcoding.
//!
//! Saved conversation pages arrive as bytes. The charset comes from a byte
//! order mark, then from a meta declaration in the head, and defaults to
//! UTF-8; decoding is always lossy so extraction never fails on bad input.

use encoding_rs::{Encoding, UTF_8};

use crate::patterns::{META_CHARSET, META_CONTENT_TYPE};

/// How many leading bytes are searched for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Detect the character encoding of an HTML document.
///
/// Looks, in order, at:
/// 1. a byte order mark
/// 2. `<meta charset="...">`
/// 3. `<meta http-equiv="Content-Type" content="...; charset=...">`
///
/// and defaults to UTF-8. Unknown labels are ignored.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);
    [&*META_CHARSET, &*META_CONTENT_TYPE]
        .iter()
        .filter_map(|pattern| pattern.captures(&head))
        .filter_map(|caps| caps.get(1))
        .find_map(|label| Encoding::for_label(label.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode HTML bytes into a UTF-8 string.
///
/// Invalid sequences become U+FFFD and a leading byte order mark is dropped.
///
/// # Examples
///
/// ```
/// use turn_extract::encoding::transcode_to_utf8;
///
/// let html = b"<html><body>Hello, World!</body></html>";
/// assert_eq!(transcode_to_utf8(html), "<html><body>Hello, World!</body></html>");
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let (decoded, _had_errors) = detect_encoding(html).decode_with_bom_removal(html);
    decoded.into_owned()
}
