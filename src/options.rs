//! Configuration options for turn extraction.
//!
//! The `Options` struct controls labels, image attribution output and the
//! recursion guard. Use `Default::default()` for standard settings.

use url::Url;

use crate::Result;

/// Configuration options for turn extraction.
///
/// All fields are public for easy configuration.
///
/// # Example
///
/// ```rust
/// use turn_extract::Options;
///
/// let options = Options {
///     include_image_attribution: false,
///     ..Options::default()
/// };
/// assert_eq!(options.image_fallback_alt, "Image");
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Alt text used when an image has none.
    ///
    /// Default: `"Image"`
    pub image_fallback_alt: String,

    /// Alt text used for images uploaded with a user query.
    ///
    /// Default: `"Uploaded image"`
    pub uploaded_image_alt: String,

    /// Append an italic `*Source: [label](url)*` line after search-result images.
    ///
    /// Default: `true`
    pub include_image_attribution: bool,

    /// Absolute URL that relative image sources are resolved against.
    ///
    /// When `None`, relative sources are emitted unchanged.
    ///
    /// Default: `None`
    pub base_url: Option<String>,

    /// Maximum container nesting the walker descends into.
    ///
    /// Deeper subtrees are emitted as their flattened text instead of being
    /// walked, so adversarially deep trees cannot exhaust the stack.
    ///
    /// Default: `256`
    pub max_depth: usize,
}

impl Options {
    /// Parse `base_url`, if set.
    pub fn parsed_base_url(&self) -> Result<Option<Url>> {
        match self.base_url.as_deref() {
            Some(raw) => Ok(Some(Url::parse(raw)?)),
            None => Ok(None),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            image_fallback_alt: "Image".to_string(),
            uploaded_image_alt: "Uploaded image".to_string(),
            include_image_attribution: true,
            base_url: None,
            max_depth: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();

        assert_eq!(opts.image_fallback_alt, "Image");
        assert_eq!(opts.uploaded_image_alt, "Uploaded image");
        assert!(opts.include_image_attribution);
        assert!(opts.base_url.is_none());
        assert_eq!(opts.max_depth, 256);
    }

    #[test]
    fn test_parsed_base_url() {
        let opts = Options {
            base_url: Some("https://example.com/chat/".to_string()),
            ..Options::default()
        };
        let parsed = opts.parsed_base_url();
        assert!(matches!(parsed, Ok(Some(ref url)) if url.host_str() == Some("example.com")));
    }

    #[test]
    fn test_relative_base_url_is_rejected() {
        let opts = Options {
            base_url: Some("/relative/only".to_string()),
            ..Options::default()
        };
        assert!(opts.parsed_base_url().is_err());
    }
}
