//! The configured extractor.
//!
//! An [`Extractor`] owns the options, the parsed base URL and the injected
//! tracer, and builds the per-call [`Context`] the pipeline runs with.

use std::sync::Arc;

use url::Url;

use crate::dom::ContentNode;
use crate::extractor::{self, Context};
use crate::options::Options;
use crate::result::{ExtractedContent, Turn};
use crate::trace::{NoopTracer, Tracer};
use crate::Result;

/// Turn extractor with fixed options and tracer.
///
/// Cheap to clone; one instance can serve any number of calls.
///
/// # Example
///
/// ```rust
/// use turn_extract::{dom, Extractor, Options};
///
/// let doc = dom::parse("<message-content><p>Hi <b>there</b></p></message-content>");
/// let extractor = Extractor::new(Options::default());
/// let content = extractor.extract_assistant(&dom::body_or_root(&doc));
/// assert_eq!(content.text, "Hi **there**");
/// ```
#[derive(Clone)]
pub struct Extractor {
    options: Options,
    base_url: Option<Url>,
    tracer: Arc<dyn Tracer>,
}

impl Extractor {
    /// Build an extractor. An unparseable `base_url` is ignored.
    #[must_use]
    pub fn new(options: Options) -> Self {
        let base_url = options.parsed_base_url().ok().flatten();
        Self {
            options,
            base_url,
            tracer: Arc::new(NoopTracer),
        }
    }

    /// Build an extractor, rejecting an unparseable `base_url`.
    pub fn try_new(options: Options) -> Result<Self> {
        let base_url = options.parsed_base_url()?;
        Ok(Self {
            options,
            base_url,
            tracer: Arc::new(NoopTracer),
        })
    }

    /// Replace the tracer that receives walk diagnostics.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn context(&self) -> Context<'_> {
        Context {
            options: &self.options,
            base_url: self.base_url.as_ref(),
            tracer: self.tracer.as_ref(),
        }
    }

    /// Extract a user turn from its outer container.
    #[must_use]
    pub fn extract_user<N: ContentNode>(&self, outer: &N) -> ExtractedContent {
        extractor::extract_user(outer, &self.context())
    }

    /// Extract an assistant turn from its outer container.
    #[must_use]
    pub fn extract_assistant<N: ContentNode>(&self, outer: &N) -> ExtractedContent {
        extractor::extract_assistant(outer, &self.context())
    }

    /// Extract every turn under `root`, in document order.
    #[must_use]
    pub fn extract_conversation<N: ContentNode>(&self, root: &N) -> Vec<Turn> {
        extractor::extract_conversation(root, &self.context())
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("options", &self.options)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body_or_root, parse};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Tracer for Recorder {
        fn trace(&self, args: std::fmt::Arguments<'_>) {
            if let Ok(mut events) = self.0.lock() {
                events.push(args.to_string());
            }
        }
    }

    #[test]
    fn test_try_new_rejects_relative_base() {
        let options = Options {
            base_url: Some("not a url".to_string()),
            ..Options::default()
        };
        assert!(Extractor::try_new(options.clone()).is_err());
        assert!(Extractor::new(options).base_url.is_none());
    }

    #[test]
    fn test_base_url_resolves_image_sources() {
        let options = Options {
            base_url: Some("https://chat.example.com/app/".to_string()),
            ..Options::default()
        };
        let extractor = Extractor::try_new(options);
        assert!(extractor.is_ok());
        let doc = parse(r#"<message-content><img src="/img/cat.png" alt="cat"></message-content>"#);
        let text = extractor
            .map(|e| e.extract_assistant(&body_or_root(&doc)).text)
            .unwrap_or_default();
        assert_eq!(text, "![cat](https://chat.example.com/img/cat.png)");
    }

    #[test]
    fn test_tracer_receives_root_selection() {
        let recorder = Arc::new(Recorder::default());
        let extractor = Extractor::default().with_tracer(recorder.clone());
        let doc = parse("<message-content><p>x</p></message-content>");
        let _ = extractor.extract_assistant(&body_or_root(&doc));
        let events = recorder.0.lock().map(|e| e.clone()).unwrap_or_default();
        assert!(events.iter().any(|e| e.contains("MessageBody")));
    }
}
