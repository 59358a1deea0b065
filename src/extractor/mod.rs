//! Turn extraction pipeline.
//!
//! # Module Structure
//!
//! - `state`: the per-call `FragmentAccumulator`
//! - `classify`: the single node classification function
//! - `inline`: inline runs (text, emphasis, inline code, inline images and math)
//! - `handlers`: leaf converters (image, math, code block, table, rule,
//!   paragraph, heading, list)
//! - `walker`: the shadow-aware recursive walk
//! - `pipeline`: aggregation and the user / assistant / conversation entry points

use url::Url;

use crate::trace::Tracer;
use crate::Options;

pub mod classify;
pub mod handlers;
pub mod inline;
pub mod pipeline;
pub mod state;
pub mod walker;

pub use classify::{classify, NodeClass};
pub use pipeline::{extract_assistant, extract_conversation, extract_user};
pub use state::{Fragment, FragmentAccumulator};

/// Read-only context shared by every converter during one call.
pub struct Context<'a> {
    pub options: &'a Options,
    pub base_url: Option<&'a Url>,
    pub tracer: &'a dyn Tracer,
}

impl Context<'_> {
    /// Emit a diagnostic event to the injected tracer.
    pub fn trace(&self, args: std::fmt::Arguments<'_>) {
        self.tracer.trace(args);
    }
}
