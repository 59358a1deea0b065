//! Injected diagnostics for the extraction walk.
//!
//! Extraction never consults a process-wide debug flag. Callers hand an
//! [`Tracer`] to the [`Extractor`](crate::Extractor); the default discards
//! everything.

use std::fmt;

/// Receives diagnostic events from the extraction walk.
pub trait Tracer: Send + Sync {
    fn trace(&self, args: fmt::Arguments<'_>);
}

/// Discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline]
    fn trace(&self, _args: fmt::Arguments<'_>) {}
}

/// Forwards events to the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace(&self, args: fmt::Arguments<'_>) {
        log::debug!(target: "turn_extract", "{args}");
    }
}
