//! Categorized operational events
//!
//! The pool reports its notable events (session drops, failed opens,
//! acquire timeouts) through a small sink trait so embedders can route
//! them into whatever logging setup they run.

/// Sink for the pool's operational events.
///
/// Implementations must be callable from the pool's internal threads as
/// well as any caller thread.
pub trait EventSink: Send + Sync {
    /// Routine lifecycle events.
    fn info(&self, message: &str);

    /// Recoverable trouble: a dropped session, a failed open that will
    /// be retried.
    fn warn(&self, message: &str);

    /// Failures the pool could not recover from on its own.
    fn error(&self, message: &str);
}

/// Default sink, forwards each category to `tracing` at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
