//! Injected diagnostics sink.
//!
//! The sanitizer never writes to process streams directly. Every rejected
//! value is reported through the [`Diagnostics`] trait, so the core stays
//! testable without capturing stdout/stderr and callers decide where the
//! records go.

/// Sink for structured diagnostic records emitted by the sanitizer.
///
/// Records are observability-only: implementations must not influence the
/// verdict of any check.
pub trait Diagnostics: Send + Sync {
    /// Record a single event with its key/value fields.
    fn record(&self, event: &str, fields: &[(&str, &str)]);
}

/// Forwards diagnostic records to the `tracing` subscriber at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, event: &str, fields: &[(&str, &str)]) {
        tracing::warn!(event = %event, fields = ?fields, "sanitizer diagnostic");
    }
}
