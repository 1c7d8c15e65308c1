//! Verdict aggregation across request sources.

use std::sync::Arc;

use axum::http::Method;

use crate::observability::metrics;
use crate::sanitize::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::sanitize::policy::{CharacterPolicy, Verdict};
use crate::sanitize::sources::{self, Source};
use crate::sanitize::view::RequestView;

/// Ordered list of checks run on every request. Each source is invoked
/// exactly once; the body check is appended separately because it is
/// method-conditional.
const SOURCE_CHECKS: [(Source, CharacterPolicy); 4] = [
    (Source::Headers, CharacterPolicy::Soft),
    (Source::Cookies, CharacterPolicy::Strict),
    (Source::Query, CharacterPolicy::Strict),
    (Source::Params, CharacterPolicy::Strict),
];

/// Single entry point for request validation.
///
/// Evaluates every source of a [`RequestView`] and aggregates the per-source
/// verdicts into the accept/reject decision. Holds no per-request state, so
/// one gate serves concurrent requests without locking.
pub struct RequestGate {
    max_body_depth: usize,
    diagnostics: Arc<dyn Diagnostics>,
}

impl RequestGate {
    /// Create a gate that reports diagnostics through `tracing`.
    pub fn new(max_body_depth: usize) -> Self {
        Self::with_diagnostics(max_body_depth, Arc::new(TracingDiagnostics))
    }

    /// Create a gate with an injected diagnostics sink.
    pub fn with_diagnostics(max_body_depth: usize, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            max_body_depth,
            diagnostics,
        }
    }

    /// Evaluate a request view.
    ///
    /// Every check runs to completion before the aggregate is computed;
    /// a failing source does not stop the remaining sources from being
    /// checked. The body is only inspected for non-GET methods.
    ///
    /// `client` identifies the caller in the rejection diagnostic.
    pub fn evaluate(&self, view: &RequestView, method: &Method, client: Option<&str>) -> Verdict {
        let mut verdicts = Vec::with_capacity(SOURCE_CHECKS.len() + 1);

        for (source, policy) in SOURCE_CHECKS {
            verdicts.push(self.check(source, policy, view));
        }
        if *method != Method::GET {
            verdicts.push(self.check(Source::Body, CharacterPolicy::Strict, view));
        }

        if verdicts.contains(&Verdict::Invalid) {
            self.diagnostics
                .record("request_rejected", &[("client", client.unwrap_or("unknown"))]);
            Verdict::Invalid
        } else {
            Verdict::Valid
        }
    }

    fn check(&self, source: Source, policy: CharacterPolicy, view: &RequestView) -> Verdict {
        let verdict = sources::check(
            source,
            policy,
            view,
            self.max_body_depth,
            self.diagnostics.as_ref(),
        );
        if verdict.is_invalid() {
            metrics::record_rejected(source.name());
        }
        verdict
    }
}
