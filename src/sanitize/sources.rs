//! Per-source checks over a request view.

use serde_json::Value;

use crate::sanitize::diagnostics::Diagnostics;
use crate::sanitize::policy::{CharacterPolicy, Verdict};
use crate::sanitize::view::RequestView;
use crate::sanitize::walker;

/// A request location the gate inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Headers,
    Cookies,
    Query,
    Params,
    Body,
}

impl Source {
    /// Label used in diagnostics and metrics.
    pub fn name(self) -> &'static str {
        match self {
            Source::Headers => "headers",
            Source::Cookies => "cookies",
            Source::Query => "query",
            Source::Params => "params",
            Source::Body => "body",
        }
    }
}

/// Check one source of the view under the given policy.
///
/// Each source fails fast on its first offending value but never scans
/// beyond its own sub-structure. Absent sub-structures are `Valid`.
pub fn check(
    source: Source,
    policy: CharacterPolicy,
    view: &RequestView,
    max_body_depth: usize,
    diagnostics: &dyn Diagnostics,
) -> Verdict {
    let verdict = match source {
        Source::Headers => check_headers(view, policy, diagnostics),
        Source::Cookies => check_cookies(view, policy, diagnostics),
        Source::Query => check_query(view, policy, diagnostics),
        Source::Params => check_params(view, policy, diagnostics),
        Source::Body => check_body(view, max_body_depth, diagnostics),
    };

    if verdict.is_invalid() {
        diagnostics.record("source_rejected", &[("source", source.name())]);
    }
    verdict
}

fn check_headers(
    view: &RequestView,
    policy: CharacterPolicy,
    diagnostics: &dyn Diagnostics,
) -> Verdict {
    for value in view.headers.values() {
        if value.is_empty() {
            continue;
        }
        if policy.classify_str(value, diagnostics).is_invalid() {
            return Verdict::Invalid;
        }
    }
    Verdict::Valid
}

fn check_cookies(
    view: &RequestView,
    policy: CharacterPolicy,
    diagnostics: &dyn Diagnostics,
) -> Verdict {
    let Some(cookies) = &view.cookies else {
        return Verdict::Valid;
    };
    for value in cookies.values() {
        if value.is_empty() {
            continue;
        }
        if policy.classify_str(value, diagnostics).is_invalid() {
            return Verdict::Invalid;
        }
    }
    Verdict::Valid
}

fn check_query(
    view: &RequestView,
    policy: CharacterPolicy,
    diagnostics: &dyn Diagnostics,
) -> Verdict {
    let Some(query) = &view.query else {
        return Verdict::Valid;
    };
    for value in query.values() {
        match value {
            // Repeated keys arrive as arrays; each element is checked
            // independently.
            Value::Array(items) => {
                for item in items {
                    if policy.classify(item, diagnostics).is_invalid() {
                        return Verdict::Invalid;
                    }
                }
            }
            other => {
                if policy.classify(other, diagnostics).is_invalid() {
                    return Verdict::Invalid;
                }
            }
        }
    }
    Verdict::Valid
}

fn check_params(
    view: &RequestView,
    policy: CharacterPolicy,
    diagnostics: &dyn Diagnostics,
) -> Verdict {
    let Some(params) = &view.params else {
        return Verdict::Valid;
    };
    for value in params.values() {
        // Non-string param values are skipped, not rejected.
        if policy.classify(value, diagnostics).is_invalid() {
            return Verdict::Invalid;
        }
    }
    Verdict::Valid
}

fn check_body(view: &RequestView, max_depth: usize, diagnostics: &dyn Diagnostics) -> Verdict {
    match &view.body {
        Some(body @ Value::Object(_)) => walker::walk(body, max_depth, diagnostics),
        // Absent, array-typed, or scalar bodies carry nothing to check.
        _ => Verdict::Valid,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::{json, Map, Value};

    use super::*;
    use crate::sanitize::diagnostics::test_support::RecordingDiagnostics;

    const DEPTH: usize = 64;

    fn string_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn json_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_absent_sources_are_valid() {
        let sink = RecordingDiagnostics::default();
        let view = RequestView::default();

        for source in [Source::Cookies, Source::Query, Source::Params, Source::Body] {
            assert_eq!(
                check(source, CharacterPolicy::Strict, &view, DEPTH, &sink),
                Verdict::Valid
            );
        }
    }

    #[test]
    fn test_headers_checked_under_given_policy() {
        let sink = RecordingDiagnostics::default();
        let view = RequestView {
            headers: string_map(&[("user-agent", "Mozilla/5.0 (X11; Linux)")]),
            ..Default::default()
        };

        assert_eq!(
            check(Source::Headers, CharacterPolicy::Soft, &view, DEPTH, &sink),
            Verdict::Valid
        );
        assert_eq!(
            check(Source::Headers, CharacterPolicy::Strict, &view, DEPTH, &sink),
            Verdict::Invalid
        );
    }

    #[test]
    fn test_empty_header_values_are_skipped() {
        let sink = RecordingDiagnostics::default();
        let view = RequestView {
            headers: string_map(&[("x-empty", ""), ("x-ok", "fine")]),
            ..Default::default()
        };
        assert_eq!(
            check(Source::Headers, CharacterPolicy::Soft, &view, DEPTH, &sink),
            Verdict::Valid
        );
    }

    #[test]
    fn test_hostile_cookie_rejected() {
        let sink = RecordingDiagnostics::default();
        let view = RequestView {
            cookies: Some(string_map(&[("session", "abc<script>")])),
            ..Default::default()
        };
        assert_eq!(
            check(Source::Cookies, CharacterPolicy::Strict, &view, DEPTH, &sink),
            Verdict::Invalid
        );
        assert_eq!(sink.count("source_rejected"), 1);
    }

    #[test]
    fn test_query_array_elements_checked_independently() {
        let sink = RecordingDiagnostics::default();
        let view = RequestView {
            query: Some(json_map(json!({ "tags": ["ok", "bad'value"] }))),
            ..Default::default()
        };
        assert_eq!(
            check(Source::Query, CharacterPolicy::Strict, &view, DEPTH, &sink),
            Verdict::Invalid
        );

        let view = RequestView {
            query: Some(json_map(json!({ "tags": ["ok", "also-ok"], "page": "2" }))),
            ..Default::default()
        };
        assert_eq!(
            check(Source::Query, CharacterPolicy::Strict, &view, DEPTH, &sink),
            Verdict::Valid
        );
    }

    #[test]
    fn test_non_string_params_are_skipped() {
        let sink = RecordingDiagnostics::default();
        let view = RequestView {
            params: Some(json_map(json!({ "id": "123", "flags": 7 }))),
            ..Default::default()
        };
        assert_eq!(
            check(Source::Params, CharacterPolicy::Strict, &view, DEPTH, &sink),
            Verdict::Valid
        );

        let view = RequestView {
            params: Some(json_map(json!({ "id": "12'3" }))),
            ..Default::default()
        };
        assert_eq!(
            check(Source::Params, CharacterPolicy::Strict, &view, DEPTH, &sink),
            Verdict::Invalid
        );
    }

    #[test]
    fn test_array_body_is_valid() {
        let sink = RecordingDiagnostics::default();
        let view = RequestView {
            body: Some(json!(["bad<script>"])),
            ..Default::default()
        };
        assert_eq!(
            check(Source::Body, CharacterPolicy::Strict, &view, DEPTH, &sink),
            Verdict::Valid
        );
    }
}
