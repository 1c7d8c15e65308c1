//! Nested body traversal.

use serde_json::Value;

use crate::sanitize::diagnostics::Diagnostics;
use crate::sanitize::policy::{CharacterPolicy, Verdict};

/// Recursively scan a body value for forbidden characters under the Strict
/// policy, short-circuiting on the first failing string leaf.
///
/// Only keyed mappings are recursed into. Array elements and non-string
/// scalars pass without inspection; arrays nested in the body are
/// deliberately left untraversed to match the established gate behavior.
///
/// `max_depth` is the number of nesting levels allowed below the root.
/// Values nested past it fail closed with `Invalid`.
pub fn walk(value: &Value, max_depth: usize, diagnostics: &dyn Diagnostics) -> Verdict {
    walk_at(value, 0, max_depth, diagnostics)
}

fn walk_at(
    value: &Value,
    depth: usize,
    max_depth: usize,
    diagnostics: &dyn Diagnostics,
) -> Verdict {
    if depth > max_depth {
        let limit = max_depth.to_string();
        diagnostics.record("body_depth_exceeded", &[("max_depth", limit.as_str())]);
        return Verdict::Invalid;
    }

    match value {
        Value::String(s) => CharacterPolicy::Strict.classify_str(s, diagnostics),
        Value::Object(members) => {
            for member in members.values() {
                if walk_at(member, depth + 1, max_depth, diagnostics).is_invalid() {
                    return Verdict::Invalid;
                }
            }
            Verdict::Valid
        }
        // Arrays and non-string scalars are not traversed.
        _ => Verdict::Valid,
    }
}
