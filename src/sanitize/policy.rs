//! Character blacklist policies and string classification.

use serde_json::Value;

use crate::sanitize::diagnostics::Diagnostics;

/// Outcome of a validation check.
///
/// Aggregates across fields and sources with "any `Invalid` means
/// `Invalid`" semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
}

impl Verdict {
    /// Returns true if this verdict rejects the input.
    pub fn is_invalid(self) -> bool {
        matches!(self, Verdict::Invalid)
    }
}

/// Blacklist variant applied to a request source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterPolicy {
    /// Blocks `< > { } ( ) " ' $ \`.
    Strict,
    /// Blocks `< > { } ' $ \`, permitting parentheses and double quotes.
    ///
    /// Applied to headers, which legitimately carry quoted and
    /// parenthesized values (User-Agent, Accept, ETag).
    Soft,
}

impl CharacterPolicy {
    /// Returns true if the character is forbidden under this policy.
    fn forbids(self, c: char) -> bool {
        match c {
            '<' | '>' | '{' | '}' | '\'' | '$' | '\\' => true,
            '(' | ')' | '"' => self == CharacterPolicy::Strict,
            _ => false,
        }
    }

    /// Classify a string under this policy.
    ///
    /// Emits a diagnostic carrying the offending value on rejection.
    pub fn classify_str(self, value: &str, diagnostics: &dyn Diagnostics) -> Verdict {
        if value.chars().any(|c| self.forbids(c)) {
            diagnostics.record("forbidden_chars", &[("value", value)]);
            Verdict::Invalid
        } else {
            Verdict::Valid
        }
    }

    /// Classify an arbitrary value under this policy.
    ///
    /// The policy only applies to strings; every other value is `Valid`.
    /// Callers are expected to route string leaves here, but non-strings
    /// are tolerated rather than rejected.
    pub fn classify(self, value: &Value, diagnostics: &dyn Diagnostics) -> Verdict {
        match value {
            Value::String(s) => self.classify_str(s, diagnostics),
            _ => Verdict::Valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::sanitize::diagnostics::test_support::RecordingDiagnostics;

    const STRICT_FORBIDDEN: &str = "<>{}()\"'$\\";
    const SOFT_FORBIDDEN: &str = "<>{}'$\\";

    #[test]
    fn test_strict_rejects_each_forbidden_char() {
        let sink = RecordingDiagnostics::default();
        for c in STRICT_FORBIDDEN.chars() {
            let value = format!("abc{}def", c);
            assert_eq!(
                CharacterPolicy::Strict.classify_str(&value, &sink),
                Verdict::Invalid,
                "strict should reject {:?}",
                c
            );
        }
    }

    #[test]
    fn test_soft_rejects_each_forbidden_char() {
        let sink = RecordingDiagnostics::default();
        for c in SOFT_FORBIDDEN.chars() {
            let value = format!("abc{}def", c);
            assert_eq!(
                CharacterPolicy::Soft.classify_str(&value, &sink),
                Verdict::Invalid,
                "soft should reject {:?}",
                c
            );
        }
    }

    #[test]
    fn test_soft_permits_parens_and_double_quotes() {
        let sink = RecordingDiagnostics::default();
        let value = "Mozilla/5.0 (X11; Linux) \"quoted\"";

        assert_eq!(
            CharacterPolicy::Soft.classify_str(value, &sink),
            Verdict::Valid
        );
        // Same string differs under Strict.
        assert_eq!(
            CharacterPolicy::Strict.classify_str(value, &sink),
            Verdict::Invalid
        );
    }

    #[test]
    fn test_clean_strings_pass_both_policies() {
        let sink = RecordingDiagnostics::default();
        for value in ["", "hello", "user-123", "a=b&c=d", "100%", "äöü"] {
            assert_eq!(
                CharacterPolicy::Strict.classify_str(value, &sink),
                Verdict::Valid
            );
            assert_eq!(
                CharacterPolicy::Soft.classify_str(value, &sink),
                Verdict::Valid
            );
        }
        assert_eq!(sink.count("forbidden_chars"), 0);
    }

    #[test]
    fn test_non_string_values_never_fail() {
        let sink = RecordingDiagnostics::default();
        for value in [json!(42), json!(true), json!(null), json!([1, 2])] {
            assert_eq!(
                CharacterPolicy::Strict.classify(&value, &sink),
                Verdict::Valid
            );
        }
    }

    #[test]
    fn test_rejection_emits_diagnostic() {
        let sink = RecordingDiagnostics::default();
        CharacterPolicy::Strict.classify_str("abc<script>", &sink);
        assert_eq!(sink.count("forbidden_chars"), 1);
    }
}
