//! Identifier sanitization for function-calling names.
//!
//! Decision services only accept tool/function names matching
//! `^[A-Za-z_][A-Za-z0-9_.-]{0,63}$`. Agent names come from human-edited
//! manifests ("HR Agent", "Trợ lý nhân sự") so every name is passed through
//! [`sanitize_identifier`] before it is exposed.

/// Maximum identifier length accepted by the decision service.
pub const MAX_IDENTIFIER_LEN: usize = 64;

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Normalize a name to the function-name grammar.
///
/// Disallowed characters become `_`, a leading non-letter/non-underscore gets
/// a `_` prefix, and the result is cut to [`MAX_IDENTIFIER_LEN`] characters.
/// The function is idempotent.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .collect();

    let starts_ok = out
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !starts_ok {
        out.insert(0, '_');
    }

    // Only ASCII remains, so byte truncation is safe.
    out.truncate(MAX_IDENTIFIER_LEN);
    out
}

/// Result of sanitizing a name, keeping the original for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedName {
    pub original: String,
    pub sanitized: String,
}

impl SanitizedName {
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        let sanitized = sanitize_identifier(&original);
        Self {
            original,
            sanitized,
        }
    }

    /// Whether sanitization altered the name (callers log this as a warning).
    pub fn was_changed(&self) -> bool {
        self.original != self.sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_grammar(s: &str) -> bool {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        (first.is_ascii_alphabetic() || first == '_')
            && chars.all(is_allowed)
            && s.len() <= MAX_IDENTIFIER_LEN
    }

    #[test]
    fn test_clean_names_unchanged() {
        assert_eq!(sanitize_identifier("HR_Agent"), "HR_Agent");
        assert_eq!(sanitize_identifier("web-search.v2"), "web-search.v2");
        assert_eq!(sanitize_identifier("_private"), "_private");
    }

    #[test]
    fn test_replaces_disallowed_characters() {
        assert_eq!(sanitize_identifier("HR Agent"), "HR_Agent");
        assert_eq!(sanitize_identifier("Trợ lý"), "Tr__l_");
        assert_eq!(sanitize_identifier("a/b:c"), "a_b_c");
    }

    #[test]
    fn test_prefixes_invalid_start() {
        assert_eq!(sanitize_identifier("1st_agent"), "_1st_agent");
        assert_eq!(sanitize_identifier("-dash"), "_-dash");
        assert_eq!(sanitize_identifier(".dot"), "_.dot");
        assert_eq!(sanitize_identifier(""), "_");
    }

    #[test]
    fn test_truncates_to_limit() {
        let long = "a".repeat(100);
        assert_eq!(sanitize_identifier(&long).len(), MAX_IDENTIFIER_LEN);

        let long_digit = format!("9{}", "b".repeat(100));
        let sanitized = sanitize_identifier(&long_digit);
        assert_eq!(sanitized.len(), MAX_IDENTIFIER_LEN);
        assert!(sanitized.starts_with("_9"));
    }

    #[test]
    fn test_grammar_and_idempotence_over_samples() {
        let samples = [
            "",
            " ",
            "HR Agent",
            "Chính sách nghỉ phép",
            "🚀 launch",
            "0",
            "___",
            "so-sánh.FNB",
            "名前",
            "a\tb\nc",
            &"x-".repeat(80),
            &"7".repeat(70),
        ];
        for sample in samples {
            let once = sanitize_identifier(sample);
            assert!(matches_grammar(&once), "{once:?} from {sample:?}");
            assert_eq!(sanitize_identifier(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_sanitized_name_tracks_change() {
        assert!(!SanitizedName::new("PE_Agent").was_changed());
        let changed = SanitizedName::new("PE Agent");
        assert!(changed.was_changed());
        assert_eq!(changed.sanitized, "PE_Agent");
    }
}
