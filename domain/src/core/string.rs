//! String utilities for the domain layer.

/// Marker appended to any text cut short by [`truncate`].
pub const ELLIPSIS: &str = "...";

/// Truncate a string to at most `max_chars` characters, appending [`ELLIPSIS`]
/// when anything was cut.
///
/// Counts Unicode scalar values rather than bytes so Vietnamese or emoji
/// observations are cut at the same visible length as ASCII ones.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{}{}", &s[..end], ELLIPSIS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello world", 5), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Chính sách nghỉ phép", 6), "Chính ...");
        assert_eq!(truncate("日本語テスト", 3), "日本語...");
    }

    #[test]
    fn test_truncate_zero() {
        assert_eq!(truncate("abc", 0), "...");
        assert_eq!(truncate("", 0), "");
    }
}
