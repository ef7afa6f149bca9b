//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries. Used to keep provider error bodies
/// bounded.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_error_untouched() {
        assert_eq!(truncate("429 rate limited", 64), "429 rate limited");
    }

    #[test]
    fn test_truncate_long_error() {
        assert_eq!(truncate("upstream provider exploded", 11), "upstream...");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // "é" is two bytes
        assert_eq!(truncate("ééé", 6), "ééé");
        assert_eq!(truncate("ééé", 5), "é...");
        // target 3 falls inside the first "é", so the cut backs up to 1
        assert_eq!(truncate("aéé", 6), "a...");
    }
}
