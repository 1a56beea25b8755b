//! Message preview attached to each window record

/// Maximum messages kept per window
pub const MAX_SAMPLE_MESSAGES: usize = 30;

/// Maximum characters kept per sampled message
pub const MAX_SAMPLE_CHARS: usize = 30;

/// Truncate a message to [`MAX_SAMPLE_CHARS`] characters
pub fn truncate_message(text: &str) -> String {
    match text.char_indices().nth(MAX_SAMPLE_CHARS) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_untouched() {
        assert_eq!(truncate_message("PogChamp"), "PogChamp");
        assert_eq!(truncate_message(""), "");
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let long = "ä".repeat(40);
        let cut = truncate_message(&long);
        assert_eq!(cut.chars().count(), MAX_SAMPLE_CHARS);

        let exact = "x".repeat(MAX_SAMPLE_CHARS);
        assert_eq!(truncate_message(&exact), exact);
    }
}
