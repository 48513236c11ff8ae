/// Default display budget for titles embedded in alerts
pub const DEFAULT_MAX_TITLE_LENGTH: usize = 50;

const ELLIPSIS: &str = "...";

/// Truncate a PR title for alert text, counting characters rather than bytes
pub fn short_title(title: &str) -> String {
    short_title_with(title, DEFAULT_MAX_TITLE_LENGTH)
}

/// Truncate `title` to at most `max_length` characters, ellipsis included
pub fn short_title_with(title: &str, max_length: usize) -> String {
    if title.chars().count() <= max_length {
        return title.to_string();
    }
    let keep = max_length.saturating_sub(ELLIPSIS.len());
    let mut short: String = title.chars().take(keep).collect();
    short.push_str(ELLIPSIS);
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_title_unchanged_when_short() {
        assert_eq!(short_title("Fix login bug"), "Fix login bug");
    }

    #[test]
    fn test_short_title_exactly_fifty_unchanged() {
        let title = "a".repeat(50);
        assert_eq!(short_title(&title), title);
    }

    #[test]
    fn test_short_title_sixty_chars() {
        let title: String = ('a'..='z').cycle().take(60).collect();
        let result = short_title(&title);
        assert_eq!(result.chars().count(), 50);
        assert!(result.ends_with("..."));
        assert_eq!(&result[..47], &title[..47]);
    }

    #[test]
    fn test_short_title_multibyte() {
        let title = "é".repeat(55);
        let result = short_title(&title);
        assert_eq!(result, format!("{}...", "é".repeat(47)));
    }

    #[test]
    fn test_short_title_custom_length() {
        assert_eq!(short_title_with("abcdefghij", 8), "abcde...");
        assert_eq!(short_title_with("abcdefghij", 2), "...");
    }
}
