//! Text helpers

/// Truncate `text` to at most `max_chars` characters, ending with `...` when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::truncate_text;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_text("hello", 80), "hello");
        assert_eq!(truncate_text("", 10), "");
    }

    #[test]
    fn long_text_gets_ellipsis() {
        assert_eq!(truncate_text("abcdefghij", 8), "abcde...");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "ação ação ação";
        let out = truncate_text(text, 7);
        assert_eq!(out, "ação...");
    }
}
