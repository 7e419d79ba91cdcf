use unicode_normalization::UnicodeNormalization;

/// True when nothing but whitespace is left
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Duplicate-comparison key for history source texts.
///
/// Trimmed, NFC composed and lowercased, so "Café", "CAFÉ " and a
/// decomposed "cafe\u{301}" all collide.
pub fn history_key(text: &str) -> String {
    text.trim().nfc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_folds_case_and_whitespace() {
        assert_eq!(history_key("  Hello World \n"), "hello world");
        assert_eq!(history_key("Café"), history_key("CAFÉ "));
    }

    #[test]
    fn key_composes_decomposed_marks() {
        assert_eq!(history_key("cafe\u{301}"), history_key("café"));
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" a "));
    }
}
