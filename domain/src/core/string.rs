//! String utilities for the domain layer.

/// Split text into trimmed, non-empty sentences on `.`, `!` and `?`.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// The first sentence of `text`, if it has any terminator-delimited content.
pub fn first_sentence(text: &str) -> Option<&str> {
    split_sentences(text).into_iter().next()
}

/// Take at most `max_chars` characters (not bytes).
pub fn take_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let s = "First one. Second one! Third? ";
        assert_eq!(split_sentences(s), vec!["First one", "Second one", "Third"]);
        assert!(split_sentences("  ...  ").is_empty());
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("The answer is 4. Obviously."), Some("The answer is 4"));
        assert_eq!(first_sentence("no terminator"), Some("no terminator"));
        assert_eq!(first_sentence(""), None);
    }

    #[test]
    fn test_take_chars() {
        assert_eq!(take_chars("abcdef", 3), "abc");
        assert_eq!(take_chars("ab", 3), "ab");
        assert_eq!(take_chars("あのね", 2), "あの");
    }
}
