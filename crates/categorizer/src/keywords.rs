/// Title keyword extraction, used for display and debugging only.
use std::sync::LazyLock;

use regex::Regex;

const MAX_KEYWORDS: usize = 10;
const MIN_KEYWORD_CHARS: usize = 3;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "how", "what", "why", "when", "where", "is", "are",
];

// Anything that is not a word character (Unicode letter, digit, underscore).
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W").expect("valid regex"));

/// Extract up to ten meaningful lowercase words from a title, in their original order.
///
/// Punctuation becomes whitespace, words shorter than three characters and common stop
/// words are dropped.
pub fn extract_keywords(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");

    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_KEYWORD_CHARS)
        .filter(|word| !STOP_WORDS.contains(word))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_stop_words_and_punctuation() {
        assert_eq!(
            extract_keywords("How to Learn Python: A Beginner's Guide!!"),
            vec!["learn", "python", "beginner", "guide"]
        );
    }

    #[test]
    fn caps_at_ten_keywords() {
        let title = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        let keywords = extract_keywords(title);
        assert_eq!(keywords.len(), 10);
        assert_eq!(keywords.first().map(String::as_str), Some("alpha"));
        assert_eq!(keywords.last().map(String::as_str), Some("juliet"));
    }

    #[test]
    fn keeps_digits_and_underscores() {
        assert_eq!(
            extract_keywords("Top 100 snake_case tips (2024)"),
            vec!["top", "100", "snake_case", "tips", "2024"]
        );
    }

    #[test]
    fn short_words_dropped_by_character_count() {
        // "été" is three characters but more than three bytes
        assert_eq!(extract_keywords("Un été à Paris"), vec!["été", "paris"]);
    }

    #[test]
    fn empty_title_has_no_keywords() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("?! -- ...").is_empty());
    }
}
