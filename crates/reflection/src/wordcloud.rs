//! Word-frequency tables for wordcloud summaries.
//!
//! Deterministic by construction: case-folded tokens of length >= 3, stop
//! words removed, sorted by count descending with a lexicographic
//! tiebreak, truncated to the top 50. Same entries in, same list out.

use std::collections::HashMap;

/// Number of words kept in a frequency table.
pub const TOP_WORDS: usize = 50;

/// Minimum token length counted.
pub const MIN_TOKEN_LENGTH: usize = 3;

/// Stop words excluded from frequency tables.
const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "all", "also", "and", "any", "are", "because", "been", "before",
    "being", "but", "came", "can", "come", "could", "day", "did", "does", "doing", "down", "each",
    "even", "for", "from", "get", "got", "had", "has", "have", "her", "here", "him", "his", "how",
    "into", "its", "just", "like", "made", "make", "many", "more", "most", "much", "myself", "new",
    "not", "now", "off", "one", "only", "other", "our", "out", "over", "own", "really", "said",
    "same", "she", "should", "some", "still", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "time", "today", "too", "under",
    "until", "very", "was", "way", "went", "were", "what", "when", "where", "which", "while",
    "who", "why", "will", "with", "would", "you", "your",
];

/// Count word frequencies across the given texts and keep the top 50.
pub fn word_frequencies<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for text in texts {
        for raw in text.split(|c: char| !c.is_alphanumeric()) {
            if raw.is_empty() {
                continue;
            }
            let token = raw.to_lowercase();
            if token.chars().count() < MIN_TOKEN_LENGTH {
                continue;
            }
            if STOP_WORDS.binary_search(&token.as_str()).is_ok() {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut table: Vec<(String, usize)> = counts.into_iter().collect();
    table.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    table.truncate(TOP_WORDS);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_words_are_sorted_for_binary_search() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(STOP_WORDS, sorted.as_slice());
    }

    #[test]
    fn test_basic_counting() {
        let table = word_frequencies(["Running running ran!", "I love running and coffee."]);
        assert_eq!(table[0], ("running".to_string(), 3));
        assert!(table.iter().any(|(w, c)| w == "coffee" && *c == 1));
        // "and", "I" filtered; "ran" counts (3 chars).
        assert!(!table.iter().any(|(w, _)| w == "and"));
        assert!(table.iter().any(|(w, _)| w == "ran"));
    }

    #[test]
    fn test_short_tokens_and_stop_words_filtered() {
        let table = word_frequencies(["to be or not to be that is the question"]);
        assert_eq!(table, vec![("question".to_string(), 1)]);
    }

    #[test]
    fn test_deterministic_order_with_tied_counts() {
        let a = word_frequencies(["banana apple cherry"]);
        let b = word_frequencies(["cherry banana apple"]);
        assert_eq!(a, b);
        // Ties break lexicographically.
        assert_eq!(a[0].0, "apple");
        assert_eq!(a[1].0, "banana");
        assert_eq!(a[2].0, "cherry");
    }

    #[test]
    fn test_truncates_to_top_50() {
        let text: String = (0..100).map(|i| format!("word{:03} ", i)).collect();
        let table = word_frequencies([text.as_str()]);
        assert_eq!(table.len(), TOP_WORDS);
    }

    #[test]
    fn test_empty_input() {
        let table = word_frequencies(Vec::<&str>::new());
        assert!(table.is_empty());
    }
}
