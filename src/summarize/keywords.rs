//! Frequency-based keyword extraction.

use std::collections::HashMap;

use crate::analysis::Lexicon;

/// Top `count` content tokens of `text` by frequency.
///
/// Stopwords and tokens shorter than `min_len` characters are skipped.
/// Domain keywords count twice. Ties keep first-seen order.
pub fn extract_keywords(lexicon: &Lexicon, text: &str, count: usize, min_len: usize) -> Vec<String> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut weights: HashMap<String, usize> = HashMap::new();

    for token in lexicon.content_tokens(text, min_len) {
        let weight = if lexicon.is_domain_token(&token) { 2 } else { 1 };
        match weights.get_mut(&token) {
            Some(w) => *w += weight,
            None => {
                weights.insert(token.clone(), weight);
                first_seen.push(token);
            }
        }
    }

    // Stable sort: equal weights stay in first-seen order.
    first_seen.sort_by(|a, b| weights[b].cmp(&weights[a]));
    first_seen.truncate(count);
    first_seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_and_domain_weight() {
        let lexicon = Lexicon::new();
        let text = "Credit models use credit scores. The dataset covers credit and dataset drift.";
        let keywords = extract_keywords(&lexicon, text, 3, 3);
        // dataset: 2 occurrences x2 = 4, credit: 3
        assert_eq!(keywords, vec!["dataset", "credit", "models"]);
    }

    #[test]
    fn test_filters_stopwords_and_short_tokens() {
        let lexicon = Lexicon::new();
        let keywords = extract_keywords(&lexicon, "the of an ox is at it go", 5, 3);
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let lexicon = Lexicon::new();
        let keywords = extract_keywords(&lexicon, "zebra apple mango", 2, 3);
        assert_eq!(keywords, vec!["zebra", "apple"]);
    }

    #[test]
    fn test_count_limit() {
        let lexicon = Lexicon::new();
        let keywords = extract_keywords(&lexicon, "one1 two2 three four five six seven", 4, 3);
        assert_eq!(keywords.len(), 4);
    }
}
