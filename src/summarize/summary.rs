//! Extractive sentence selection.

use crate::analysis::Lexicon;

use super::{SummaryOptions, SummaryOrder};

/// Score of one sentence: domain keyword hits, plus one for a length in the
/// preferred band, plus one for a four-digit number.
pub fn sentence_score(lexicon: &Lexicon, sentence: &str, options: &SummaryOptions) -> usize {
    let words = sentence.split_whitespace().count();
    let (low, high) = options.preferred_words;

    let mut score = lexicon.count_domain_keywords(sentence);
    if words >= low && words <= high {
        score += 1;
    }
    if lexicon.has_four_digit_number(sentence) {
        score += 1;
    }
    score
}

/// Select up to `options.sentences` sentences from `text`.
pub fn summarize(lexicon: &Lexicon, text: &str, options: &SummaryOptions) -> Vec<String> {
    let mut scored: Vec<(usize, usize, String)> = lexicon
        .split_sentences(text)
        .into_iter()
        .filter(|s| s.split_whitespace().count() >= options.min_words)
        .enumerate()
        .map(|(i, s)| (i, sentence_score(lexicon, &s, options), s))
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(options.sentences);

    if options.order == SummaryOrder::Source {
        scored.sort_by_key(|(i, _, _)| *i);
    }
    scored.into_iter().map(|(_, _, s)| s).collect()
}
