//! Keyword extraction and extractive summaries for ranked sections.

mod keywords;
mod summary;

use std::sync::Arc;

use crate::analysis::Lexicon;
use crate::model::Section;

pub use keywords::extract_keywords;
pub use summary::{sentence_score, summarize};

/// Order of the selected summary sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryOrder {
    /// As they appear in the section body
    #[default]
    Source,
    /// Highest score first
    Score,
}

impl std::str::FromStr for SummaryOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "source" => Ok(SummaryOrder::Source),
            "score" => Ok(SummaryOrder::Score),
            other => Err(format!("unknown summary order: {}", other)),
        }
    }
}

/// Options for keyword extraction and summaries.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Number of keywords per section
    pub keywords: usize,

    /// Shortest keyword, in characters
    pub min_token_len: usize,

    /// Number of summary sentences
    pub sentences: usize,

    /// Sentences with fewer words are skipped
    pub min_words: usize,

    /// Word-count band earning a bonus point (inclusive)
    pub preferred_words: (usize, usize),

    /// Output order of the sentences
    pub order: SummaryOrder,
}

impl SummaryOptions {
    /// Create new summary options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyword count.
    pub fn with_keywords(mut self, count: usize) -> Self {
        self.keywords = count;
        self
    }

    /// Set the minimum keyword length.
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    /// Set the sentence count.
    pub fn with_sentences(mut self, count: usize) -> Self {
        self.sentences = count;
        self
    }

    /// Set the minimum sentence length in words.
    pub fn with_min_words(mut self, words: usize) -> Self {
        self.min_words = words;
        self
    }

    /// Set the preferred sentence length band.
    pub fn with_preferred_words(mut self, low: usize, high: usize) -> Self {
        self.preferred_words = (low.min(high), low.max(high));
        self
    }

    /// Set the sentence order.
    pub fn with_order(mut self, order: SummaryOrder) -> Self {
        self.order = order;
        self
    }
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            keywords: 5,
            min_token_len: 3,
            sentences: 2,
            min_words: 5,
            preferred_words: (10, 30),
            order: SummaryOrder::Source,
        }
    }
}

/// Fills in keywords and summaries of ranked sections.
pub struct Summarizer {
    lexicon: Arc<Lexicon>,
    options: SummaryOptions,
}

impl Summarizer {
    /// Create a summarizer over a shared lexicon.
    pub fn new(lexicon: Arc<Lexicon>, options: SummaryOptions) -> Self {
        Self { lexicon, options }
    }

    /// Summary options in use.
    pub fn options(&self) -> &SummaryOptions {
        &self.options
    }

    /// Attach keywords and summary sentences computed from the body.
    pub fn enrich(&self, mut section: Section) -> Section {
        section.keywords = extract_keywords(
            &self.lexicon,
            &section.body,
            self.options.keywords,
            self.options.min_token_len,
        );
        section.summary = summarize(&self.lexicon, &section.body, &self.options);
        section
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    #[test]
    fn test_enrich_section() {
        let summarizer = Summarizer::new(Arc::new(Lexicon::new()), SummaryOptions::default());
        let section = Section::new(
            "a.pdf",
            "Results",
            HeadingLevel::H1,
            4,
            "Accuracy improved on every benchmark we tried in 2023. Tiny. \
             The benchmark suite covers many tasks across several domains today.",
        );
        let section = summarizer.enrich(section);
        assert_eq!(section.keywords[0], "benchmark");
        assert!(section.keywords.len() <= 5);
        assert_eq!(section.summary.len(), 2);
        assert!(section.summary[0].starts_with("Accuracy"));
    }

    #[test]
    fn test_empty_body() {
        let summarizer = Summarizer::new(Arc::new(Lexicon::new()), SummaryOptions::default());
        let section = summarizer.enrich(Section::new("a.pdf", "Notes", HeadingLevel::H3, 1, ""));
        assert!(section.keywords.is_empty());
        assert!(section.summary.is_empty());
    }

    #[test]
    fn test_summary_order_parse() {
        assert_eq!("score".parse::<SummaryOrder>(), Ok(SummaryOrder::Score));
        assert_eq!("Source".parse::<SummaryOrder>(), Ok(SummaryOrder::Source));
        assert!("random".parse::<SummaryOrder>().is_err());
    }
}
