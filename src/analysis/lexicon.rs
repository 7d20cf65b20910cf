//! Word lists and compiled patterns shared by every stage.
//!
//! A [`Lexicon`] is built once per run and handed to the extractor, scorer,
//! outline builder, ranker and summarizer behind an `Arc`. It is read-only
//! after construction and safe to share across threads.

use std::collections::HashSet;

use log::warn;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// English stopwords removed before vectorizing and keyword counting.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "either",
    "etc", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in", "into", "is",
    "it", "its", "itself", "just", "may", "me", "might", "more", "most", "must", "my", "myself",
    "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "per", "same", "shall", "she", "should", "since", "so",
    "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "thus", "to", "too", "under", "until",
    "up", "upon", "us", "very", "via", "was", "we", "were", "what", "when", "where", "whether",
    "which", "while", "who", "whom", "why", "will", "with", "within", "without", "would", "yet",
    "you", "your", "yours", "yourself", "yourselves",
];

/// Words that commonly open a heading, in several languages.
const HEADING_KEYWORDS: &[&str] = &[
    // English
    "introduction", "overview", "summary", "conclusion", "conclusions", "background",
    "methodology", "methods", "results", "discussion", "chapter", "section", "part", "appendix",
    "objectives", "scope", "purpose", "recommendations", "findings", "preface", "prologue",
    "epilogue",
    // Spanish / Portuguese / Italian
    "introducción", "introdução", "introduzione", "resumen", "conclusión", "conclusão",
    "capítulo", "capitolo", "sección", "seção", "parte", "anexo",
    // French
    "chapitre", "résumé", "partie", "annexe", "sommaire",
    // German
    "einleitung", "zusammenfassung", "kapitel", "abschnitt", "fazit", "anhang", "teil",
    // Japanese / Chinese
    "第", "章", "はじめに", "概要", "まとめ", "序論", "结论", "概述", "总结", "引言",
    // Hindi
    "अध्याय", "परिचय", "सारांश", "निष्कर्ष",
];

/// Front- and back-matter labels that are never part of the outline.
const BOILERPLATE: &[&str] = &[
    "table of contents",
    "contents",
    "references",
    "reference",
    "acknowledgements",
    "acknowledgments",
    "acknowledgement",
    "acknowledgment",
    "abstract",
    "bibliography",
    "appendix",
    "appendices",
    "index",
    "glossary",
    "list of figures",
    "list of tables",
    "revision history",
    "document history",
    "copyright",
    "copyright notice",
    "about the author",
    "about the authors",
];

/// Default domain keywords used for boosting and summary scoring.
pub const DEFAULT_DOMAIN_KEYWORDS: &[&str] = &[
    "methodology",
    "methodologies",
    "dataset",
    "datasets",
    "benchmark",
    "benchmarks",
    "computational biology",
    "introduction",
    "methods",
    "results",
    "discussion",
    "conclusion",
];

/// Shared word lists and compiled patterns.
#[derive(Debug, Clone)]
pub struct Lexicon {
    stopwords: HashSet<&'static str>,
    heading_keywords: HashSet<&'static str>,
    domain_keywords: Vec<String>,
    domain_tokens: HashSet<String>,
    boilerplate: Regex,
    heading_marker: Regex,
    section_number: Regex,
    numbering_prefix: Regex,
    domain_pattern: Regex,
    token: Regex,
    four_digit: Regex,
    sentence_end: Regex,
}

impl Lexicon {
    /// Create the default lexicon.
    pub fn new() -> Self {
        let boilerplate = BOILERPLATE
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");

        let mut lexicon = Self {
            stopwords: STOPWORDS.iter().copied().collect(),
            heading_keywords: HEADING_KEYWORDS.iter().copied().collect(),
            domain_keywords: Vec::new(),
            domain_tokens: HashSet::new(),
            boilerplate: Regex::new(&format!(r"^(?:{})(?:\s+[a-z0-9]{{1,4}})?$", boilerplate))
                .unwrap(),
            heading_marker: Regex::new(
                r"^(?:\d{1,3}(?:\.\d{1,3})*\.?\)?\s|[IVXLCDM]{1,6}[.)]\s|[ivxlcdm]{1,6}[.)]\s|[A-Za-z][.)]\s|\(\w{1,3}\)\s|[•●○▪■□◆◇►▸‣⁃*–-]\s?)",
            )
            .unwrap(),
            section_number: Regex::new(r"^(\d+(?:\.\d+)*|[A-Z]\.)").unwrap(),
            numbering_prefix: Regex::new(
                r"^(?:\d{1,3}(?:\.\d{1,3})*\.?\)?|[IVXLCDMivxlcdm]{1,6}[.)]|[A-Za-z][.)])\s+",
            )
            .unwrap(),
            domain_pattern: Regex::new("$^").unwrap(),
            token: Regex::new(r"[\p{L}\p{N}]+").unwrap(),
            four_digit: Regex::new(r"\b\d{4}\b").unwrap(),
            sentence_end: Regex::new(r"[.!?。！？]+[\s]+").unwrap(),
        };
        lexicon.set_domain_keywords(DEFAULT_DOMAIN_KEYWORDS.iter().map(|s| s.to_string()));
        lexicon
    }

    /// Replace the domain keyword list.
    pub fn with_domain_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_domain_keywords(keywords.into_iter().map(Into::into));
        self
    }

    fn set_domain_keywords(&mut self, keywords: impl Iterator<Item = String>) {
        let mut seen = HashSet::new();
        let keywords: Vec<String> = keywords
            .map(|k| normalize_text(&k).to_lowercase())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();

        self.domain_tokens = keywords
            .iter()
            .filter(|k| !k.contains(' '))
            .cloned()
            .collect();

        // Longest first so multi-word phrases win over their parts.
        let mut alternatives: Vec<&String> = keywords.iter().collect();
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()));
        let body = alternatives
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        self.domain_pattern = if body.is_empty() {
            never_matches()
        } else {
            match Regex::new(&format!(r"\b(?:{})\b", body)) {
                Ok(pattern) => pattern,
                Err(e) => {
                    warn!("Domain keyword pattern rejected ({}), keyword counts disabled", e);
                    never_matches()
                }
            }
        };
        self.domain_keywords = keywords;
    }

    /// Check if a lowercase token is a stopword.
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Domain keywords, lowercase.
    pub fn domain_keywords(&self) -> &[String] {
        &self.domain_keywords
    }

    /// Check if a lowercase token is a single-word domain keyword.
    pub fn is_domain_token(&self, token: &str) -> bool {
        self.domain_tokens.contains(token)
    }

    /// Count domain keyword occurrences in text (case-insensitive).
    pub fn count_domain_keywords(&self, text: &str) -> usize {
        self.domain_pattern.find_iter(&text.to_lowercase()).count()
    }

    /// Distinct domain keywords occurring in text (case-insensitive).
    pub fn matched_domain_keywords(&self, text: &str) -> HashSet<String> {
        self.domain_pattern
            .find_iter(&text.to_lowercase())
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Check if text starts with a numbering, roman-numeral or bullet marker.
    pub fn has_heading_marker(&self, text: &str) -> bool {
        self.heading_marker.is_match(text)
    }

    /// Check if the first word (after any numbering) is a heading keyword.
    pub fn starts_with_heading_keyword(&self, text: &str) -> bool {
        let rest = self.numbering_prefix.replace(text.trim(), "");
        let first = match rest.split_whitespace().next() {
            Some(word) => word
                .trim_end_matches(|c: char| c.is_ascii_punctuation())
                .to_lowercase(),
            None => return false,
        };
        if self.heading_keywords.contains(first.as_str()) {
            return true;
        }
        // Scripts without word spaces: match keyword prefixes.
        self.heading_keywords
            .iter()
            .filter(|kw| !kw.is_ascii() && kw.chars().all(|c| !c.is_lowercase()))
            .any(|kw| first.starts_with(*kw))
    }

    /// Leading section number token such as `1.2` or `A.`.
    pub fn section_number(&self, text: &str) -> Option<String> {
        self.section_number
            .captures(text.trim())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Check if a heading is a front/back-matter label.
    pub fn is_boilerplate(&self, text: &str) -> bool {
        let key = heading_key(text);
        let key = self.numbering_prefix.replace(&key, "");
        let key = key.trim_end_matches(&[':', '.'][..]).trim();
        self.boilerplate.is_match(key)
    }

    /// Lowercase word tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.token
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }

    /// Lowercase tokens with stopwords and short tokens removed.
    pub fn content_tokens(&self, text: &str, min_len: usize) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .filter(|t| t.chars().count() >= min_len && !self.is_stopword(t))
            .collect()
    }

    /// Check if text contains a standalone four-digit number.
    pub fn has_four_digit_number(&self, text: &str) -> bool {
        self.four_digit.is_match(text)
    }

    /// Split text into sentences on terminal punctuation.
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;
        for m in self.sentence_end.find_iter(text) {
            let sentence = text[start..m.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = m.end();
        }
        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }
        sentences
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

fn never_matches() -> Regex {
    Regex::new("$^").unwrap()
}

/// Check if a character belongs to a script written without word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// NFKC-normalize and collapse runs of whitespace.
pub fn normalize_text(text: &str) -> String {
    let normalized: String = text.nfkc().collect();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key for headings: normalized and lowercased.
pub fn heading_key(text: &str) -> String {
    normalize_text(text).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello \t\n world  "), "Hello world");
        // Ligature folded by NFKC
        assert_eq!(normalize_text("\u{FB01}nal"), "final");
        assert_eq!(heading_key(" 1. INTRODUCTION "), "1. introduction");
    }

    #[test]
    fn test_heading_markers() {
        let lex = Lexicon::new();
        assert!(lex.has_heading_marker("1. Introduction"));
        assert!(lex.has_heading_marker("2.3.1 Data sources"));
        assert!(lex.has_heading_marker("IV. Scope"));
        assert!(lex.has_heading_marker("b) Goals"));
        assert!(lex.has_heading_marker("• Key points"));
        assert!(!lex.has_heading_marker("Introduction"));
        assert!(!lex.has_heading_marker("2024 was a good year"));
    }

    #[test]
    fn test_heading_keywords() {
        let lex = Lexicon::new();
        assert!(lex.starts_with_heading_keyword("Introduction"));
        assert!(lex.starts_with_heading_keyword("1. Introduction"));
        assert!(lex.starts_with_heading_keyword("Chapter 3: Results"));
        assert!(lex.starts_with_heading_keyword("Einleitung"));
        assert!(lex.starts_with_heading_keyword("第一章 概要"));
        assert!(!lex.starts_with_heading_keyword("Company History"));
        assert!(!lex.starts_with_heading_keyword(""));
    }

    #[test]
    fn test_section_number() {
        let lex = Lexicon::new();
        assert_eq!(lex.section_number("1.1 Background"), Some("1.1".to_string()));
        assert_eq!(lex.section_number("A. Scope"), Some("A.".to_string()));
        assert_eq!(lex.section_number("Background"), None);
    }

    #[test]
    fn test_boilerplate() {
        let lex = Lexicon::new();
        assert!(lex.is_boilerplate("Table of Contents"));
        assert!(lex.is_boilerplate("REFERENCES"));
        assert!(lex.is_boilerplate("Appendix A"));
        assert!(lex.is_boilerplate("7. Acknowledgements:"));
        assert!(!lex.is_boilerplate("Introduction"));
        assert!(!lex.is_boilerplate("References to prior work in fraud detection"));
    }

    #[test]
    fn test_domain_keywords() {
        let lex = Lexicon::new();
        assert_eq!(
            lex.count_domain_keywords("The Dataset and the datasets in computational biology"),
            3
        );
        assert!(lex.is_domain_token("dataset"));
        assert!(!lex.is_domain_token("computational biology"));

        let custom = Lexicon::new().with_domain_keywords(["Fraud", "risk model"]);
        assert_eq!(custom.count_domain_keywords("fraud and the risk model"), 2);
        assert_eq!(custom.count_domain_keywords("dataset"), 0);
        assert!(custom.matched_domain_keywords("Fraud fraud").contains("fraud"));
    }

    #[test]
    fn test_domain_keywords_deduplicated() {
        let lex = Lexicon::new().with_domain_keywords(["Fraud", "risk", "fraud ", "RISK", "audit"]);
        assert_eq!(lex.domain_keywords(), ["fraud", "risk", "audit"]);
        assert_eq!(lex.count_domain_keywords("Fraud risk audit"), 3);
    }

    #[test]
    fn test_domain_keywords_empty_never_match() {
        let lex = Lexicon::new().with_domain_keywords(Vec::<String>::new());
        assert!(lex.domain_keywords().is_empty());
        assert_eq!(lex.count_domain_keywords("fraud risk"), 0);
    }

    #[test]
    fn test_spaceless_script_chars() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('の'));
        assert!(is_spaceless_script_char('。'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }

    #[test]
    fn test_tokens_and_sentences() {
        let lex = Lexicon::new();
        assert_eq!(
            lex.content_tokens("The cat sat on a mat in 2024", 3),
            vec!["cat", "sat", "mat", "2024"]
        );
        let sentences = lex.split_sentences("First one. Second one! Third? Tail");
        assert_eq!(sentences, vec!["First one.", "Second one!", "Third?", "Tail"]);
        assert!(lex.has_four_digit_number("Revenue grew in 2023."));
        assert!(!lex.has_four_digit_number("Revenue grew 12345 units."));
    }
}
