//! Heading likelihood scoring.
//!
//! Every line gets a score from one weight table ([`ScoringWeights`]).
//! Candidate selection then runs as two named stages: the threshold stage
//! keeps lines scoring at least [`ScoringWeights::threshold`], and the
//! fallback-anchor stage gives every non-empty page without a candidate its
//! largest-font line.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::lexicon::Lexicon;
use crate::model::LineFeature;

/// Feature contributions and penalties for heading scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    /// Font size at least `size_large_ratio` times the body size
    pub size_large: f32,
    /// Font size at least `size_medium_ratio` times the body size
    pub size_medium: f32,
    /// Font size above the body size
    pub size_small: f32,
    /// Ratio for the large tier
    pub size_large_ratio: f32,
    /// Ratio for the medium tier
    pub size_medium_ratio: f32,
    /// Bold text
    pub bold: f32,
    /// Centered text
    pub centered: f32,
    /// Underlined text
    pub underlined: f32,
    /// All-caps text
    pub all_caps: f32,
    /// Non-default ink color
    pub colored: f32,
    /// Numbering, roman numeral or bullet prefix
    pub numbering: f32,
    /// First word is a heading keyword
    pub keyword: f32,
    /// Text length within `short_length`
    pub short_text: f32,
    /// Inclusive character range earning `short_text`
    pub short_length: (usize, usize),
    /// Inclusive character range outside which `length_penalty` applies
    pub allowed_length: (usize, usize),
    /// Penalty for text outside `allowed_length`
    pub length_penalty: f32,
    /// Penalty for a trailing period that is not an ellipsis
    pub period_penalty: f32,
    /// Penalty for text made only of digits
    pub page_number_penalty: f32,
    /// Minimum score of a heading candidate
    pub threshold: f32,
}

impl ScoringWeights {
    /// Create the default weight table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            size_large: 1.0,
            size_medium: 0.7,
            size_small: 0.4,
            size_large_ratio: 1.5,
            size_medium_ratio: 1.25,
            bold: 0.3,
            centered: 0.2,
            underlined: 0.2,
            all_caps: 0.2,
            colored: 0.1,
            numbering: 0.3,
            keyword: 0.3,
            short_text: 0.2,
            short_length: (2, 20),
            allowed_length: (2, 150),
            length_penalty: 1.0,
            period_penalty: 0.5,
            page_number_penalty: 1.0,
            threshold: 0.5,
        }
    }
}

/// Scores lines and selects heading candidates.
#[derive(Debug, Clone)]
pub struct HeadingScorer {
    lexicon: Arc<Lexicon>,
    weights: ScoringWeights,
}

impl HeadingScorer {
    /// Create a new scorer.
    pub fn new(lexicon: Arc<Lexicon>, weights: ScoringWeights) -> Self {
        Self { lexicon, weights }
    }

    /// The weight table in use.
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Heading likelihood of one line.
    pub fn score(&self, line: &LineFeature, body_size: f32) -> f32 {
        let w = &self.weights;
        let text = line.text.as_str();
        let len = line.char_len();
        let mut score = 0.0;

        if body_size > 0.0 {
            let ratio = line.font_size / body_size;
            if ratio >= w.size_large_ratio {
                score += w.size_large;
            } else if ratio >= w.size_medium_ratio {
                score += w.size_medium;
            } else if ratio > 1.0 {
                score += w.size_small;
            }
        }

        if line.bold {
            score += w.bold;
        }
        if line.centered {
            score += w.centered;
        }
        if line.underlined {
            score += w.underlined;
        }
        if line.all_caps {
            score += w.all_caps;
        }
        if line.colored {
            score += w.colored;
        }
        if self.lexicon.has_heading_marker(text) {
            score += w.numbering;
        }
        if self.lexicon.starts_with_heading_keyword(text) {
            score += w.keyword;
        }
        if (w.short_length.0..=w.short_length.1).contains(&len) {
            score += w.short_text;
        }

        if !(w.allowed_length.0..=w.allowed_length.1).contains(&len) {
            score -= w.length_penalty;
        }
        if text.ends_with('.') && !text.ends_with("...") {
            score -= w.period_penalty;
        }
        if text.chars().all(|c| c.is_ascii_digit()) {
            score -= w.page_number_penalty;
        }

        score
    }

    /// Score every line in place.
    pub fn score_lines(&self, lines: &mut [LineFeature], body_size: f32) {
        for line in lines.iter_mut() {
            line.score = self.score(line, body_size);
        }
    }

    /// Threshold stage: lines scoring at least the candidate threshold.
    pub fn threshold_candidates(&self, lines: &[LineFeature]) -> Vec<LineFeature> {
        lines
            .iter()
            .filter(|l| l.score >= self.weights.threshold)
            .cloned()
            .collect()
    }

    /// Fallback-anchor stage: add the largest-font line of every page that
    /// has lines but no candidate, with a score of zero.
    ///
    /// The result is in document order.
    pub fn add_fallback_anchors(
        &self,
        lines: &[LineFeature],
        mut candidates: Vec<LineFeature>,
    ) -> Vec<LineFeature> {
        let mut largest: BTreeMap<u32, &LineFeature> = BTreeMap::new();
        for line in lines {
            match largest.get(&line.page) {
                Some(best) if best.font_size >= line.font_size => {}
                _ => {
                    largest.insert(line.page, line);
                }
            }
        }

        let mut anchors = 0;
        for (page, line) in largest {
            if candidates.iter().any(|c| c.page == page) {
                continue;
            }
            let mut anchor = line.clone();
            anchor.score = 0.0;
            candidates.push(anchor);
            anchors += 1;
        }
        if anchors > 0 {
            log::debug!("Added {} fallback anchor lines", anchors);
        }

        candidates.sort_by_key(|c| c.index);
        candidates
    }

    /// Score lines and run both candidate stages.
    pub fn candidates(&self, lines: &mut [LineFeature], body_size: f32) -> Vec<LineFeature> {
        self.score_lines(lines, body_size);
        let candidates = self.threshold_candidates(lines);
        log::debug!(
            "{} of {} lines pass the heading threshold",
            candidates.len(),
            lines.len()
        );
        self.add_fallback_anchors(lines, candidates)
    }
}
