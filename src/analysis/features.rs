//! Layout feature extraction.
//!
//! Turns the parser's styled spans into one [`LineFeature`] per non-empty
//! line and computes the document's body font size.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::lexicon::{is_spaceless_script_char, normalize_text, Lexicon};
use super::options::ExtractOptions;
use crate::model::{LineFeature, Span, SpanDocument, SpanLine, SpanPage};

/// Font size statistics for a document.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Body text font size (most common rounded size)
    pub body_size: f32,
    /// Rounded font sizes with line frequency
    pub size_histogram: BTreeMap<i32, usize>,
}

impl FontStatistics {
    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        *self.size_histogram.entry(size.round() as i32).or_insert(0) += 1;
    }

    /// Calculate the body size.
    ///
    /// Sizes are visited from largest to smallest and the first one reaching
    /// the highest count wins, so ties go to the larger size. An empty
    /// histogram yields a body size of zero.
    pub fn analyze(&mut self) {
        let mut best: Option<(i32, usize)> = None;
        for (&size, &count) in self.size_histogram.iter().rev() {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((size, count)),
            }
        }
        self.body_size = best.map(|(size, _)| size as f32).unwrap_or(0.0);
    }

    /// Build statistics from line features.
    pub fn from_lines(lines: &[LineFeature]) -> Self {
        let mut stats = Self::default();
        for line in lines {
            stats.add_size(line.font_size);
        }
        stats.analyze();
        stats
    }
}

/// Extracts per-line typographic features.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    lexicon: Arc<Lexicon>,
    options: ExtractOptions,
}

impl FeatureExtractor {
    /// Create a new extractor.
    pub fn new(lexicon: Arc<Lexicon>, options: ExtractOptions) -> Self {
        Self { lexicon, options }
    }

    /// Extract features for every non-empty line, in document order.
    pub fn extract(&self, doc: &SpanDocument) -> Vec<LineFeature> {
        let mut lines = Vec::with_capacity(doc.line_count());
        for (page_idx, page) in doc.pages.iter().enumerate() {
            let page_number = if page.number > 0 {
                page.number
            } else {
                page_idx as u32 + 1
            };
            for line in &page.lines {
                if let Some(feature) = self.line_feature(page, page_number, line, lines.len()) {
                    lines.push(feature);
                }
            }
        }
        log::debug!(
            "Extracted {} lines from {} pages",
            lines.len(),
            doc.page_count()
        );
        lines
    }

    /// Compute the feature record for one line, or `None` if it has no text.
    pub fn line_feature(
        &self,
        page: &SpanPage,
        page_number: u32,
        line: &SpanLine,
        index: usize,
    ) -> Option<LineFeature> {
        if line.is_empty() {
            return None;
        }

        let text = normalize_text(&join_spans(&line.spans));
        if text.is_empty() {
            return None;
        }

        let spans = &line.spans;
        let y = spans
            .iter()
            .map(|s| s.bbox.y0.min(s.bbox.y1))
            .fold(f32::INFINITY, f32::min);

        Some(LineFeature {
            all_caps: is_all_caps(&text),
            font_size: weighted_font_size(spans),
            bold: spans.iter().any(|s| s.bold),
            underlined: spans.iter().any(|s| s.underline),
            centered: self.is_centered(spans, page.width),
            colored: spans.iter().any(|s| s.color != self.options.default_ink),
            y,
            page: page_number,
            score: 0.0,
            index,
            text,
        })
    }

    /// Body font size of a set of lines.
    pub fn body_size(&self, lines: &[LineFeature]) -> f32 {
        let stats = FontStatistics::from_lines(lines);
        log::debug!(
            "Body font size {} from {} distinct sizes",
            stats.body_size,
            stats.size_histogram.len()
        );
        stats.body_size
    }

    /// Shared lexicon.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn is_centered(&self, spans: &[Span], page_width: f32) -> bool {
        if page_width <= 0.0 {
            return false;
        }
        let center = page_width / 2.0;
        let tolerance = page_width * self.options.center_tolerance;
        spans
            .iter()
            .all(|s| (s.bbox.center_x() - center).abs() <= tolerance)
    }
}

/// Font size averaged over spans, weighted by each span's character count.
pub fn weighted_font_size(spans: &[Span]) -> f32 {
    let total_chars: usize = spans.iter().map(|s| s.char_count()).sum();
    if total_chars == 0 {
        if spans.is_empty() {
            return 0.0;
        }
        return spans.iter().map(|s| s.font_size).sum::<f32>() / spans.len() as f32;
    }
    let weighted: f32 = spans
        .iter()
        .map(|s| s.font_size * s.char_count() as f32)
        .sum();
    weighted / total_chars as f32
}

/// Uppercase text longer than two characters.
fn is_all_caps(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some()
        && letters.all(|c| !c.is_lowercase())
        && text.chars().count() > 2
        && text.chars().any(|c| c.is_uppercase())
}

/// Concatenate span texts, inserting a space where spans are visibly apart.
///
/// No space is inserted between characters of scripts that do not use word
/// spaces.
fn join_spans(spans: &[Span]) -> String {
    let mut result = String::new();

    for (i, span) in spans.iter().enumerate() {
        if i == 0 {
            result.push_str(&span.text);
            continue;
        }

        let prev = &spans[i - 1];
        let gap = span.bbox.x0 - prev.bbox.x1;

        let char_count = span.char_count();
        let avg_char_width = if char_count > 0 && span.bbox.width() > 0.0 {
            span.bbox.width() / char_count as f32
        } else {
            span.font_size * 0.5
        };

        let prev_last = prev.text.chars().last();
        let curr_first = span.text.chars().next();
        let both_spaceless = prev_last.map(is_spaceless_script_char).unwrap_or(false)
            && curr_first.map(is_spaceless_script_char).unwrap_or(false);
        let has_space = prev_last.map(char::is_whitespace).unwrap_or(true)
            || curr_first.map(char::is_whitespace).unwrap_or(true);

        // Overlapping or unknown geometry still separates words.
        let apart = gap > avg_char_width * 0.2 || span.bbox.width() == 0.0;
        if apart && !both_spaceless && !has_space {
            result.push(' ');
        }
        result.push_str(&span.text);
    }

    result
}
