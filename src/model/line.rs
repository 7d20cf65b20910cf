//! Per-line typographic features.

use serde::Serialize;

/// One visual line with the typographic signal used for heading detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFeature {
    /// Whitespace- and Unicode-normalized text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Font size averaged over spans, weighted by character count
    pub font_size: f32,
    /// Any span is bold
    pub bold: bool,
    /// Any span is underlined
    pub underlined: bool,
    /// Every span is horizontally centered on the page
    pub centered: bool,
    /// Uppercase text longer than two characters
    pub all_caps: bool,
    /// Any span uses a non-default ink color
    pub colored: bool,
    /// Vertical position of the line top (points from page top)
    pub y: f32,
    /// Heading likelihood, assigned by the scorer
    pub score: f32,
    /// Position of the line in document order
    pub index: usize,
}

impl LineFeature {
    /// Font size rounded to the nearest point.
    pub fn rounded_size(&self) -> i32 {
        self.font_size.round() as i32
    }

    /// Number of characters in the text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
