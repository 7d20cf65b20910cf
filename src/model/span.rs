//! Parser-boundary types: styled spans grouped into lines and pages.
//!
//! These are produced by a [`SpanSource`](crate::source::SpanSource) and are
//! never mutated afterwards. Coordinates are in points with the origin at the
//! top-left corner of the page (y grows downwards).

use serde::{Deserialize, Serialize};

/// Default ink color (black) as packed `0xRRGGBB`.
pub const DEFAULT_INK: u32 = 0x000000;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).abs()
    }

    /// Horizontal midpoint.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// An atomic styled text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font is bold
    #[serde(default)]
    pub bold: bool,
    /// Whether the text is underlined
    #[serde(default)]
    pub underline: bool,
    /// Fill color as packed `0xRRGGBB`
    #[serde(default)]
    pub color: u32,
    /// Bounding box on the page
    pub bbox: BBox,
    /// Page number (1-indexed)
    #[serde(default)]
    pub page: u32,
}

impl Span {
    /// Create a plain black span.
    pub fn new(text: impl Into<String>, font_size: f32, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold: false,
            underline: false,
            color: DEFAULT_INK,
            bbox,
            page: 0,
        }
    }

    /// Mark the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Mark the span as underlined.
    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Set the fill color.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Set the page number.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Number of characters, used as the weight of this span's font size.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// One visual line made of spans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanLine {
    /// Spans in reading order
    pub spans: Vec<Span>,
}

impl SpanLine {
    /// Create a line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Check if the line has no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// A page of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Lines in reading order
    #[serde(default)]
    pub lines: Vec<SpanLine>,
}

impl SpanPage {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            lines: Vec::new(),
        }
    }

    /// Create an empty US Letter page (612 x 792 points).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Append a line.
    pub fn add_line(&mut self, line: SpanLine) {
        self.lines.push(line);
    }
}

/// Everything the external parser knows about one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanDocument {
    /// Title from document metadata, if any
    #[serde(default)]
    pub title: Option<String>,
    /// Pages in order
    #[serde(default)]
    pub pages: Vec<SpanPage>,
}

impl SpanDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Total number of lines across all pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    /// Check if the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_geometry() {
        let bbox = BBox::new(100.0, 50.0, 300.0, 62.0);
        assert_eq!(bbox.width(), 200.0);
        assert_eq!(bbox.center_x(), 200.0);
    }

    #[test]
    fn test_span_builder() {
        let span = Span::new("Héllo", 12.0, BBox::default())
            .bold()
            .with_color(0xFF0000)
            .on_page(3);
        assert!(span.bold);
        assert!(!span.underline);
        assert_eq!(span.color, 0xFF0000);
        assert_eq!(span.page, 3);
        assert_eq!(span.char_count(), 5);
    }

    #[test]
    fn test_span_document_defaults_from_json() {
        let json = r#"{
            "pages": [
                {"number": 1, "width": 612, "height": 792, "lines": [
                    {"spans": [{"text": "Hi", "font_size": 11, "bbox": {"x0": 0, "y0": 0, "x1": 10, "y1": 11}}]}
                ]}
            ]
        }"#;
        let doc: SpanDocument = serde_json::from_str(json).unwrap();
        assert!(doc.title.is_none());
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.line_count(), 1);
        let span = &doc.pages[0].lines[0].spans[0];
        assert!(!span.bold);
        assert_eq!(span.color, DEFAULT_INK);
    }
}
