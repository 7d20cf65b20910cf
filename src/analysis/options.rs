//! Options for layout analysis and outline building.

use crate::model::DEFAULT_INK;

/// Options for the layout feature extractor.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum distance of a span midpoint from the page center, as a
    /// fraction of page width, for the line to count as centered
    pub center_tolerance: f32,

    /// Ink color that does not count as colored text
    pub default_ink: u32,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the centered-line tolerance.
    pub fn with_center_tolerance(mut self, tolerance: f32) -> Self {
        self.center_tolerance = tolerance;
        self
    }

    /// Set the default ink color.
    pub fn with_default_ink(mut self, color: u32) -> Self {
        self.default_ink = color;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            center_tolerance: 0.15,
            default_ink: DEFAULT_INK,
        }
    }
}

/// Options for level assignment and outline assembly.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Headings whose text appears on this many distinct pages are treated
    /// as running headers/footers
    pub running_header_pages: usize,

    /// Text of the synthesized H1 for orphan H2 headings
    pub placeholder_title: String,

    /// Remove the typographic title line from the heading candidates
    pub consume_title_line: bool,

    /// Title used when neither metadata, typography nor file name give one
    pub untitled: String,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the running header page threshold.
    pub fn with_running_header_pages(mut self, pages: usize) -> Self {
        self.running_header_pages = pages.max(1);
        self
    }

    /// Set the placeholder H1 text.
    pub fn with_placeholder_title(mut self, title: impl Into<String>) -> Self {
        self.placeholder_title = title.into();
        self
    }

    /// Keep the title line in the outline.
    pub fn keep_title_line(mut self) -> Self {
        self.consume_title_line = false;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            running_header_pages: 3,
            placeholder_title: "Miscellaneous".to_string(),
            consume_title_line: true,
            untitled: "Untitled Document".to_string(),
        }
    }
}
