//! Options for section extraction and ranking.

/// Options for building section body windows.
#[derive(Debug, Clone)]
pub struct SectionOptions {
    /// Maximum number of lines following a heading
    pub window_lines: usize,

    /// Maximum body length in characters
    pub max_chars: usize,
}

impl SectionOptions {
    /// Create new section options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line window.
    pub fn with_window_lines(mut self, lines: usize) -> Self {
        self.window_lines = lines;
        self
    }

    /// Set the character cap.
    pub fn with_max_chars(mut self, chars: usize) -> Self {
        self.max_chars = chars;
        self
    }
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            window_lines: 40,
            max_chars: 2000,
        }
    }
}

/// Options for relevance ranking.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Number of sections kept for enrichment
    pub top_k: usize,

    /// Sections scoring below this are discarded
    pub min_score: Option<f32>,

    /// Boost added per domain keyword found in the title
    pub title_boost: f32,

    /// Boost added per domain keyword found only in the body
    pub body_boost: f32,

    /// Upper bound of the boost multiplier
    pub max_boost: f32,
}

impl RankOptions {
    /// Create new rank options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of retained sections.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the minimum relevance floor.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Set the boost increments.
    pub fn with_boosts(mut self, title: f32, body: f32) -> Self {
        self.title_boost = title;
        self.body_boost = body;
        self
    }

    /// Set the boost ceiling.
    pub fn with_max_boost(mut self, max_boost: f32) -> Self {
        self.max_boost = max_boost.max(1.0);
        self
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_score: None,
            title_boost: 0.25,
            body_boost: 0.1,
            max_boost: 2.0,
        }
    }
}
