//! Headings and the outline forest.

use std::fmt;

use serde::Serialize;

/// Heading level; `H1` is the most prominent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HeadingLevel {
    /// Largest heading size
    H1,
    /// Second-largest heading size
    H2,
    /// Everything smaller
    H3,
}

impl HeadingLevel {
    /// Level from a zero-based rank in the descending size list.
    ///
    /// Ranks past the third collapse to `H3`.
    pub fn from_rank(rank: usize) -> Self {
        match rank {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// Ordinal (1 for `H1`).
    pub fn ordinal(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.ordinal())
    }
}

/// A leveled heading in document order, before tree assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    /// Heading text
    pub text: String,
    /// Assigned level
    pub level: HeadingLevel,
    /// Page number (1-indexed)
    pub page: u32,
    /// Vertical position on the page
    pub y: f32,
    /// Line font size
    pub font_size: f32,
    /// Heading score from the scorer
    pub score: f32,
    /// Index of the source line in document order
    pub line_index: usize,
    /// Leading section number such as `2.1` or `A.`
    pub section_number: Option<String>,
}

/// A node of the outline tree.
///
/// Children are owned exclusively by their parent; the tree has no back
/// references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingNode {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Leading section number, if any
    #[serde(skip)]
    pub section_number: Option<String>,
    /// Child headings in document order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    /// Create a leaf node.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            section_number: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf node from a leveled heading.
    pub fn from_heading(heading: &Heading) -> Self {
        Self {
            level: heading.level,
            text: heading.text.clone(),
            page: heading.page,
            section_number: heading.section_number.clone(),
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }
}

/// The outline forest of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Outline {
    /// Root-level nodes
    pub items: Vec<HeadingNode>,
}

impl Outline {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of root-level nodes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Get the total number of nodes (including nested).
    pub fn total_items(&self) -> usize {
        self.items.iter().map(|item| item.subtree_len()).sum()
    }

    /// All nodes in pre-order.
    pub fn flatten(&self) -> Vec<&HeadingNode> {
        fn walk<'a>(nodes: &'a [HeadingNode], out: &mut Vec<&'a HeadingNode>) {
            for node in nodes {
                out.push(node);
                walk(&node.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.items, &mut out);
        out
    }
}

impl From<Vec<HeadingNode>> for Outline {
    fn from(items: Vec<HeadingNode>) -> Self {
        Self { items }
    }
}
