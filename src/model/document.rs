//! Document-level types.

use serde::Serialize;

use super::Outline;

/// An analyzed document: title, body font size and outline.
///
/// Serializes to the outline-mode JSON shape `{ "title", "outline" }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Source file name
    #[serde(skip)]
    pub name: String,

    /// Title from metadata or inferred from typography
    pub title: String,

    /// Most frequent rounded line font size (ordinary paragraph text)
    #[serde(skip)]
    pub body_size: f32,

    /// Heading outline
    pub outline: Outline,
}

impl Document {
    /// Create an empty document with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check if no headings were found.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, HeadingNode};

    #[test]
    fn test_document_new() {
        let doc = Document::new("report.pdf");
        assert!(doc.is_empty());
        assert_eq!(doc.name, "report.pdf");
    }

    #[test]
    fn test_document_json_shape() {
        let mut doc = Document::new("report.pdf");
        doc.title = "Annual Report".to_string();
        doc.body_size = 11.0;
        doc.outline
            .items
            .push(HeadingNode::new(HeadingLevel::H1, "Intro", 2));

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["title"], "Annual Report");
        assert_eq!(value["outline"][0]["level"], "H1");
        assert!(value.get("body_size").is_none());
        assert!(value.get("name").is_none());
    }
}
