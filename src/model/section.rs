//! Query and section types for relevance ranking.

use serde::{Deserialize, Serialize};

use super::HeadingLevel;

/// Persona and task description forming the relevance query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Who is reading
    pub persona: String,
    /// What they are trying to do
    pub job: String,
}

impl Query {
    /// Create a query.
    pub fn new(persona: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            job: job.into(),
        }
    }

    /// Persona and job joined into one text.
    pub fn text(&self) -> String {
        format!("{}. {}", self.persona.trim(), self.job.trim())
    }
}

/// A heading plus the body text that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Source document name
    pub document: String,
    /// Heading text
    pub title: String,
    /// Heading level
    pub level: HeadingLevel,
    /// Page of the heading (1-indexed)
    pub page: u32,
    /// Body text window, capped in length
    pub body: String,
    /// Extraction order across the whole run
    pub order: usize,
    /// Relevance score
    pub importance_rank: f32,
    /// Whether a domain keyword occurs in the title or body
    pub keyword_hit: bool,
    /// Extracted keywords
    pub keywords: Vec<String>,
    /// Summary sentences
    pub summary: Vec<String>,
}

impl Section {
    /// Create an unranked section.
    pub fn new(
        document: impl Into<String>,
        title: impl Into<String>,
        level: HeadingLevel,
        page: u32,
        body: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            title: title.into(),
            level,
            page,
            body: body.into(),
            order: 0,
            importance_rank: 0.0,
            keyword_hit: false,
            keywords: Vec::new(),
            summary: Vec::new(),
        }
    }

    /// Title and body joined for similarity scoring.
    pub fn full_text(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}. {}", self.title, self.body)
        }
    }

    /// Summary sentences joined into one paragraph.
    pub fn summary_text(&self) -> String {
        self.summary.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text() {
        let query = Query::new("Investment Analyst ", "Assess fraud risk");
        assert_eq!(query.text(), "Investment Analyst. Assess fraud risk");
    }

    #[test]
    fn test_section_text() {
        let mut section = Section::new("a.pdf", "Methods", HeadingLevel::H2, 3, "");
        assert_eq!(section.full_text(), "Methods");
        section.body = "We sampled data.".to_string();
        assert_eq!(section.full_text(), "Methods. We sampled data.");
        section.summary = vec!["One.".to_string(), "Two.".to_string()];
        assert_eq!(section.summary_text(), "One. Two.");
    }
}
