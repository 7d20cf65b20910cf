//! Relevance-mode result records.

use serde::Serialize;

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    /// Names of the processed documents
    pub input_documents: Vec<String>,
    /// Persona text
    pub persona: String,
    /// Job text
    pub job_to_be_done: String,
    /// ISO-8601 generation time
    pub processing_timestamp: String,
}

/// One summary sentence tied to its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubSection {
    /// Sentence text
    pub refined_text: String,
    /// Source document name
    pub document: String,
    /// Page number (1-indexed)
    pub page: u32,
}

/// A ranked and enriched section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedSection {
    /// Source document name
    pub document: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Heading text
    pub section_title: String,
    /// Relevance score
    pub importance_rank: f32,
    /// Top keywords
    pub keywords: Vec<String>,
    /// Summary paragraph
    pub summary: String,
    /// Summary sentences with their source
    pub sub_sections: Vec<SubSection>,
}

/// The aggregate relevance-mode result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceReport {
    /// Run metadata
    pub metadata: ReportMetadata,
    /// Optional digest of the keyword-matching sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_summary: Option<String>,
    /// Top-ranked sections in descending importance
    pub extracted_sections: Vec<ExtractedSection>,
    /// All sub-sections, flattened
    pub subsection_analysis: Vec<SubSection>,
}
