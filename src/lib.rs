//! # docsift
//!
//! Typographic heading detection, outline building and persona-driven
//! section ranking for PDF documents.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsift::{outline_file, render};
//!
//! fn main() -> docsift::Result<()> {
//!     let doc = outline_file("report.pdf")?;
//!     println!("{}", render::to_json(&doc, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Stages
//!
//! - **Layout features**: per-line font size, weight, centering, caps, color
//! - **Heading scoring**: a weighted sum against the document's body size
//! - **Outline building**: title inference, noise filtering, H1-H3 levels, tree
//! - **Relevance ranking**: TF-IDF (or any [`SimilarityBackend`]) with
//!   domain keyword boosting
//! - **Summaries**: frequency keywords and extractive sentences
//! - **Parallel processing**: documents are analyzed with Rayon

pub mod analysis;
pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod relevance;
pub mod render;
pub mod source;
pub mod summarize;

// Re-export commonly used types
pub use analysis::{Lexicon, ScoringWeights};
pub use config::{PersonaConfig, PipelineOptions};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, SourceFormat};
pub use error::{Error, Result};
pub use model::{
    Document, Heading, HeadingLevel, HeadingNode, LineFeature, Outline, Query, RelevanceReport,
    Section, Span, SpanDocument, SpanLine, SpanPage,
};
pub use pipeline::{Analysis, Analyzer, Pipeline};
pub use relevance::{SimilarityBackend, TfIdfBackend};
pub use render::JsonFormat;
pub use source::{JsonSpanSource, PdfSource, SourceRegistry, SpanSource};

use std::path::Path;

/// Load a file into styled spans with the default sources.
///
/// # Example
///
/// ```no_run
/// use docsift::load_file;
///
/// let doc = load_file("report.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<SpanDocument> {
    SourceRegistry::with_defaults().load(path.as_ref())
}

/// Build the titled outline of one file with default options.
///
/// # Example
///
/// ```no_run
/// use docsift::outline_file;
///
/// let doc = outline_file("report.pdf").unwrap();
/// println!("{}: {} headings", doc.title, doc.outline.total_items());
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    Ok(Pipeline::default().analyze_file(path.as_ref())?.document)
}

/// Build the titled outline of an in-memory span document.
pub fn outline_spans(name: &str, doc: &SpanDocument) -> Document {
    Pipeline::default().analyzer().analyze(name, doc).document
}

/// Outline every supported file in a directory.
pub fn outline_directory<P: AsRef<Path>>(dir: P) -> Result<Vec<Document>> {
    Pipeline::default().run_outline(dir.as_ref())
}

/// Rank and summarize the sections of every supported file in a directory.
///
/// # Example
///
/// ```no_run
/// use docsift::{analyze_directory, PersonaConfig};
///
/// let persona = PersonaConfig::default();
/// let report = analyze_directory("input", &persona).unwrap();
/// for section in &report.extracted_sections {
///     println!("{:.3} {}", section.importance_rank, section.section_title);
/// }
/// ```
pub fn analyze_directory<P: AsRef<Path>>(dir: P, persona: &PersonaConfig) -> Result<RelevanceReport> {
    Pipeline::default().run_relevance(dir.as_ref(), persona)
}
