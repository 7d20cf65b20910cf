//! Record types for each pipeline stage boundary.
//!
//! Spans come from the parser, line features from the layout extractor,
//! headings and nodes from the outline builder, sections from the relevance
//! stage, and report entries from the output assembler.

mod document;
mod heading;
mod line;
mod report;
mod section;
mod span;

pub use document::Document;
pub use heading::{Heading, HeadingLevel, HeadingNode, Outline};
pub use line::LineFeature;
pub use report::{ExtractedSection, RelevanceReport, ReportMetadata, SubSection};
pub use section::{Query, Section};
pub use span::{BBox, Span, SpanDocument, SpanLine, SpanPage, DEFAULT_INK};
