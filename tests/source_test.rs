//! Integration tests for document sources and the source registry.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use docsift::error::Result;
use docsift::model::BBox;
use docsift::{
    JsonSpanSource, PdfSource, Pipeline, PipelineOptions, SourceRegistry, Span, SpanDocument,
    SpanLine, SpanPage, SpanSource,
};
use tempfile::TempDir;

/// Mock source that turns each text line into an 11pt span line,
/// with lines starting with `# ` rendered as 18pt bold headings.
struct MockSource {
    extensions: Vec<&'static str>,
    name: &'static str,
}

impl MockSource {
    fn new(extensions: Vec<&'static str>, name: &'static str) -> Self {
        Self { extensions, name }
    }

    fn parse(text: &str) -> SpanDocument {
        let mut page = SpanPage::letter(1);
        for (i, raw) in text.lines().enumerate() {
            let y = 72.0 + i as f32 * 16.0;
            let line = match raw.strip_prefix("# ") {
                Some(heading) => {
                    Span::new(heading, 18.0, BBox::new(72.0, y, 260.0, y + 18.0)).bold()
                }
                None => Span::new(raw, 11.0, BBox::new(72.0, y, 300.0, y + 11.0)),
            };
            page.add_line(SpanLine::new(vec![line]));
        }
        let mut doc = SpanDocument::new();
        doc.pages.push(page);
        doc
    }
}

impl SpanSource for MockSource {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        self.name
    }

    fn load(&self, path: &Path) -> Result<SpanDocument> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    fn load_bytes(&self, bytes: &[u8]) -> Result<SpanDocument> {
        Ok(Self::parse(&String::from_utf8_lossy(bytes)))
    }
}

#[test]
fn test_source_registry_new() {
    let registry = SourceRegistry::new();
    assert!(registry.supported_extensions().is_empty());
}

#[test]
fn test_source_registry_register() {
    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(MockSource::new(vec!["md", "markdown"], "mock-md")));

    assert!(registry.supports("md"));
    assert!(registry.supports("MARKDOWN"));
    assert!(!registry.supports("pdf"));
    assert_eq!(registry.get_by_name("mock-md").unwrap().name(), "mock-md");
}

#[test]
fn test_source_registry_override() {
    let mut registry = SourceRegistry::with_defaults();
    registry.register(Arc::new(MockSource::new(vec!["json"], "mock-json")));

    assert_eq!(registry.get_by_extension("json").unwrap().name(), "mock-json");
    assert_eq!(registry.get_by_extension("pdf").unwrap().name(), "pdf");
}

#[test]
fn test_source_registry_load_bytes() {
    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(MockSource::new(vec!["md"], "mock-md")));

    let doc = registry.load_bytes(b"# Title\nBody line", "md").unwrap();
    assert_eq!(doc.page_count(), 1);
    assert_eq!(doc.line_count(), 2);

    assert!(registry.load_bytes(b"", "docx").is_err());
}

#[test]
fn test_builtin_sources() {
    let pdf = PdfSource::new();
    assert_eq!(pdf.name(), "pdf");
    assert!(pdf.supports_extension("PDF"));

    let spans = JsonSpanSource::new();
    assert_eq!(spans.name(), "spans");
    assert!(spans.supports_extension("json"));
    assert!(!spans.supports_extension("pdf"));
}

#[test]
fn test_pipeline_with_custom_source() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("guide.md"),
        "# Getting Started\n\
         Install the package and run the setup wizard once.\n\
         # Troubleshooting\n\
         Restart the service when the status light turns red.\n",
    )
    .unwrap();

    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(MockSource::new(vec!["md"], "mock-md")));
    let pipeline = Pipeline::new(PipelineOptions::new().sequential()).with_registry(registry);

    let documents = pipeline.run_outline(dir.path()).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].name, "guide.md");
    assert_eq!(documents[0].title, "guide");
    assert_eq!(documents[0].outline.items[0].text, "Getting Started");
    assert_eq!(documents[0].outline.items[1].text, "Troubleshooting");
}
