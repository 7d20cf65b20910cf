//! Document sources: turn input files into styled span documents.
//!
//! A [`SpanSource`] handles one family of file formats. The
//! [`SourceRegistry`] maps file extensions to sources and dispatches loads.
//!
//! # Example
//!
//! ```no_run
//! use docsift::source::SourceRegistry;
//! use std::path::Path;
//!
//! fn main() -> docsift::Result<()> {
//!     let registry = SourceRegistry::with_defaults();
//!     let doc = registry.load(Path::new("report.pdf"))?;
//!     println!("{} pages", doc.page_count());
//!     Ok(())
//! }
//! ```

mod json;
mod pdf;

pub use json::JsonSpanSource;
pub use pdf::PdfSource;

use crate::error::{Error, Result};
use crate::model::SpanDocument;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Trait for document sources.
///
/// Implement this trait to feed a new input format into the pipeline.
pub trait SpanSource: Send + Sync {
    /// Lowercase extensions without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Name of this source.
    fn name(&self) -> &str;

    /// Load a file at the given path.
    fn load(&self, path: &Path) -> Result<SpanDocument>;

    /// Load from bytes.
    fn load_bytes(&self, bytes: &[u8]) -> Result<SpanDocument>;

    /// Check if this source supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry of document sources keyed by extension and name.
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn SpanSource>>,
    by_name: HashMap<String, Arc<dyn SpanSource>>,
}

impl SourceRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the PDF and span JSON sources.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfSource::new()));
        registry.register(Arc::new(JsonSpanSource::new()));
        registry
    }

    /// Register a source for all its supported extensions.
    pub fn register(&mut self, source: Arc<dyn SpanSource>) {
        for ext in source.supported_extensions() {
            self.sources.insert(ext.to_lowercase(), source.clone());
        }
        self.by_name.insert(source.name().to_lowercase(), source);
    }

    /// Get a source by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn SpanSource>> {
        self.sources.get(&ext.to_lowercase()).cloned()
    }

    /// Get a source by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn SpanSource>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.sources.contains_key(&ext.to_lowercase())
    }

    /// Check if a path has a supported extension.
    pub fn supports_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.supports(e))
            .unwrap_or(false)
    }

    /// All supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.sources.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Load a file using the source registered for its extension.
    pub fn load(&self, path: &Path) -> Result<SpanDocument> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedSource(String::new()))?;

        let source = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedSource(ext.to_string()))?;

        source.load(path)
    }

    /// Load bytes using the source registered for `ext`.
    pub fn load_bytes(&self, bytes: &[u8], ext: &str) -> Result<SpanDocument> {
        let source = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedSource(ext.to_string()))?;

        source.load_bytes(bytes)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
