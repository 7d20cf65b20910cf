//! Pre-extracted span documents stored as JSON.

use std::fs;
use std::path::Path;

use super::SpanSource;
use crate::detect::{detect_format_from_bytes, SourceFormat};
use crate::error::{Error, Result};
use crate::model::SpanDocument;

/// Reads a serialized [`SpanDocument`].
///
/// Useful for documents laid out by an external extractor, and for tests.
#[derive(Debug, Default)]
pub struct JsonSpanSource;

impl JsonSpanSource {
    /// Create a new JSON span source.
    pub fn new() -> Self {
        Self
    }
}

impl SpanSource for JsonSpanSource {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "spans"
    }

    fn load(&self, path: &Path) -> Result<SpanDocument> {
        let bytes = fs::read(path)?;
        self.load_bytes(&bytes)
    }

    fn load_bytes(&self, bytes: &[u8]) -> Result<SpanDocument> {
        match detect_format_from_bytes(bytes)? {
            SourceFormat::SpanJson => {}
            other => return Err(Error::SpanDump(format!("expected span JSON, found {}", other))),
        }
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(bytes);
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        if value.get("pages").is_none() {
            return Err(Error::SpanDump("missing \"pages\" array".to_string()));
        }
        let mut doc: SpanDocument = serde_json::from_value(value)?;

        // Spans carry their page only when the dump says so.
        for page in &mut doc.pages {
            let number = page.number;
            for span in page.lines.iter_mut().flat_map(|l| l.spans.iter_mut()) {
                if span.page == 0 {
                    span.page = number;
                }
            }
        }
        Ok(doc)
    }
}
