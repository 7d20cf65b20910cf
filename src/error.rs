//! Error types for docsift.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while analyzing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is neither a PDF nor a span dump.
    #[error("Unknown file format: not a PDF or span document")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// A pre-extracted span document could not be decoded.
    #[error("Span document error: {0}")]
    SpanDump(String),

    /// No registered source handles the file extension.
    #[error("No document source for extension: {0}")]
    UnsupportedSource(String),

    /// Persona/job configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The similarity backend could not vectorize the corpus.
    #[error("Vectorization failed: {0}")]
    Vectorization(String),

    /// No headings or sections were found across the processed documents.
    #[error("No sections or headings found in the input documents")]
    EmptyResult,

    /// The input directory could not be listed.
    #[error("Cannot read input directory {}: {source}", path.display())]
    InputDirectory {
        /// Directory that was requested
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// Error during JSON rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error should abort a batch run instead of skipping one document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InputDirectory { .. })
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SpanDump(err.to_string())
    }
}
