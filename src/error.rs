//! Error types for pdf-outline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdf-outline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting an outline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading an input file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version we do not understand.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error extracting text content from a page.
    #[error("Text extraction error on page {page}: {reason}")]
    TextExtract { page: u32, reason: String },

    /// Heuristic configuration rejected before processing.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error serializing an outline.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Writing an output record failed. Fatal for a batch.
    #[error("Cannot write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Whether this error describes the environment rather than one document.
    ///
    /// Batch processing keeps going after document errors and stops on these.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Output { .. } | Error::InvalidConfig(_))
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
