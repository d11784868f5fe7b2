//! Error types for the redocx library.

use std::io;
use thiserror::Error;

/// Result type alias for redocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while renaming an archive.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The outer archive or a nested DOCX package could not be read.
    #[error("Corrupt archive: {0}")]
    ArchiveCorrupt(String),

    /// The DOCX package has no body document part.
    #[error("Missing body document: {0}")]
    MissingBodyDocument(String),

    /// A requested part is not present in the package.
    #[error("Missing part: {0}")]
    MissingPart(String),

    /// The body document is not well-formed XML.
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    /// The body document contains no paragraph.
    #[error("Document has no paragraphs")]
    NoParagraphs,

    /// Header extraction failed for an entry and the batch was aborted.
    #[error("Failed to extract header from '{entry}': {source}")]
    Extraction {
        /// Original name of the failing entry
        entry: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// A spawned extraction task did not complete.
    #[error("Extraction task failed: {0}")]
    Task(String),

    /// Error while rendering a report.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ArchiveCorrupt(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedXml(err.to_string())
    }
}
