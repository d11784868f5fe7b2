//! # redocx
//!
//! Rename the DOCX files inside a zip archive after the first paragraph of
//! each document.
//!
//! Every entry's header (the text of its first `w:p` paragraph) is
//! sanitized into a file name ending in `.docx`, colliding names are made
//! unique with a ` (n)` counter, and the archive is written back with the
//! same content under the new names.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Rename with default options
//! let plan = redocx::rename_file("documents.zip", "renamed.zip")?;
//! for record in &plan.records {
//!     println!("{} -> {}", record.original, record.renamed);
//! }
//!
//! // Just the header of a single document
//! let data = std::fs::read("report.docx")?;
//! println!("{}", redocx::extract_header(&data)?);
//! # Ok::<(), redocx::Error>(())
//! ```
//!
//! ## Options
//!
//! ```no_run
//! use redocx::{ErrorPolicy, RenameOptions, Renamer, SuffixStyle};
//!
//! let options = RenameOptions::new()
//!     .with_error_policy(ErrorPolicy::Abort)
//!     .with_suffix_style(SuffixStyle::BeforeExtension);
//!
//! let data = std::fs::read("documents.zip")?;
//! let outcome = Renamer::new(options).rename_bytes(&data)?;
//! std::fs::write("renamed.zip", &outcome.data)?;
//! # Ok::<(), redocx::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async` (default): concurrent header extraction with Tokio

pub mod archive;
pub mod batch;
pub mod container;
pub mod error;
pub mod header;
pub mod report;
pub mod resolve;
pub mod sanitize;

// Re-exports
pub use archive::{Archive, ArchiveEntry};
pub use batch::{
    rename_batch, ErrorPolicy, RenameOptions, RenameOutcome, RenamePlan, RenameRecord, Renamer,
};
pub use error::{Error, Result};
pub use header::{extract_header, BODY_DOCUMENT};
pub use report::{to_json, JsonFormat};
pub use resolve::{resolve, resolve_with, SuffixStyle};
pub use sanitize::{sanitize, Sanitizer, DOCX_EXTENSION};

use std::path::Path;

/// Suggested file name for the renamed archive.
pub const DEFAULT_OUTPUT_NAME: &str = "renamed.zip";

/// Rename the DOCX entries of an archive given as bytes, with default options.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("documents.zip")?;
/// let renamed = redocx::rename_bytes(&data)?;
/// std::fs::write("renamed.zip", renamed)?;
/// # Ok::<(), redocx::Error>(())
/// ```
pub fn rename_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Ok(Renamer::default().rename_bytes(data)?.data)
}

/// Rename the DOCX entries of an archive file and write the result.
///
/// # Example
///
/// ```no_run
/// let plan = redocx::rename_file("documents.zip", "renamed.zip")?;
/// println!("{} files renamed", plan.records.len());
/// # Ok::<(), redocx::Error>(())
/// ```
pub fn rename_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<RenamePlan> {
    let data = std::fs::read(input.as_ref())?;
    let outcome = Renamer::default().rename_bytes(&data)?;
    std::fs::write(output.as_ref(), &outcome.data)?;
    Ok(outcome.plan)
}
