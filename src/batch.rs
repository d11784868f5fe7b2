//! Batch renaming: extract, sanitize, resolve, rename, re-serialize.

use serde::Serialize;

use crate::archive::Archive;
use crate::error::{Error, Result};
use crate::header::extract_header;
use crate::resolve::{resolve_with, SuffixStyle};
use crate::sanitize::{Sanitizer, DOCX_EXTENSION};

/// What to do when a header cannot be extracted from an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the failure and name the entry after its original file name
    #[default]
    Continue,
    /// Fail the whole batch on the first failing entry
    Abort,
}

/// Options for a rename batch.
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    /// Failure handling for individual entries
    pub error_policy: ErrorPolicy,

    /// Placement of the ` (n)` counter on colliding names
    pub suffix_style: SuffixStyle,

    /// Character replacement rules and extension
    pub sanitizer: Sanitizer,
}

impl RenameOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-entry failure policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set where the collision counter goes.
    pub fn with_suffix_style(mut self, style: SuffixStyle) -> Self {
        self.suffix_style = style;
        self
    }

    /// Replace the sanitizer.
    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }
}

/// Header extraction result for one entry, keyed by its original name.
pub type Extracted = (String, Result<String>);

/// The rename decided for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRecord {
    /// Name in the input archive
    pub original: String,
    /// Name in the output archive
    pub renamed: String,
    /// Extracted header, if extraction succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Extraction failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Renames for a whole batch, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    /// One record per renamed entry
    pub records: Vec<RenameRecord>,
}

impl RenamePlan {
    /// Number of entries whose header could not be extracted.
    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| r.error.is_some()).count()
    }

    /// Final names, index-aligned with the records.
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.renamed.as_str()).collect()
    }

    /// Apply the renames to an archive.
    ///
    /// All old-named entries are taken out before any new name goes in, so
    /// a new name that matches another entry's original name cannot
    /// overwrite that entry's content.
    pub fn apply(&self, archive: &mut Archive) {
        let mut pending = Vec::with_capacity(self.records.len());
        for record in &self.records {
            match archive.remove(&record.original) {
                Some(entry) => pending.push((record, entry)),
                None => tracing::warn!("entry '{}' not found in archive", record.original),
            }
        }

        for (record, mut entry) in pending {
            entry.name = record.renamed.clone();
            archive.insert_entry(entry);
        }
    }
}

/// Renamed archive bytes together with the plan that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct RenameOutcome {
    /// Serialized output archive
    #[serde(skip)]
    pub data: Vec<u8>,
    /// Renames applied
    #[serde(flatten)]
    pub plan: RenamePlan,
}

/// Drives a rename batch with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Renamer {
    options: RenameOptions,
}

impl Renamer {
    /// Create a renamer.
    pub fn new(options: RenameOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &RenameOptions {
        &self.options
    }

    /// Extract headers from every file entry, in enumeration order.
    pub fn extract_all(&self, archive: &Archive) -> Vec<Extracted> {
        archive
            .entries()
            .iter()
            .filter(|entry| !entry.is_dir)
            .map(|entry| {
                let header = extract_header(&entry.data);
                (entry.name.clone(), header)
            })
            .collect()
    }

    /// Extract headers from every file entry concurrently.
    ///
    /// Each extraction runs on the blocking pool; results come back in
    /// enumeration order whatever order the tasks finish in.
    #[cfg(feature = "async")]
    pub async fn extract_all_async(&self, archive: &Archive) -> Result<Vec<Extracted>> {
        let tasks = archive
            .entries()
            .iter()
            .filter(|entry| !entry.is_dir)
            .map(|entry| {
                let name = entry.name.clone();
                let data = entry.data.clone();
                tokio::task::spawn_blocking(move || {
                    let header = extract_header(&data);
                    (name, header)
                })
            });

        futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.map_err(|e| Error::Task(e.to_string())))
            .collect()
    }

    /// Turn extraction results into final names: sanitize, then resolve.
    pub fn plan(&self, extracted: Vec<Extracted>) -> Result<RenamePlan> {
        let mut originals = Vec::with_capacity(extracted.len());
        let mut headers = Vec::with_capacity(extracted.len());
        let mut errors = Vec::with_capacity(extracted.len());
        let mut candidates = Vec::with_capacity(extracted.len());

        for (original, result) in extracted {
            let raw = match result {
                Ok(header) => {
                    tracing::debug!("'{}': header {:?}", original, header);
                    headers.push(Some(header.clone()));
                    errors.push(None);
                    header
                }
                Err(e) => match self.options.error_policy {
                    ErrorPolicy::Abort => {
                        tracing::warn!("'{}': {}; aborting batch", original, e);
                        return Err(Error::Extraction {
                            entry: original,
                            source: Box::new(e),
                        });
                    }
                    ErrorPolicy::Continue => {
                        tracing::warn!("'{}': {}; keeping original name", original, e);
                        headers.push(None);
                        errors.push(Some(e.to_string()));
                        placeholder(&original)
                    }
                },
            };
            candidates.push(self.options.sanitizer.sanitize(&raw));
            originals.push(original);
        }

        let resolved = resolve_with(candidates, self.options.suffix_style);

        let records = originals
            .into_iter()
            .zip(resolved)
            .zip(headers.into_iter().zip(errors))
            .map(|((original, renamed), (header, error))| RenameRecord {
                original,
                renamed,
                header,
                error,
            })
            .collect();

        Ok(RenamePlan { records })
    }

    /// Rename every file entry of an archive in place.
    pub fn rename_archive(&self, archive: &mut Archive) -> Result<RenamePlan> {
        let extracted = self.extract_all(archive);
        self.finish(archive, extracted)
    }

    /// Rename every file entry of an archive in place, extracting concurrently.
    #[cfg(feature = "async")]
    pub async fn rename_archive_async(&self, archive: &mut Archive) -> Result<RenamePlan> {
        let extracted = self.extract_all_async(archive).await?;
        self.finish(archive, extracted)
    }

    /// Load, rename and re-serialize an archive.
    pub fn rename_bytes(&self, data: &[u8]) -> Result<RenameOutcome> {
        let mut archive = Archive::load(data)?;
        let plan = self.rename_archive(&mut archive)?;
        let data = archive.serialize()?;
        Ok(RenameOutcome { data, plan })
    }

    /// Load, rename and re-serialize an archive, extracting concurrently.
    #[cfg(feature = "async")]
    pub async fn rename_bytes_async(&self, data: &[u8]) -> Result<RenameOutcome> {
        let mut archive = Archive::load(data)?;
        let plan = self.rename_archive_async(&mut archive).await?;
        let data = archive.serialize()?;
        Ok(RenameOutcome { data, plan })
    }

    fn finish(&self, archive: &mut Archive, extracted: Vec<Extracted>) -> Result<RenamePlan> {
        let plan = self.plan(extracted)?;
        plan.apply(archive);
        tracing::info!(
            "renamed {} entries ({} without a usable header)",
            plan.records.len(),
            plan.failures()
        );
        Ok(plan)
    }
}

/// Rename the file entries of an archive with default options.
pub fn rename_batch(mut archive: Archive) -> Result<Archive> {
    Renamer::default().rename_archive(&mut archive)?;
    Ok(archive)
}

/// Raw header standing in for an entry whose extraction failed: the file
/// name without directories and without a trailing `.docx`.
fn placeholder(original: &str) -> String {
    let file_name = original.rsplit('/').next().unwrap_or(original);
    let cut = file_name.len().saturating_sub(DOCX_EXTENSION.len());
    match file_name.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(DOCX_EXTENSION) => file_name[..cut].to_string(),
        _ => file_name.to_string(),
    }
}
