//! In-memory outer archive: ordered entries that can be renamed and re-zipped.

use crate::error::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// One named object inside the outer archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name (unique within the archive)
    pub name: String,
    /// Uncompressed content
    pub data: Vec<u8>,
    /// Whether this is a directory entry
    pub is_dir: bool,
    /// Compression method the entry was stored with
    pub compression: CompressionMethod,
}

impl ArchiveEntry {
    /// Create a file entry, compressed with Deflate when serialized.
    pub fn file(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
            is_dir: false,
            compression: CompressionMethod::Deflated,
        }
    }
}

/// A ZIP archive loaded fully into memory, keeping container order.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an archive from bytes.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use redocx::archive::Archive;
    ///
    /// let data = std::fs::read("documents.zip")?;
    /// let archive = Archive::load(&data)?;
    /// println!("{} entries", archive.len());
    /// # Ok::<(), redocx::Error>(())
    /// ```
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut zip = zip::ZipArchive::new(Cursor::new(data))?;
        let mut entries = Vec::with_capacity(zip.len());

        for index in 0..zip.len() {
            let mut file = zip.by_index(index)?;
            let name = file.name().to_string();
            let mut data = Vec::new();
            file.read_to_end(&mut data)
                .map_err(|e| Error::ArchiveCorrupt(format!("{}: {}", name, e)))?;

            entries.push(ArchiveEntry {
                is_dir: file.is_dir(),
                compression: file.compression(),
                name,
                data,
            });
        }

        Ok(Self { entries })
    }

    /// Entries in container order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Number of entries, directories included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by name.
    pub fn get(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Remove an entry by name, returning it.
    pub fn remove(&mut self, name: &str) -> Option<ArchiveEntry> {
        let index = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(index))
    }

    /// Insert a file entry. An existing entry with the same name is replaced
    /// in place; otherwise the entry is appended.
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.insert_entry(ArchiveEntry::file(name, data));
    }

    /// Insert a prepared entry, with the same replacement rule as [`insert`](Self::insert).
    pub fn insert_entry(&mut self, entry: ArchiveEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Serialize the archive to ZIP bytes in entry order.
    ///
    /// Stored entries stay stored; everything else is written with Deflate.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            let method = match entry.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);

            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), options)?;
            } else {
                zip.start_file(entry.name.as_str(), options)?;
                zip.write_all(&entry.data)?;
            }
        }

        Ok(zip.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Archive {
        let mut archive = Archive::new();
        archive.insert("a.docx", b"alpha".to_vec());
        archive.insert_entry(ArchiveEntry {
            name: "docs/".to_string(),
            data: Vec::new(),
            is_dir: true,
            compression: CompressionMethod::Stored,
        });
        archive.insert_entry(ArchiveEntry {
            name: "docs/b.docx".to_string(),
            data: b"beta".to_vec(),
            is_dir: false,
            compression: CompressionMethod::Stored,
        });
        archive
    }

    #[test]
    fn test_serialize_and_load_keeps_order() {
        let bytes = sample().serialize().unwrap();
        let loaded = Archive::load(&bytes).unwrap();

        let names: Vec<&str> = loaded.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.docx", "docs/", "docs/b.docx"]);
        assert!(loaded.get("docs/").unwrap().is_dir);
        assert_eq!(loaded.get("a.docx").unwrap().data, b"alpha");
        assert_eq!(loaded.get("a.docx").unwrap().compression, CompressionMethod::Deflated);
        assert_eq!(
            loaded.get("docs/b.docx").unwrap().compression,
            CompressionMethod::Stored
        );
    }

    #[test]
    fn test_remove_and_insert() {
        let mut archive = sample();
        let removed = archive.remove("a.docx").unwrap();
        assert_eq!(removed.data, b"alpha");
        assert!(archive.remove("a.docx").is_none());
        assert_eq!(archive.len(), 2);

        archive.insert("c.docx", b"gamma".to_vec());
        archive.insert("c.docx", b"delta".to_vec());
        assert_eq!(archive.len(), 3);
        assert_eq!(archive.get("c.docx").unwrap().data, b"delta");
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(matches!(
            Archive::load(b"definitely not a zip"),
            Err(Error::ArchiveCorrupt(_))
        ));
    }

    #[test]
    fn test_empty_archive_round_trip() {
        let bytes = Archive::new().serialize().unwrap();
        assert!(Archive::load(&bytes).unwrap().is_empty());
    }
}
