//! ZIP container abstraction for DOCX packages.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::io::{Cursor, Read};

/// The byte-order mark as a decoded code point.
pub const BOM: char = '\u{FEFF}';

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// Once UTF-16 XML has been decoded into a Rust String the declaration still
/// says encoding="UTF-16", which no longer describes the text handed to the
/// XML reader. A leading BOM is kept in place.
fn fix_xml_encoding_declaration(content: &str) -> String {
    let (bom, body) = match content.strip_prefix(BOM) {
        Some(rest) => (&content[..BOM.len_utf8()], rest),
        None => ("", content),
    };

    if body.starts_with("<?xml") {
        if let Some(end_decl) = body.find("?>") {
            let decl = &body[..end_decl + 2];
            let rest = &body[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}{}", bom, fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling UTF-8 and UTF-16 (LE/BE).
///
/// A byte-order mark is decoded along with the rest of the text, so the
/// result starts with [`BOM`] whenever the bytes carried one. Callers decide
/// how much of it to strip.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        let content = decode_utf16_le(bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let content = decode_utf16_be(bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    // UTF-8, with or without BOM
    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // UTF-16 without BOM has null bytes interleaved with ASCII
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16_le(bytes)
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16_be(bytes)
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

/// Decode UTF-16 Little Endian bytes to String.
fn decode_utf16_le(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;

    let u16_iter = (0..len)
        .step_by(2)
        .map(|i| u16::from_le_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::MalformedXml(e.to_string()))
}

/// Decode UTF-16 Big Endian bytes to String.
fn decode_utf16_be(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;

    let u16_iter = (0..len)
        .step_by(2)
        .map(|i| u16::from_be_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::MalformedXml(e.to_string()))
}

/// Read-only view over a DOCX package (itself a ZIP archive).
pub struct DocxPackage {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl DocxPackage {
    /// Open a package from a byte vector.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use redocx::container::DocxPackage;
    ///
    /// let data = std::fs::read("report.docx")?;
    /// let package = DocxPackage::from_bytes(data)?;
    /// # Ok::<(), redocx::Error>(())
    /// ```
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part from the package as a string.
    ///
    /// Handles different encodings:
    /// - UTF-8 (with or without BOM)
    /// - UTF-16 LE (with BOM: FF FE)
    /// - UTF-16 BE (with BOM: FE FF)
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_name(path).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => Error::MissingPart(path.to_string()),
            other => Error::from(other),
        })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| Error::ArchiveCorrupt(format!("{}: {}", path, e)))?;

        decode_xml_bytes(&bytes)
    }

    /// List all parts in the package.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }
}

impl std::fmt::Debug for DocxPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocxPackage")
            .field("files", &self.list_files().len())
            .finish()
    }
}
