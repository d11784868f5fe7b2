//! First-paragraph header extraction from DOCX packages.

use crate::container::{DocxPackage, BOM};
use crate::error::{Error, Result};
use quick_xml::events::Event;

/// Path of the body document inside a DOCX package.
pub const BODY_DOCUMENT: &str = "word/document.xml";

/// Extract the header of a DOCX file: the text of its first paragraph.
///
/// The text of every `w:t` run inside the first `w:p` element is
/// concatenated verbatim. An empty string is a valid header.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("report.docx")?;
/// let header = redocx::extract_header(&data)?;
/// println!("{}", header);
/// # Ok::<(), redocx::Error>(())
/// ```
pub fn extract_header(data: &[u8]) -> Result<String> {
    let package = DocxPackage::from_bytes(data.to_vec())?;
    let xml = package.read_xml(BODY_DOCUMENT).map_err(|e| match e {
        Error::MissingPart(path) => Error::MissingBodyDocument(path),
        other => other,
    })?;

    let xml = xml.strip_prefix(BOM).unwrap_or(&xml);
    first_paragraph_text(xml)
}

/// Extract the text of the first `w:p` element of a body document.
///
/// The whole document is read so that malformed XML after the first
/// paragraph is still reported.
pub fn first_paragraph_text(xml: &str) -> Result<String> {
    // The reader silently skips a leading BOM, which would hide a second one
    if xml.starts_with(BOM) {
        return Err(Error::MalformedXml(
            "text outside the root element".to_string(),
        ));
    }

    let mut reader = quick_xml::Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut header = String::new();
    let mut depth: usize = 0;
    let mut root_seen = false;
    let mut found = false;
    // Open w:p elements while inside the first paragraph (0 once it closed)
    let mut para_depth: u32 = 0;
    // Open w:t elements inside the first paragraph
    let mut run_depth: u32 = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if depth == 0 && root_seen {
                    return Err(Error::MalformedXml("multiple root elements".to_string()));
                }
                root_seen = true;
                depth += 1;

                match e.name().as_ref() {
                    b"w:p" if !found => {
                        found = true;
                        para_depth = 1;
                    }
                    b"w:p" if para_depth > 0 => para_depth += 1,
                    b"w:t" if para_depth > 0 => run_depth += 1,
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 && root_seen {
                    return Err(Error::MalformedXml("multiple root elements".to_string()));
                }
                root_seen = true;

                // <w:p/> as the first paragraph yields an empty header
                if e.name().as_ref() == b"w:p" {
                    found = true;
                }
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);

                if para_depth > 0 {
                    match e.name().as_ref() {
                        b"w:t" => run_depth = run_depth.saturating_sub(1),
                        b"w:p" => para_depth -= 1,
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if depth == 0 {
                    if !e.iter().all(|b| b.is_ascii_whitespace()) {
                        return Err(Error::MalformedXml(
                            "text outside the root element".to_string(),
                        ));
                    }
                } else if run_depth > 0 {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::MalformedXml(err.to_string()))?;
                    header.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if run_depth > 0 {
                    header.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::MalformedXml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if !root_seen {
        return Err(Error::MalformedXml("no root element".to_string()));
    }
    if depth != 0 {
        return Err(Error::MalformedXml("unclosed element at end of document".to_string()));
    }
    if !found {
        return Err(Error::NoParagraphs);
    }

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn body(paragraphs: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            paragraphs
        )
    }

    fn docx_with_body(xml: &[u8]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(BODY_DOCUMENT, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_first_paragraph_only() {
        let xml = body(
            "<w:p><w:r><w:t>Quarterly</w:t></w:r><w:r><w:t xml:space=\"preserve\"> Report</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Second</w:t></w:r></w:p>",
        );
        assert_eq!(first_paragraph_text(&xml).unwrap(), "Quarterly Report");
    }

    #[test]
    fn test_whitespace_preserved() {
        let xml = body("<w:p><w:r><w:t>  Padded  </w:t></w:r></w:p>");
        assert_eq!(first_paragraph_text(&xml).unwrap(), "  Padded  ");
    }

    #[test]
    fn test_empty_runs_and_empty_paragraph() {
        let xml = body("<w:p><w:r><w:t/></w:r><w:r><w:t></w:t></w:r></w:p>");
        assert_eq!(first_paragraph_text(&xml).unwrap(), "");

        let xml = body("<w:p/><w:p><w:r><w:t>Later</w:t></w:r></w:p>");
        assert_eq!(first_paragraph_text(&xml).unwrap(), "");
    }

    #[test]
    fn test_text_outside_runs_ignored() {
        let xml = body(
            "<w:p><w:pPr><w:pStyle w:val=\"Title\"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Title</w:t></w:r></w:p>",
        );
        assert_eq!(first_paragraph_text(&xml).unwrap(), "Title");
    }

    #[test]
    fn test_nested_paragraph_runs_included() {
        let xml = body(
            "<w:p><w:r><w:t>Outer</w:t></w:r><w:r><w:txbxContent><w:p><w:r><w:t>Inner</w:t></w:r></w:p></w:txbxContent></w:r><w:r><w:t>End</w:t></w:r></w:p>",
        );
        assert_eq!(first_paragraph_text(&xml).unwrap(), "OuterInnerEnd");
    }

    #[test]
    fn test_entities_and_cdata() {
        let xml = body("<w:p><w:r><w:t>R&amp;D &quot;Plan&quot;</w:t><w:t><![CDATA[ <x>]]></w:t></w:r></w:p>");
        assert_eq!(first_paragraph_text(&xml).unwrap(), "R&D \"Plan\" <x>");
    }

    #[test]
    fn test_no_paragraphs() {
        let xml = body("<w:tbl/>");
        assert!(matches!(first_paragraph_text(&xml), Err(Error::NoParagraphs)));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            first_paragraph_text("<w:document><w:body><w:p></w:body></w:document>"),
            Err(Error::MalformedXml(_))
        ));
        assert!(matches!(
            first_paragraph_text("<w:document><w:body><w:p></w:p>"),
            Err(Error::MalformedXml(_))
        ));
        assert!(matches!(first_paragraph_text(""), Err(Error::MalformedXml(_))));
        assert!(matches!(
            first_paragraph_text("<w:document/><w:document/>"),
            Err(Error::MalformedXml(_))
        ));
        assert!(matches!(
            first_paragraph_text("<w:document><w:p><w:t>&bogus;</w:t></w:p></w:document>"),
            Err(Error::MalformedXml(_))
        ));
    }

    #[test]
    fn test_leading_bom_is_text_outside_root() {
        let xml = "\u{FEFF}<w:document><w:body><w:p><w:r><w:t>Bom</w:t></w:r></w:p></w:body></w:document>";
        assert!(matches!(
            first_paragraph_text(xml),
            Err(Error::MalformedXml(_))
        ));
    }

    #[test]
    fn test_extract_header_from_package() {
        let xml = body("<w:p><w:r><w:t>Minutes</w:t></w:r></w:p>");
        let data = docx_with_body(xml.as_bytes());
        assert_eq!(extract_header(&data).unwrap(), "Minutes");
    }

    #[test]
    fn test_single_bom_stripped() {
        let xml = body("<w:p><w:r><w:t>Bom</w:t></w:r></w:p>");

        let mut with_bom = b"\xEF\xBB\xBF".to_vec();
        with_bom.extend_from_slice(xml.as_bytes());
        assert_eq!(extract_header(&docx_with_body(&with_bom)).unwrap(), "Bom");

        let mut two_boms = b"\xEF\xBB\xBF\xEF\xBB\xBF".to_vec();
        two_boms.extend_from_slice(xml.as_bytes());
        assert!(matches!(
            extract_header(&docx_with_body(&two_boms)),
            Err(Error::MalformedXml(_))
        ));
    }

    #[test]
    fn test_utf16_body_document() {
        let xml = body("<w:p><w:r><w:t>Wide</w:t></w:r></w:p>")
            .replace("encoding=\"UTF-8\"", "encoding=\"UTF-16\"");
        let mut bytes = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(extract_header(&docx_with_body(&bytes)).unwrap(), "Wide");
    }

    #[test]
    fn test_missing_body_document() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<Types/>").unwrap();
        let data = zip.finish().unwrap().into_inner();

        assert!(matches!(
            extract_header(&data),
            Err(Error::MissingBodyDocument(p)) if p == BODY_DOCUMENT
        ));
    }

    #[test]
    fn test_not_a_package() {
        assert!(matches!(
            extract_header(b"not a zip"),
            Err(Error::ArchiveCorrupt(_))
        ));
    }
}
