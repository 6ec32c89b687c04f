//! DOCX to plain text
//!
//! Opens the OOXML container and walks `word/document.xml` with a streaming
//! XML reader. Only run text is kept: tracked deletions, field instructions,
//! tab stop definitions and every kind of property element are skipped.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use axum::body::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::document::{ConversionError, Result, TextExtractor};

/// Main document part inside the container
const DOCUMENT_PART: &str = "word/document.xml";

/// Separator written after every paragraph
const PARAGRAPH_BREAK: &str = "\n\n";

/// DOCX implementation of [`TextExtractor`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for DocxExtractor {
    async fn extract_text(&self, data: Bytes) -> Result<String> {
        // Offload to blocking task since inflating and parsing are CPU-bound
        tokio::task::spawn_blocking(move || docx_to_text(&data))
            .await
            .map_err(|e| ConversionError::Task(e.to_string()))?
    }
}

/// Extract the body text of a DOCX file held in memory
pub fn docx_to_text(data: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let xml = {
        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
            ZipError::FileNotFound => {
                ConversionError::Docx(format!("Missing {} in archive", DOCUMENT_PART))
            }
            other => ConversionError::Zip(other),
        })?;

        let mut content = String::new();
        part.read_to_string(&mut content)?;
        content
    };

    document_xml_to_text(&xml)
}

/// Extract text from the contents of `word/document.xml`
pub fn document_xml_to_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" if in_run => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:p" => out.push_str(PARAGRAPH_BREAK),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                // Run-level only; `w:tab` inside `w:tabs` is a tab stop
                b"w:tab" if in_run => out.push('\t'),
                b"w:br" | b"w:cr" if in_run => out.push('\n'),
                b"w:noBreakHyphen" if in_run => out.push('-'),
                b"w:p" => out.push_str(PARAGRAPH_BREAK),
                _ => {}
            },
            Event::Text(e) if in_text => out.push_str(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    let trimmed_len = out.trim_end_matches('\n').len();
    out.truncate(trimmed_len);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn wrap_body(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs() {
        let xml = wrap_body(
            "<w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space=\"preserve\"> world</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Second</w:t></w:r></w:p>",
        );
        assert_eq!(document_xml_to_text(&xml).unwrap(), "Hello world\n\nSecond");
    }

    #[test]
    fn test_tabs_breaks_and_tab_stops() {
        let xml = wrap_body(
            "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr>\
             <w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>",
        );
        assert_eq!(document_xml_to_text(&xml).unwrap(), "a\tb\nc");
    }

    #[test]
    fn test_entities_unescaped() {
        let xml = wrap_body("<w:p><w:r><w:t>Fish &amp; Chips &lt;3</w:t></w:r></w:p>");
        assert_eq!(document_xml_to_text(&xml).unwrap(), "Fish & Chips <3");
    }

    #[test]
    fn test_deleted_text_and_field_codes_skipped() {
        let xml = wrap_body(
            "<w:p><w:del><w:r><w:delText>gone</w:delText></w:r></w:del>\
             <w:r><w:instrText> PAGE </w:instrText></w:r>\
             <w:r><w:t>kept</w:t></w:r></w:p>",
        );
        assert_eq!(document_xml_to_text(&xml).unwrap(), "kept");
    }

    #[test]
    fn test_empty_paragraphs_keep_spacing() {
        let xml = wrap_body("<w:p><w:r><w:t>a</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>b</w:t></w:r></w:p>");
        assert_eq!(document_xml_to_text(&xml).unwrap(), "a\n\n\n\nb");
    }

    #[test]
    fn test_docx_container() {
        let xml = wrap_body("<w:p><w:r><w:t>Привет из DOCX</w:t></w:r></w:p>");
        let data = build_docx(&[("[Content_Types].xml", "<Types/>"), (DOCUMENT_PART, xml.as_str())]);
        assert_eq!(docx_to_text(&data).unwrap(), "Привет из DOCX");
    }

    #[test]
    fn test_missing_document_part() {
        let data = build_docx(&[("word/styles.xml", "<w:styles/>")]);
        let err = docx_to_text(&data).unwrap_err();
        assert!(matches!(err, ConversionError::Docx(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = docx_to_text(b"PK\x03\x04 definitely not a zip").unwrap_err();
        assert!(matches!(err, ConversionError::Zip(_)));
    }

    #[tokio::test]
    async fn test_extractor() {
        let xml = wrap_body("<w:p><w:r><w:t>async</w:t></w:r></w:p>");
        let data = build_docx(&[(DOCUMENT_PART, xml.as_str())]);
        let extractor = DocxExtractor::new();
        assert_eq!(extractor.extract_text(Bytes::from(data)).await.unwrap(), "async");
    }
}
