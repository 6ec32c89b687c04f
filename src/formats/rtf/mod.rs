//! RTF to plain text
//!
//! A four-stage pipeline over the raw upload bytes:
//!
//! ```text
//! raw bytes ─▶ strip_groups ─▶ decode_escapes ─▶ strip_control_words ─▶ normalize
//!   (&[u8])      (Vec<u8>)        (String)             (String)            (String)
//! ```
//!
//! Everything before escape decoding works on bytes, so `\'hh` escapes and
//! raw 8-bit text reach the decoder untouched. Each stage takes the whole
//! output of the previous one and can be tested on its own.
//!
//! Malformed markup never fails the pipeline. The only error is an `\'hh`
//! escape (or raw 8-bit byte) under a code page without a decoder.

mod codepage;
mod control;
mod escapes;
mod groups;
mod lex;
mod normalize;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::document::{ConversionError, Result, TextExtractor, WhitespacePolicy};

pub use codepage::{CodePage, DEFAULT_CODEPAGE};
pub use control::strip_control_words;
pub use escapes::decode_escapes;
pub use groups::{default_ignored_destinations, strip_groups, DEFAULT_IGNORED_DESTINATIONS};
pub use normalize::normalize;

/// RTF pipeline settings, fixed at start-up
#[derive(Debug, Clone)]
pub struct RtfOptions {
    /// Code page for documents without `\ansicpg`
    pub default_codepage: u32,
    /// Destination keywords (lower case) whose groups are dropped
    pub ignored_destinations: HashSet<String>,
    /// Interior whitespace handling
    pub whitespace: WhitespacePolicy,
}

impl Default for RtfOptions {
    fn default() -> Self {
        Self {
            default_codepage: DEFAULT_CODEPAGE,
            ignored_destinations: default_ignored_destinations(),
            whitespace: WhitespacePolicy::default(),
        }
    }
}

impl RtfOptions {
    /// Add destination keywords to the ignore-set
    pub fn with_extra_destinations<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_destinations.extend(
            extra
                .into_iter()
                .map(|s| s.as_ref().trim().trim_start_matches('\\').to_ascii_lowercase())
                .filter(|s| !s.is_empty()),
        );
        self
    }
}

/// Convert an RTF document to plain text
pub fn rtf_to_text(src: &[u8], options: &RtfOptions) -> Result<String> {
    let codepage = CodePage::resolve(src, options.default_codepage);
    let stripped = strip_groups(src, &options.ignored_destinations);
    let decoded = decode_escapes(&stripped, codepage)?;
    let plain = strip_control_words(&decoded);
    Ok(normalize(&plain, options.whitespace))
}

/// RTF implementation of [`TextExtractor`]
#[derive(Debug, Clone, Default)]
pub struct RtfExtractor {
    options: Arc<RtfOptions>,
}

impl RtfExtractor {
    pub fn new(options: RtfOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }
}

#[async_trait]
impl TextExtractor for RtfExtractor {
    async fn extract_text(&self, data: Bytes) -> Result<String> {
        let options = self.options.clone();

        // Offload to blocking task since the pipeline is CPU-bound
        tokio::task::spawn_blocking(move || rtf_to_text(&data, &options))
            .await
            .map_err(|e| ConversionError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_text(src: &str) -> String {
        rtf_to_text(src.as_bytes(), &RtfOptions::default()).unwrap()
    }

    #[test]
    fn test_paragraph_marks_normalized_away() {
        assert_eq!(to_text("{\\rtf1\\ansicpg1251\\par Hello\\par}"), "Hello");
    }

    #[test]
    fn test_font_table_removed() {
        assert_eq!(to_text("{\\fonttbl{\\f0 Arial;}}{\\rtf1 Text here}"), "Text here");
    }

    #[test]
    fn test_cyrillic_hex_escapes() {
        let src = "{\\rtf1\\ansi\\ansicpg1251\\deff0{\\fonttbl{\\f0\\fcharset204 Arial;}}\
                   \\pard\\f0\\fs24 \\'cf\\'f0\\'e8\\'e2\\'e5\\'f2, \\'ec\\'e8\\'f0!\\par}";
        assert_eq!(to_text(src), "Привет, мир!");
    }

    #[test]
    fn test_default_code_page_used_without_declaration() {
        let src = b"{\\rtf1\\ansi caf\\'e9}";
        let western = RtfOptions {
            default_codepage: 1252,
            ..RtfOptions::default()
        };
        assert_eq!(rtf_to_text(src, &western).unwrap(), "café");
        // Stock default is cp1251
        assert_eq!(rtf_to_text(src, &RtfOptions::default()).unwrap(), "cafй");
    }

    #[test]
    fn test_literal_braces_preserved() {
        assert_eq!(
            to_text("{\\rtf1 use \\{curly\\} braces and a \\\\ backslash\\par}"),
            "use {curly} braces and a \\ backslash"
        );
    }

    #[test]
    fn test_unicode_document() {
        let src = "{\\rtf1\\ansi\\ansicpg1252\\uc1 \\u26085?\\u26412?\\u-10179?\\u-8704? ok}";
        assert_eq!(to_text(src), "日本\u{1F600} ok");
    }

    #[test]
    fn test_wordpad_style_document() {
        let src = "{\\rtf1\\ansi\\ansicpg1252\\deff0\\nouicompat\\deflang1033\
                   {\\fonttbl{\\f0\\fnil\\fcharset0 Calibri;}}\r\n\
                   {\\colortbl ;\\red255\\green0\\blue0;}\r\n\
                   {\\*\\generator Riched20 10.0.19041}\\viewkind4\\uc1 \r\n\
                   \\pard\\sa200\\sl276\\slmult1\\cf1\\f0\\fs22\\lang9 First line\\par\r\n\
                   Second\\tab column\\par\r\n\
                   \\par\r\n\
                   \\par\r\n\
                   Last\\par\r\n\
                   }\r\n";
        assert_eq!(to_text(src), "First line\nSecond\tcolumn\n\nLast");
    }

    #[test]
    fn test_metadata_groups_removed() {
        let src = "{\\rtf1{\\info{\\title Secret}{\\author Someone}}\
                   {\\header {\\b Page header}}{\\footer Footer text}\
                   {\\pict\\pngblip 89504e47}Body}";
        assert_eq!(to_text(src), "Body");
    }

    #[test]
    fn test_escaped_text_after_formatting_word() {
        assert_eq!(to_text("{\\rtf1\\ansicpg1252 \\b\\'41BC\\b0}"), "ABC");
        assert_eq!(to_text("{\\rtf1 x\\i\\u65?bc\\i0}"), "xAbc");
        assert_eq!(to_text("{\\rtf1\\ansicpg1252 a\\b\\'20b}"), "a b");
    }

    #[test]
    fn test_unicode_skip_count_is_group_local() {
        assert_eq!(to_text("{\\rtf1 {\\uc0 \\u1046}\\u1047?x}"), "\u{416}\u{417}x");
    }

    #[test]
    fn test_extra_destinations() {
        let options = RtfOptions::default().with_extra_destinations([" \\FldInst ", ""]);
        assert!(options.ignored_destinations.contains("fldinst"));
        assert!(!options.ignored_destinations.contains(""));
        let src = b"{\\rtf1{\\field{\\fldinst HYPERLINK x}{\\fldrslt Link}}}";
        assert_eq!(rtf_to_text(src, &options).unwrap(), "Link");
    }

    #[test]
    fn test_malformed_input_degrades() {
        assert_eq!(to_text("{\\rtf1 unterminated {\\b bold"), "unterminated bold");
        assert_eq!(to_text("}}{\\rtf1 extra}}}"), "extra");
        assert_eq!(to_text("{\\rtf1 trunc\\'4"), "trunc4");
        assert_eq!(to_text(""), "");
    }

    #[test]
    fn test_unsupported_declared_code_page() {
        let err = rtf_to_text(b"{\\rtf1\\ansicpg437 \\'82}", &RtfOptions::default()).unwrap_err();
        assert!(matches!(err, ConversionError::UnsupportedCodePage(437)));
    }

    #[test]
    fn test_collapse_policy() {
        let options = RtfOptions {
            whitespace: WhitespacePolicy::Collapse,
            ..RtfOptions::default()
        };
        assert_eq!(rtf_to_text(b"{\\rtf1 a  {\\b  } b}", &options).unwrap(), "a b");
    }

    #[tokio::test]
    async fn test_extractor_runs_pipeline() {
        let extractor = RtfExtractor::default();
        let text = extractor
            .extract_text(Bytes::from_static(b"{\\rtf1 Hello\\par World}"))
            .await
            .unwrap();
        assert_eq!(text, "Hello\nWorld");
    }
}
