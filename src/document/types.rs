//! Core document types
//!
//! Format-agnostic types shared by the sniffer, the extractors and the
//! HTTP layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// RTF magic: every RTF document opens with `{\rtf`
pub const RTF_MAGIC: &[u8] = b"{\\rtf";

/// ZIP local file header magic (DOCX is a ZIP container)
pub const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// DOCX media type
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Rtf,
    Docx,
}

impl DocumentFormat {
    /// Detect format from magic bytes
    ///
    /// Returns `None` for anything that is neither RTF nor a ZIP container.
    /// Total and deterministic for every input, including empty buffers.
    pub fn from_magic_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(RTF_MAGIC) {
            return Some(Self::Rtf);
        }

        // Any ZIP is assumed to be DOCX; the extractor rejects archives
        // without word/document.xml
        if bytes.starts_with(ZIP_MAGIC) {
            return Some(Self::Docx);
        }

        None
    }

    /// Detect format from a declared MIME type
    ///
    /// Parameters (`; charset=...`) and case are ignored. Generic types
    /// such as `application/octet-stream` carry no signal.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            DOCX_MIME => Some(Self::Docx),
            "application/rtf" | "text/rtf" | "application/x-rtf" | "text/richtext" => {
                Some(Self::Rtf)
            }
            _ => None,
        }
    }

    /// Detect format from bytes, consulting the declared content type only
    /// when the magic prefix is inconclusive
    pub fn detect(bytes: &[u8], content_type: Option<&str>) -> Option<Self> {
        Self::from_magic_bytes(bytes).or_else(|| content_type.and_then(Self::from_mime))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rtf => "rtf",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a buffer whose format cannot be detected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFormatPolicy {
    /// Answer 415 Unsupported Media Type
    #[default]
    Reject,
    /// Run the RTF pipeline anyway and return whatever text survives
    Rtf,
}

impl FromStr for UnknownFormatPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "strict" => Ok(Self::Reject),
            "rtf" | "lenient" => Ok(Self::Rtf),
            other => Err(format!("unknown format policy '{}'", other)),
        }
    }
}

/// How aggressively interior whitespace is normalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitespacePolicy {
    /// Keep runs of spaces inside lines
    #[default]
    Preserve,
    /// Squeeze runs of two or more spaces into one (tabs are kept)
    Collapse,
}

impl FromStr for WhitespacePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "collapse" => Ok(Self::Collapse),
            other => Err(format!("unknown whitespace policy '{}'", other)),
        }
    }
}

/// Result of a successful conversion, serialized as the `/convert` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Format the text was extracted from
    #[serde(rename = "type")]
    pub format: DocumentFormat,
    /// Normalized plain text
    pub text: String,
}
