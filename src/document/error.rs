//! Conversion error types
//!
//! Unified error handling for all document formats (RTF, DOCX).

use thiserror::Error;

/// Unified conversion error type
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Buffer matches neither the RTF nor the DOCX signature
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// `\ansicpg` (or the configured default) names a code page we cannot decode
    #[error("Unsupported code page: {0}")]
    UnsupportedCodePage(u32),

    /// DOCX container is readable but has no usable body
    #[error("DOCX extraction error: {0}")]
    Docx(String),

    /// DOCX container is not a valid ZIP archive
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed word/document.xml
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error while reading an archive member
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking extraction task panicked or was cancelled
    #[error("Task join error: {0}")]
    Task(String),
}

impl ConversionError {
    /// Whether the caller sent something we refuse to handle, as opposed
    /// to something going wrong while handling it
    pub fn is_client_error(&self) -> bool {
        matches!(self, ConversionError::UnsupportedFormat(_))
    }
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;
