//! Unified document abstraction
//!
//! Format detection and the extractor interface shared by RTF and DOCX.
//!
//! # Architecture
//!
//! ```text
//!                  POST /convert (raw bytes)
//!                            │
//!                            ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │                     Converter                        │
//!   │   DocumentFormat::detect → UnknownFormatPolicy       │
//!   └─────────────────────────────────────────────────────┘
//!                            │
//!           ┌────────────────┴────────────────┐
//!           ▼                                 ▼
//!   ┌──────────────┐                  ┌──────────────┐
//!   │ RtfExtractor │                  │ DocxExtractor│
//!   │ strip→decode │                  │ zip + xml    │
//!   │ →words→norm  │                  │              │
//!   └──────────────┘                  └──────────────┘
//! ```

mod error;
mod traits;
mod types;

pub use error::{ConversionError, Result};
pub use traits::TextExtractor;
pub use types::{
    DocumentFormat, ExtractedDocument, UnknownFormatPolicy, WhitespacePolicy, DOCX_MIME,
    RTF_MAGIC, ZIP_MAGIC,
};
