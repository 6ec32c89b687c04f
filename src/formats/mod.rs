//! Format-specific text extraction
//!
//! Each format module provides an implementation of the
//! [`TextExtractor`](crate::document::TextExtractor) trait defined in the
//! `document` module, plus the synchronous function doing the actual work
//! so it can be tested and benchmarked without a runtime.

pub mod docx;
pub mod rtf;

pub use docx::DocxExtractor;
pub use rtf::{RtfExtractor, RtfOptions};
