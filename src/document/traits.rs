//! Document traits
//!
//! Format-agnostic interface for text extraction.

use async_trait::async_trait;
use axum::body::Bytes;

use super::error::Result;

/// Format-specific plain text extractor
///
/// Implementations own the whole path from raw upload bytes to the final
/// normalized text. The orchestrator only decides which one to call.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from the raw document bytes
    async fn extract_text(&self, data: Bytes) -> Result<String>;
}
