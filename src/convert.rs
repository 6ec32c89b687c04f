//! Upload routing
//!
//! Picks the extractor for an uploaded buffer and runs it. RTF is claimed by
//! signature; everything else goes to DOCX when it looks like a ZIP archive
//! or the client declared the DOCX content type. Other buffers are handled
//! according to the configured [`UnknownFormatPolicy`].

use std::sync::Arc;

use axum::body::Bytes;

use crate::config::ConversionConfig;
use crate::document::{
    ConversionError, DocumentFormat, ExtractedDocument, Result, TextExtractor,
    UnknownFormatPolicy,
};
use crate::formats::{DocxExtractor, RtfExtractor};

/// Dispatches uploads to format extractors
#[derive(Clone)]
pub struct Converter {
    policy: UnknownFormatPolicy,
    rtf: Arc<dyn TextExtractor>,
    docx: Arc<dyn TextExtractor>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Converter {
    pub fn new(config: &ConversionConfig) -> Self {
        Self::with_extractors(
            config.unknown_format_policy,
            Arc::new(RtfExtractor::new(config.rtf_options())),
            Arc::new(DocxExtractor::new()),
        )
    }

    pub fn with_extractors(
        policy: UnknownFormatPolicy,
        rtf: Arc<dyn TextExtractor>,
        docx: Arc<dyn TextExtractor>,
    ) -> Self {
        Self { policy, rtf, docx }
    }

    /// Decide which extractor handles `data`
    pub fn route(&self, data: &[u8], content_type: Option<&str>) -> Result<DocumentFormat> {
        if let Some(format) = DocumentFormat::detect(data, content_type) {
            return Ok(format);
        }

        match self.policy {
            UnknownFormatPolicy::Rtf => {
                tracing::warn!(
                    "Unrecognized upload ({} bytes, content-type {:?}), treating as RTF",
                    data.len(),
                    content_type
                );
                Ok(DocumentFormat::Rtf)
            }
            UnknownFormatPolicy::Reject => Err(ConversionError::UnsupportedFormat(format!(
                "expected RTF or DOCX, got {} bytes of {}",
                data.len(),
                content_type.unwrap_or("unknown content")
            ))),
        }
    }

    /// Extract plain text from an upload
    pub async fn convert(
        &self,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<ExtractedDocument> {
        let format = self.route(&data, content_type)?;
        tracing::info!("Converting {} upload ({} bytes)", format, data.len());

        let extractor = match format {
            DocumentFormat::Rtf => &self.rtf,
            DocumentFormat::Docx => &self.docx,
        };
        let text = extractor.extract_text(data).await?;

        tracing::debug!("Extracted {} characters of {} text", text.chars().count(), format);
        Ok(ExtractedDocument { format, text })
    }
}
