//! Conversion endpoint
//!
//! `POST /convert` takes the raw document as the request body and answers
//! with `{"type": "rtf" | "docx", "text": "..."}`.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};

use crate::document::ExtractedDocument;
use crate::error::Result;
use crate::state::AppState;

/// Create the conversion router
pub fn router() -> Router<AppState> {
    Router::new().route("/convert", post(convert_document))
}

/// Convert an uploaded RTF or DOCX document to plain text
async fn convert_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<ExtractedDocument>> {
    let data = body?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let document = state.converter().convert(data, content_type).await?;
    Ok(Json(document))
}
