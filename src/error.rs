//! Error types for the Docconv server

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::document::ConversionError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Request body error: {0}")]
    Body(#[from] BytesRejection),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Conversion(e) if e.is_client_error() => {
                tracing::warn!("Rejected upload: {}", e);
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_format", e.to_string())
            }
            AppError::Conversion(e) => {
                tracing::error!("Conversion failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "decoding_failure", e.to_string())
            }
            AppError::Body(rejection) => {
                tracing::warn!("Body rejected: {}", rejection);
                (rejection.status(), "invalid_body", rejection.body_text())
            }
        };

        (status, Json(ErrorResponse { error: message, code })).into_response()
    }
}
