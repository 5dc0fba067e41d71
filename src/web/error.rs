//! HTTP error boundary for the web API.
//!
//! Per-document OCR failures never pass through here: batch endpoints
//! report them inside their 200 response, one outcome per document. This
//! type covers request-level problems only — malformed bodies, unknown
//! ids, an empty session.

use super::types::ErrorResponse;
use crate::error::Ocr2MdError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

#[derive(Debug)]
pub enum ApiError {
    /// The request itself is unusable (HTTP 400).
    Validation(String),
    /// The addressed resource does not exist (HTTP 404).
    NotFound(String),
    /// Something on our side broke (HTTP 500).
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<Ocr2MdError> for ApiError {
    fn from(error: Ocr2MdError) -> Self {
        match &error {
            Ocr2MdError::InvalidDocument { .. }
            | Ocr2MdError::InvalidUrl { .. }
            | Ocr2MdError::InvalidConfig(_)
            | Ocr2MdError::FileNotFound { .. } => Self::Validation(error.to_string()),
            Ocr2MdError::NothingToArchive => Self::NotFound(error.to_string()),
            _ => Self::Internal(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::Validation(m) => (StatusCode::BAD_REQUEST, "validation", m),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m),
            Self::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", m),
        };

        warn!("{} -> HTTP {}: {}", error_type, status.as_u16(), message);
        let body = ErrorResponse {
            error_type: error_type.to_string(),
            message,
            status_code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
