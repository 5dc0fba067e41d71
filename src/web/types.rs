//! Web API request and response types, plus shared server state.

use crate::pipeline::ocr::OcrEngine;
use crate::session::SessionStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Request body size limit configuration.
///
/// The default (100 MB) covers typical scanned documents. Override it with
/// `OCR2MD_MAX_UPLOAD_MB` or programmatically via
/// [`create_router_with_limits`](super::create_router_with_limits).
#[derive(Debug, Clone, Copy)]
pub struct ApiSizeLimits {
    /// Maximum size of the entire request body in bytes, all files and
    /// form data combined. Oversized requests are rejected with HTTP 413.
    pub max_request_body_bytes: usize,
}

impl Default for ApiSizeLimits {
    fn default() -> Self {
        Self::from_mb(100)
    }
}

impl ApiSizeLimits {
    pub fn new(max_request_body_bytes: usize) -> Self {
        Self {
            max_request_body_bytes,
        }
    }

    pub fn from_mb(mb: usize) -> Self {
        Self::new(mb * 1024 * 1024)
    }
}

/// Shared server state: the OCR engine and the session's converted
/// documents.
///
/// The store is only ever locked briefly, after a conversion finishes or
/// while rendering a response. It is never held across an OCR call, so one
/// slow document cannot block the read endpoints.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn OcrEngine>,
    pub store: Arc<Mutex<SessionStore>>,
}

impl AppState {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            engine,
            store: Arc::new(Mutex::new(SessionStore::new())),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Request body for URL conversion: one URL per line, blank lines ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlsRequest {
    pub urls: String,
}

/// Outcome of converting one document in a batch.
///
/// A batch request always answers 200: individual failures are reported
/// here instead of failing the whole request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOutcome {
    /// Session id of the document (source URL or original filename).
    pub id: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConvertOutcome {
    pub fn succeeded(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ok: true,
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            id: id.into(),
            ok: false,
            error: Some(error.to_string()),
        }
    }
}

/// One converted document as listed by `GET /api/documents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: String,
    pub markdown: String,
}

/// Response of `DELETE /api/documents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    /// Number of documents that were removed.
    pub cleared: usize,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub status_code: u16,
}
