//! Web API request handlers.

use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::{info, warn};

use super::error::ApiError;
use super::types::{
    AppState, ClearResponse, ConvertOutcome, DocumentEntry, HealthResponse, UrlsRequest,
};
use crate::archive::{build_archive, markdown_filename, ARCHIVE_FILENAME};
use crate::convert::{convert, convert_from_bytes};
use crate::pipeline::input::validate_remote_url;

/// Browser UI, served at `/`. The page is embedded at compile time so the
/// binary is self-contained.
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// File conversion endpoint handler.
///
/// POST /api/convert/files
///
/// Accepts multipart form data with one or more `files` fields. Documents
/// are converted in order, one at a time, and each outcome is reported
/// individually: a document that fails OCR does not fail the batch and is
/// not stored. The request body as a whole is capped at the router layer
/// (HTTP 413 when exceeded).
pub async fn convert_files_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<ConvertOutcome>>, ApiError> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "files" {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("failed to read '{file_name}': {e}")))?;
        files.push((file_name, data.to_vec()));
    }

    if files.is_empty() {
        return Err(ApiError::validation("No files provided for conversion"));
    }

    let mut outcomes = Vec::with_capacity(files.len());
    for (filename, bytes) in files {
        match convert_from_bytes(&bytes, &filename, state.engine.as_ref()).await {
            Ok(markdown) => {
                state.store.lock().await.put(&filename, markdown);
                outcomes.push(ConvertOutcome::succeeded(filename));
            }
            Err(e) => {
                warn!("Conversion of '{}' failed: {}", filename, e);
                outcomes.push(ConvertOutcome::failed(filename, e));
            }
        }
    }

    Ok(Json(outcomes))
}

/// URL conversion endpoint handler.
///
/// POST /api/convert/urls
///
/// Takes `{"urls": "<one URL per line>"}`. Blank lines are skipped;
/// every remaining line produces one outcome. A line that is not a valid
/// HTTP(S) URL fails its own outcome without touching the API.
pub async fn convert_urls_handler(
    State(state): State<AppState>,
    Json(request): Json<UrlsRequest>,
) -> Result<Json<Vec<ConvertOutcome>>, ApiError> {
    let urls: Vec<String> = request
        .urls
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if urls.is_empty() {
        return Err(ApiError::validation("No URLs provided for conversion"));
    }

    let mut outcomes = Vec::with_capacity(urls.len());
    for url in urls {
        if let Err(e) = validate_remote_url(&url) {
            warn!("Rejected URL '{}': {}", url, e);
            outcomes.push(ConvertOutcome::failed(url, e));
            continue;
        }

        match convert(&url, state.engine.as_ref()).await {
            Ok(markdown) => {
                state.store.lock().await.put(&url, markdown);
                outcomes.push(ConvertOutcome::succeeded(url));
            }
            Err(e) => {
                warn!("Conversion of '{}' failed: {}", url, e);
                outcomes.push(ConvertOutcome::failed(url, e));
            }
        }
    }

    Ok(Json(outcomes))
}

/// Document listing endpoint handler.
///
/// GET /api/documents
///
/// Returns every converted document of the session in submission order.
pub async fn list_documents_handler(State(state): State<AppState>) -> Json<Vec<DocumentEntry>> {
    let store = state.store.lock().await;
    let documents = store
        .iter()
        .map(|(id, markdown)| DocumentEntry {
            id: id.to_string(),
            markdown: markdown.to_string(),
        })
        .collect();
    Json(documents)
}

/// Single document download endpoint handler.
///
/// GET /api/documents/{id}/download
///
/// The id must be percent-encoded by the caller when it is a URL. The
/// response carries the markdown as an attachment named after the
/// document's stem.
pub async fn download_document_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let markdown = {
        let store = state.store.lock().await;
        store
            .get(&id)
            .map(str::to_owned)
            .ok_or_else(|| ApiError::not_found(format!("no converted document with id '{id}'")))?
    };

    let filename = markdown_filename(&id);
    let headers = [
        (
            header::CONTENT_TYPE,
            "text/markdown; charset=utf-8".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, markdown).into_response())
}

/// Bulk archive endpoint handler.
///
/// GET /api/archive
///
/// Zips every converted document into `converted_documents.zip`. An empty
/// session answers 404 rather than an empty archive.
pub async fn archive_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let bytes = {
        let store = state.store.lock().await;
        build_archive(&store)?
    };

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{ARCHIVE_FILENAME}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// Session reset endpoint handler.
///
/// DELETE /api/documents
///
/// Removes every converted document. Idempotent: clearing an empty
/// session succeeds with `cleared: 0`.
pub async fn clear_documents_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut store = state.store.lock().await;
    let cleared = store.len();
    store.clear();
    if cleared > 0 {
        info!("Cleared {} documents from the session", cleared);
    }
    Json(ClearResponse { cleared })
}
