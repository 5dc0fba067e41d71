//! Inline encoding: PDF bytes → base64 data URI.
//!
//! The OCR endpoint's `document_url` field accepts `data:` URIs as well as
//! HTTP URLs, so a local file can be inlined straight into the request body
//! instead of going through the upload exchange. This is the transport
//! behind [`crate::config::UploadStrategy::DataUri`]; the default signed-URL
//! strategy never calls into this module.

use crate::error::Ocr2MdError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

/// Prefix of an inlined PDF document URI.
pub const PDF_DATA_URI_PREFIX: &str = "data:application/pdf;base64,";

/// Wrap raw PDF bytes in a `data:application/pdf;base64,…` URI.
pub fn bytes_to_data_uri(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded {} bytes → {} bytes base64", bytes.len(), b64.len());
    format!("{PDF_DATA_URI_PREFIX}{b64}")
}

/// Read a local PDF and wrap it in a data URI.
pub async fn file_to_data_uri(path: &Path) -> Result<String, Ocr2MdError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Ocr2MdError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Ocr2MdError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    Ok(bytes_to_data_uri(&bytes))
}
