//! Mistral OCR interaction: wire types, the engine trait, and the client.
//!
//! ## Two ways into the service
//!
//! The OCR endpoint only ever consumes a URL. Remote documents are submitted
//! verbatim — the service downloads them itself, so their bytes never pass
//! through this process. Local files are first turned into something the
//! service can fetch: by default an upload to `/v1/files` followed by a
//! signed-URL exchange, or (opt-in) an inline base64 data URI.
//!
//! ## Error policy
//!
//! Every remote failure is logged with context and propagated unchanged.
//! There is no retry layer: the caller decides whether a transient error is
//! worth resubmitting ([`crate::error::Ocr2MdError::is_transient`]), and a
//! batch driver reports each document's outcome individually.

use crate::config::{OcrConfig, UploadStrategy};
use crate::error::Ocr2MdError;
use crate::pipeline::encode;
use crate::pipeline::input::{self, DocumentSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

// ── Wire types ───────────────────────────────────────────────────────────

/// The `document` field of an OCR request. The service expects a tagged
/// object: `{"type": "document_url", "document_url": "…"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentRef {
    DocumentUrl { document_url: String },
}

/// Body of `POST /v1/ocr`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrRequest {
    pub model: String,
    pub document: DocumentRef,
    pub include_image_base64: bool,
}

/// One page of the OCR result. `markdown` is the field the assembler
/// consumes and it is mandatory — a page without it fails deserialisation
/// (surfaced by the client as [`Ocr2MdError::UnexpectedResponse`]) instead
/// of assembling into a silently empty page. `index` and `images` ride
/// along so responses round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrPage {
    #[serde(default)]
    pub index: usize,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<OcrImage>,
}

/// An image embedded in a page, returned when `include_image_base64` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrImage {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

/// Usage accounting attached to the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageInfo {
    #[serde(default)]
    pub pages_processed: Option<u32>,
    #[serde(default)]
    pub doc_size_bytes: Option<u64>,
}

/// Full OCR response. Page order in `pages` is significant: it is the
/// document's reading order and the assembler preserves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub pages: Vec<OcrPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_info: Option<UsageInfo>,
}

/// Upload acknowledgement from `POST /v1/files`.
#[derive(Debug, Deserialize)]
struct UploadedFile {
    id: String,
}

/// Signed download URL from `GET /v1/files/{id}/url`.
#[derive(Debug, Deserialize)]
struct SignedUrl {
    url: String,
}

// ── Engine trait ─────────────────────────────────────────────────────────

/// The OCR seam: everything above this trait (conversion entry points, web
/// handlers, CLI) is testable against a scripted implementation.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Run OCR over one document and return the page-structured response.
    async fn process(&self, source: &DocumentSource) -> Result<OcrResponse, Ocr2MdError>;
}

// ── Mistral client ───────────────────────────────────────────────────────

/// Production [`OcrEngine`] speaking to the Mistral API.
pub struct MistralOcr {
    http: reqwest::Client,
    config: OcrConfig,
}

impl MistralOcr {
    /// Build a client from an explicit configuration.
    pub fn new(config: OcrConfig) -> Result<Self, Ocr2MdError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Ocr2MdError::Internal(format!("HTTP client construction: {e}")))?;
        Ok(Self { http, config })
    }

    /// Build a client from `MISTRAL_API_KEY` and defaults.
    pub fn from_env() -> Result<Self, Ocr2MdError> {
        Self::new(OcrConfig::from_env()?)
    }

    /// The effective configuration.
    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Upload a local file and exchange its id for a signed download URL.
    ///
    /// Two requests: `POST /v1/files` (multipart, `purpose=ocr`) and
    /// `GET /v1/files/{id}/url?expiry=<hours>`. The signed URL is what the
    /// OCR run actually reads — the raw bytes are never sent to `/v1/ocr`.
    async fn upload_and_sign(&self, path: &Path) -> Result<String, Ocr2MdError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or_else(|| Ocr2MdError::InvalidDocument {
                detail: format!("no file name in '{}'", path.display()),
            })?;

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

        let upload_url = format!("{}/v1/files", self.config.base_url);
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.clone())
            .mime_str("application/pdf")
            .map_err(|e| Ocr2MdError::Internal(format!("multipart part: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .text("purpose", "ocr")
            .part("file", part);

        let response = self
            .http
            .post(&upload_url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| http_error(&upload_url, e))?;
        let response = check_status(response).await?;

        let uploaded: UploadedFile = response
            .json()
            .await
            .map_err(|e| unexpected_response("upload acknowledgement", e))?;
        debug!("Uploaded '{}' as file id {}", filename, uploaded.id);

        let sign_url = format!("{}/v1/files/{}/url", self.config.base_url, uploaded.id);
        let response = self
            .http
            .get(&sign_url)
            .query(&[("expiry", self.config.signed_url_expiry_hours)])
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| http_error(&sign_url, e))?;
        let response = check_status(response).await?;

        let signed: SignedUrl = response
            .json()
            .await
            .map_err(|e| unexpected_response("signed URL", e))?;
        debug!("Signed URL minted for file id {}", uploaded.id);

        Ok(signed.url)
    }

    /// Submit one OCR request against an already-reachable document URL.
    async fn run_ocr(&self, document_url: String) -> Result<OcrResponse, Ocr2MdError> {
        let url = format!("{}/v1/ocr", self.config.base_url);
        let request = OcrRequest {
            model: self.config.model.clone(),
            document: DocumentRef::DocumentUrl { document_url },
            include_image_base64: self.config.include_images,
        };

        debug!("Submitting OCR request (model {})", request.model);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| http_error(&url, e))?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| unexpected_response("OCR result", e))
    }
}

#[async_trait]
impl OcrEngine for MistralOcr {
    async fn process(&self, source: &DocumentSource) -> Result<OcrResponse, Ocr2MdError> {
        validate_source(source)?;
        let start = Instant::now();

        let document_url = match source {
            DocumentSource::Url(url) => url.trim().to_string(),
            DocumentSource::File(path) => match self.config.upload_strategy {
                UploadStrategy::SignedUrl => self.upload_and_sign(path).await?,
                UploadStrategy::DataUri => encode::file_to_data_uri(path).await?,
            },
        };

        let response = self.run_ocr(document_url).await?;
        info!(
            "OCR of '{}' finished in {}ms ({} pages)",
            source.display_name(),
            start.elapsed().as_millis(),
            response.pages.len()
        );
        Ok(response)
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Reject unusable document references before any network activity.
fn validate_source(source: &DocumentSource) -> Result<(), Ocr2MdError> {
    match source {
        DocumentSource::Url(url) => input::validate_remote_url(url),
        DocumentSource::File(path) => {
            if path.as_os_str().is_empty() {
                return Err(Ocr2MdError::InvalidDocument {
                    detail: "empty file path".into(),
                });
            }
            if path.file_name().is_none() {
                return Err(Ocr2MdError::InvalidDocument {
                    detail: format!("no file name in '{}'", path.display()),
                });
            }
            Ok(())
        }
    }
}

fn http_error(url: &str, source: reqwest::Error) -> Ocr2MdError {
    error!("Request to '{}' failed: {}", url, source);
    Ocr2MdError::Http {
        url: url.to_string(),
        source,
    }
}

fn unexpected_response(what: &str, source: reqwest::Error) -> Ocr2MdError {
    error!("Failed to decode {}: {}", what, source);
    Ocr2MdError::UnexpectedResponse {
        detail: format!("{what}: {source}"),
    }
}

/// Turn a non-2xx response into [`Ocr2MdError::Api`], preferring the
/// service's own `message` field over the raw body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Ocr2MdError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_string()
            } else {
                trimmed.chars().take(300).collect()
            }
        });

    error!("Mistral API returned HTTP {}: {}", status.as_u16(), message);
    Err(Ocr2MdError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn test_config() -> OcrConfig {
        // Port 9 (discard) is not routable; any accidental network call in a
        // validation test would surface as Http, not InvalidDocument.
        OcrConfig::builder()
            .api_key("sk-test")
            .base_url("http://127.0.0.1:9")
            .build()
            .expect("valid config")
    }

    #[test]
    fn ocr_request_matches_wire_shape() {
        let request = OcrRequest {
            model: "mistral-ocr-latest".into(),
            document: DocumentRef::DocumentUrl {
                document_url: "https://example.com/test.pdf".into(),
            },
            include_image_base64: true,
        };

        let value = serde_json::to_value(&request).expect("serialise");
        assert_eq!(
            value,
            json!({
                "model": "mistral-ocr-latest",
                "document": {
                    "type": "document_url",
                    "document_url": "https://example.com/test.pdf"
                },
                "include_image_base64": true
            })
        );
    }

    #[test]
    fn response_parses_minimal_body() {
        let body = r##"{"pages":[{"index":0,"markdown":"# Hello"}]}"##;
        let response: OcrResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(response.pages.len(), 1);
        assert_eq!(response.pages[0].markdown, "# Hello");
        assert!(response.pages[0].images.is_empty());
    }

    #[test]
    fn page_without_markdown_fails_to_parse() {
        let body = r#"{"pages":[{"index":0}]}"#;
        let err = serde_json::from_str::<OcrResponse>(body).unwrap_err();
        assert!(
            err.to_string().contains("markdown"),
            "expected a missing-field error, got: {err}"
        );
    }

    #[test]
    fn response_parses_full_body() {
        let body = json!({
            "model": "mistral-ocr-2505",
            "pages": [
                {
                    "index": 0,
                    "markdown": "Page one",
                    "images": [{"id": "img-0", "image_base64": "aGk="}]
                },
                {"index": 1, "markdown": "Page two"}
            ],
            "usage_info": {"pages_processed": 2, "doc_size_bytes": 1234}
        })
        .to_string();

        let response: OcrResponse = serde_json::from_str(&body).expect("parse");
        assert_eq!(response.model.as_deref(), Some("mistral-ocr-2505"));
        assert_eq!(response.pages.len(), 2);
        assert_eq!(response.pages[0].images[0].id, "img-0");
        assert_eq!(
            response.usage_info.and_then(|u| u.pages_processed),
            Some(2)
        );
    }

    #[tokio::test]
    async fn blank_url_rejected_before_any_request() {
        let engine = MistralOcr::new(test_config()).expect("client");
        let err = engine
            .process(&DocumentSource::Url("   ".into()))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Ocr2MdError::InvalidDocument { .. }),
            "expected InvalidDocument, got: {err}"
        );
    }

    #[tokio::test]
    async fn malformed_url_rejected_before_any_request() {
        let engine = MistralOcr::new(test_config()).expect("client");
        let err = engine
            .process(&DocumentSource::Url("https://".into()))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Ocr2MdError::InvalidUrl { .. }),
            "expected InvalidUrl, got: {err}"
        );
    }

    #[tokio::test]
    async fn empty_path_rejected_before_any_request() {
        let engine = MistralOcr::new(test_config()).expect("client");
        let err = engine
            .process(&DocumentSource::File(PathBuf::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, Ocr2MdError::InvalidDocument { .. }));
    }
}
