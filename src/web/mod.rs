//! Browser front end and JSON API for interactive conversion.
//!
//! An Axum-based server wrapping the conversion pipeline: upload PDFs or
//! paste URLs in the browser, preview the markdown, download per file or
//! as one zip. Converted documents live in an in-memory session store
//! until cleared or the server stops.
//!
//! # Endpoints
//!
//! - `GET /` - Browser UI (embedded single page)
//! - `POST /api/convert/files` - Convert uploaded files (multipart form data)
//! - `POST /api/convert/urls` - Convert remote documents (JSON, one URL per line)
//! - `GET /api/documents` - List converted documents in submission order
//! - `GET /api/documents/{id}/download` - Download one document as markdown
//! - `GET /api/archive` - Download all documents as a zip
//! - `DELETE /api/documents` - Clear the session
//! - `GET /health` - Health check
//!
//! # Examples
//!
//! ## Starting the server
//!
//! ```no_run
//! use ocr2md::pipeline::ocr::MistralOcr;
//! use ocr2md::web::serve;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ocr2md::Ocr2MdError> {
//!     let engine = Arc::new(MistralOcr::from_env()?);
//!     serve("127.0.0.1", 8080, engine).await?;
//!     Ok(())
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! # Convert an uploaded file
//! curl -F "files=@document.pdf" http://localhost:8080/api/convert/files
//!
//! # Convert two remote documents
//! curl -H 'Content-Type: application/json' \
//!      -d '{"urls": "https://arxiv.org/pdf/2201.04234\nhttps://arxiv.org/pdf/1706.03762"}' \
//!      http://localhost:8080/api/convert/urls
//!
//! # List results
//! curl http://localhost:8080/api/documents
//!
//! # Grab everything as a zip
//! curl -OJ http://localhost:8080/api/archive
//!
//! # Start over
//! curl -X DELETE http://localhost:8080/api/documents
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, create_router_with_limits, create_router_with_state, serve};
pub use types::{
    ApiSizeLimits, AppState, ClearResponse, ConvertOutcome, DocumentEntry, ErrorResponse,
    HealthResponse, UrlsRequest,
};
