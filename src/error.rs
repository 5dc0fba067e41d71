//! Error types for the ocr2md library.
//!
//! A single [`Ocr2MdError`] enum covers every failure the library can
//! produce, grouped by where the failure happens:
//!
//! * **Before the network** — bad configuration or a document reference that
//!   can be rejected without opening a socket ([`Ocr2MdError::MissingApiKey`],
//!   [`Ocr2MdError::InvalidDocument`], [`Ocr2MdError::InvalidUrl`]).
//!
//! * **At the API boundary** — transport failures, non-2xx responses, and
//!   response bodies that do not match the documented shape
//!   ([`Ocr2MdError::Http`], [`Ocr2MdError::Api`],
//!   [`Ocr2MdError::UnexpectedResponse`]).
//!
//! * **Local I/O** — reading an input file or writing the output Markdown
//!   ([`Ocr2MdError::Io`], [`Ocr2MdError::OutputWriteFailed`]).
//!
//! Batch callers (the web handlers) convert each error into a per-document
//! outcome so one bad URL or upload never aborts the rest of the batch; the
//! library itself always propagates the typed error unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the ocr2md library.
#[derive(Debug, Error)]
pub enum Ocr2MdError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// No API key was provided and `MISTRAL_API_KEY` is not set.
    #[error(
        "MISTRAL_API_KEY is not set.\n\
         Get a key at https://console.mistral.ai/ and run:\n\
           export MISTRAL_API_KEY=<your key>"
    )]
    MissingApiKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// The document reference is unusable (blank URL, empty file name,
    /// zero-byte upload). Detected before any network activity.
    #[error("Invalid document: {detail}")]
    InvalidDocument { detail: String },

    /// The string was supposed to be an HTTP/HTTPS URL but is not one.
    #[error("Invalid URL '{url}': expected an absolute http:// or https:// address")]
    InvalidUrl { url: String },

    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    // ── API errors ────────────────────────────────────────────────────────
    /// The request never produced an HTTP response (connect failure,
    /// timeout, TLS error).
    #[error("Request to '{url}' failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("Mistral API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered 2xx but the body did not have the promised shape.
    #[error("Unexpected API response: {detail}")]
    UnexpectedResponse { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Reading a local input file failed.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Archive errors ────────────────────────────────────────────────────
    /// Building the zip archive failed.
    #[error("Failed to build archive: {detail}")]
    Archive { detail: String },

    /// An archive was requested but the session holds no documents.
    #[error("No converted documents to archive")]
    NothingToArchive,

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Ocr2MdError {
    /// True when retrying the same request might succeed (network blip,
    /// 5xx, 429). Validation and configuration errors are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Ocr2MdError::Http { .. } => true,
            Ocr2MdError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
