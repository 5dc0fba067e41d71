//! # ocr2md
//!
//! Convert PDF documents to Markdown with the Mistral OCR API.
//!
//! ## Why this crate?
//!
//! Running OCR locally means bundling a rendering stack and a model, and
//! the results on complex layouts — multi-column text, tables, formulae —
//! are rarely worth it. Mistral's hosted OCR reads the whole document and
//! returns per-page Markdown. What remains is plumbing: getting local
//! files to the service, stitching pages back together, and offering the
//! result through a CLI and a small web UI. This crate is that plumbing.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL or file
//!  │
//!  ├─ 1. Input     classify as remote URL or local path
//!  ├─ 2. Upload    local files only: /v1/files + signed-URL exchange
//!  ├─ 3. OCR       POST /v1/ocr, returns page-structured Markdown
//!  └─ 4. Assemble  concatenate pages into one document
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocr2md::{convert, MistralOcr};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ocr2md::Ocr2MdError> {
//!     // Reads MISTRAL_API_KEY from the environment.
//!     let engine = MistralOcr::from_env()?;
//!     let markdown = convert("https://arxiv.org/pdf/2201.04234", &engine).await?;
//!     println!("{markdown}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocr2md` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `web`   | on      | Browser UI and JSON API (axum + tower-http), see [`web`] |
//!
//! Disable both when using only the library to avoid pulling in their deps:
//! ```toml
//! ocr2md = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod archive;
pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;
pub mod session;
#[cfg(feature = "web")]
pub mod web;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use archive::{build_archive, markdown_filename};
pub use config::{OcrConfig, OcrConfigBuilder, UploadStrategy, API_KEY_ENV};
pub use convert::{convert, convert_from_bytes, convert_to_file};
pub use error::Ocr2MdError;
pub use pipeline::assemble::assemble_markdown;
pub use pipeline::input::DocumentSource;
pub use pipeline::ocr::{MistralOcr, OcrEngine, OcrPage, OcrResponse};
pub use session::SessionStore;
