//! Pipeline stages for OCR conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. point [`ocr`] at a stub server in tests)
//! without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ ocr ──▶ assemble
//! (URL/path) (data URI) (Mistral) (Markdown)
//! ```
//!
//! 1. [`input`]    — classify the user-supplied string as URL or local file
//! 2. [`encode`]   — wrap local PDF bytes in a base64 data URI (inline mode)
//! 3. [`ocr`]      — drive the Mistral OCR API; the only stage with network I/O
//! 4. [`assemble`] — concatenate per-page Markdown into one document

pub mod assemble;
pub mod encode;
pub mod input;
pub mod ocr;
