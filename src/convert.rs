//! High-level conversion entry points.
//!
//! Everything here is a thin orchestration of the pipeline stages:
//!
//! ```text
//! input ──▶ classify ──▶ OCR engine ──▶ assemble ──▶ markdown
//! ```
//!
//! The engine is passed in rather than constructed here, so the CLI, the
//! web handlers, and the tests all drive the same functions — the tests
//! just hand in a scripted engine instead of a live client.

use crate::error::Ocr2MdError;
use crate::pipeline::assemble::assemble_markdown;
use crate::pipeline::input::DocumentSource;
use crate::pipeline::ocr::OcrEngine;
use std::path::Path;
use tracing::{debug, info};

/// Convert one document (URL or local path) to markdown.
pub async fn convert(input: &str, engine: &dyn OcrEngine) -> Result<String, Ocr2MdError> {
    let source = DocumentSource::from_input(input);
    process_source(&source, engine).await
}

/// Convert one document and write the markdown to `output`.
///
/// An existing file at `output` is removed first, so a rerun replaces the
/// previous result instead of appending to it.
pub async fn convert_to_file(
    input: &str,
    output: &Path,
    engine: &dyn OcrEngine,
) -> Result<(), Ocr2MdError> {
    let markdown = convert(input, engine).await?;

    match tokio::fs::remove_file(output).await {
        Ok(()) => debug!("Removed existing output '{}'", output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(Ocr2MdError::OutputWriteFailed {
                path: output.to_path_buf(),
                source: e,
            })
        }
    }

    tokio::fs::write(output, markdown.as_bytes())
        .await
        .map_err(|e| Ocr2MdError::OutputWriteFailed {
            path: output.to_path_buf(),
            source: e,
        })?;

    info!("Wrote markdown to '{}'", output.display());
    Ok(())
}

/// Convert an in-memory document, as received from a browser upload.
///
/// The bytes are staged under their original filename in a temporary
/// directory that lives only for the duration of the call, so the engine
/// sees a real file (and the API records a meaningful upload name) while
/// nothing is left on disk afterwards. Only the final path component of
/// `filename` is used.
pub async fn convert_from_bytes(
    bytes: &[u8],
    filename: &str,
    engine: &dyn OcrEngine,
) -> Result<String, Ocr2MdError> {
    let safe_name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload.pdf");

    let dir = tempfile::tempdir().map_err(|e| Ocr2MdError::Io {
        path: std::env::temp_dir(),
        source: e,
    })?;
    let path = dir.path().join(safe_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| Ocr2MdError::Io {
            path: path.clone(),
            source: e,
        })?;
    debug!("Staged {} bytes as '{}'", bytes.len(), path.display());

    let source = DocumentSource::File(path);
    let markdown = process_source(&source, engine).await?;

    // `dir` drops here and removes the staged copy.
    Ok(markdown)
}

async fn process_source(
    source: &DocumentSource,
    engine: &dyn OcrEngine,
) -> Result<String, Ocr2MdError> {
    debug!("Step 1: running OCR over '{}'", source.display_name());
    let response = engine.process(source).await?;

    debug!("Step 2: assembling {} pages", response.pages.len());
    Ok(assemble_markdown(&response))
}
