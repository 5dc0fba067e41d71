//! Bulk export: pack every converted document into one zip archive.
//!
//! ## Why in-memory
//!
//! A session holds markdown text, not scanned images, so even a generous
//! batch compresses to a few hundred kilobytes. Building the archive in a
//! [`Cursor`] keeps it a pure function of the store: no temp files, no
//! cleanup, and the web handler can hand the bytes straight to the client.
//!
//! Member names come from [`markdown_filename`], the same rule the per-file
//! download endpoint uses, so the zip and the individual downloads always
//! agree. Name collisions get a `-1`, `-2`, … suffix in store order.

use crate::error::Ocr2MdError;
use crate::session::SessionStore;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::debug;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// Filename the browser receives for the bulk archive.
pub const ARCHIVE_FILENAME: &str = "converted_documents.zip";

/// Download filename for one document: sanitised stem plus `.md`.
///
/// The id may be a URL or an original filename. The last path segment is
/// taken, query string and fragment dropped, the final dot-suffix treated
/// as an extension, and anything outside `[A-Za-z0-9._-]` replaced with
/// an underscore.
pub fn markdown_filename(id: &str) -> String {
    format!("{}.md", sanitised_stem(id))
}

/// Build a zip of every document in the store, in insertion order.
///
/// An empty store is an error: handing the browser a zero-entry archive
/// looks like a bug, not a result.
pub fn build_archive(store: &SessionStore) -> Result<Vec<u8>, Ocr2MdError> {
    if store.is_empty() {
        return Err(Ocr2MdError::NothingToArchive);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut taken: HashSet<String> = HashSet::new();

    for (id, markdown) in store.iter() {
        let base = sanitised_stem(id);
        let mut name = format!("{base}.md");
        let mut n = 1;
        while !taken.insert(name.clone()) {
            name = format!("{base}-{n}.md");
            n += 1;
        }

        writer
            .start_file(name.as_str(), options)
            .map_err(|e| Ocr2MdError::Archive {
                detail: format!("start '{name}': {e}"),
            })?;
        writer
            .write_all(markdown.as_bytes())
            .map_err(|e| Ocr2MdError::Archive {
                detail: format!("write '{name}': {e}"),
            })?;
    }

    let cursor = writer.finish().map_err(|e| Ocr2MdError::Archive {
        detail: format!("finalise archive: {e}"),
    })?;

    let bytes = cursor.into_inner();
    debug!("Archived {} documents ({} bytes)", store.len(), bytes.len());
    Ok(bytes)
}

fn sanitised_stem(id: &str) -> String {
    let tail = id
        .split(['/', '\\'])
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or("");
    let tail = tail.split(['?', '#']).next().unwrap_or(tail);

    let stem = Path::new(tail)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(tail);

    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}
