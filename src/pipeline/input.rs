//! Input classification: decide how a user-supplied document reference
//! reaches the OCR service.
//!
//! ## Why classify instead of download?
//!
//! The OCR endpoint accepts a URL directly, so remote documents never touch
//! this machine — the URL goes to the API verbatim and the service fetches
//! it. Only local files need transport (upload, or an inline data URI).
//! Classification is therefore a pure string decision with no I/O, which
//! keeps it trivially testable and means a bad reference is rejected before
//! a single socket is opened.

use crate::error::Ocr2MdError;
use std::path::{Path, PathBuf};

/// A document reference, classified by how it reaches the OCR service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Publicly reachable HTTP/HTTPS URL. Sent to the API verbatim.
    Url(String),
    /// Local file. Uploaded (or inlined) before the OCR run.
    File(PathBuf),
}

impl DocumentSource {
    /// Classify a user-supplied string: anything that starts with an HTTP
    /// scheme is a URL, everything else a local path.
    pub fn from_input(input: &str) -> Self {
        if is_url(input) {
            DocumentSource::Url(input.to_string())
        } else {
            DocumentSource::File(PathBuf::from(input))
        }
    }

    /// Identifier used for session storage and download filenames: the URL
    /// itself for remote documents, the file name for local ones.
    pub fn display_name(&self) -> String {
        match self {
            DocumentSource::Url(url) => url.clone(),
            DocumentSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    /// The underlying path, when the source is a local file.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            DocumentSource::Url(_) => None,
            DocumentSource::File(path) => Some(path),
        }
    }
}

/// Check if the input string looks like a URL. URL schemes are
/// case-insensitive, so `HTTP://…` classifies the same as `http://…` —
/// anything [`validate_remote_url`] accepts must land in remote mode here.
pub fn is_url(input: &str) -> bool {
    has_scheme(input, "http://") || has_scheme(input, "https://")
}

fn has_scheme(input: &str, scheme: &str) -> bool {
    input
        .get(..scheme.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
}

/// Validate a remote document URL before it is sent anywhere.
///
/// Blank entries are reported as invalid documents; non-blank strings must
/// be absolute `http://`/`https://` URLs, written with both slashes — the
/// WHATWG parser would quietly repair `http:/…` and `http:…`, but anything
/// accepted here must also classify as remote in [`is_url`], so the sloppy
/// forms are rejected instead of repaired. Used per line on the web UI's
/// URL field so one typo fails only its own entry.
pub fn validate_remote_url(url: &str) -> Result<(), Ocr2MdError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(Ocr2MdError::InvalidDocument {
            detail: "blank URL".into(),
        });
    }

    if !is_url(trimmed) {
        return Err(Ocr2MdError::InvalidUrl {
            url: trimmed.to_string(),
        });
    }

    reqwest::Url::parse(trimmed).map_err(|_| Ocr2MdError::InvalidUrl {
        url: trimmed.to_string(),
    })?;

    Ok(())
}
