//! Configuration types for OCR conversion.
//!
//! All conversion behaviour is controlled through [`OcrConfig`], built via
//! its [`OcrConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs between the CLI, the web server, and library
//! callers, and to log the effective settings of a run.
//!
//! # Design choice: builder over constructor
//! A constructor with one positional argument per field breaks on every new
//! field. The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::error::Ocr2MdError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable holding the Mistral API key.
pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";

/// Configuration for an OCR conversion.
///
/// Built via [`OcrConfig::builder()`] or [`OcrConfig::from_env()`].
///
/// # Example
/// ```rust
/// use ocr2md::OcrConfig;
///
/// let config = OcrConfig::builder()
///     .api_key("sk-test")
///     .timeout_secs(60)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct OcrConfig {
    /// Mistral API key. Resolved from `MISTRAL_API_KEY` when not set
    /// explicitly on the builder.
    pub api_key: String,

    /// Base URL of the Mistral API. Default: `https://api.mistral.ai`.
    ///
    /// Override for proxies or for tests that point the client at a local
    /// stub server.
    pub base_url: String,

    /// OCR model identifier. Default: `mistral-ocr-latest`.
    pub model: String,

    /// Ask the API to return embedded images as base64 alongside the page
    /// Markdown. Default: true.
    pub include_images: bool,

    /// How local files reach the OCR service. Default: [`UploadStrategy::SignedUrl`].
    pub upload_strategy: UploadStrategy,

    /// Per-request timeout in seconds. Default: 120.
    ///
    /// Covers the whole request including the response body. OCR of a long
    /// document can take tens of seconds, so this is deliberately generous.
    pub timeout_secs: u64,

    /// Lifetime of the signed download URL minted for uploaded files, in
    /// hours. Range: 1–168. Default: 24.
    ///
    /// The URL only needs to survive until the OCR run reads it, but a
    /// too-short expiry fails on queued requests. 24 h matches the service
    /// default and costs nothing.
    pub signed_url_expiry_hours: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.mistral.ai".to_string(),
            model: "mistral-ocr-latest".to_string(),
            include_images: true,
            upload_strategy: UploadStrategy::default(),
            timeout_secs: 120,
            signed_url_expiry_hours: 24,
        }
    }
}

impl fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("include_images", &self.include_images)
            .field("upload_strategy", &self.upload_strategy)
            .field("timeout_secs", &self.timeout_secs)
            .field("signed_url_expiry_hours", &self.signed_url_expiry_hours)
            .finish()
    }
}

impl OcrConfig {
    /// Create a new builder for `OcrConfig`.
    pub fn builder() -> OcrConfigBuilder {
        OcrConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a config entirely from the environment.
    ///
    /// Fails with [`Ocr2MdError::MissingApiKey`] when `MISTRAL_API_KEY` is
    /// unset or blank.
    pub fn from_env() -> Result<Self, Ocr2MdError> {
        Self::builder().build()
    }
}

/// Builder for [`OcrConfig`].
#[derive(Debug)]
pub struct OcrConfigBuilder {
    config: OcrConfig,
}

impl OcrConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn include_images(mut self, v: bool) -> Self {
        self.config.include_images = v;
        self
    }

    pub fn upload_strategy(mut self, strategy: UploadStrategy) -> Self {
        self.config.upload_strategy = strategy;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    pub fn signed_url_expiry_hours(mut self, hours: u32) -> Self {
        self.config.signed_url_expiry_hours = hours.clamp(1, 168);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// When no API key was set explicitly, `MISTRAL_API_KEY` is consulted
    /// here so that `OcrConfig::builder().build()` works out of the box in a
    /// configured shell.
    pub fn build(mut self) -> Result<OcrConfig, Ocr2MdError> {
        if self.config.api_key.trim().is_empty() {
            match std::env::var(API_KEY_ENV) {
                Ok(key) if !key.trim().is_empty() => self.config.api_key = key,
                _ => return Err(Ocr2MdError::MissingApiKey),
            }
        }

        if !self.config.base_url.starts_with("http://")
            && !self.config.base_url.starts_with("https://")
        {
            return Err(Ocr2MdError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.config.base_url
            )));
        }

        if self.config.model.trim().is_empty() {
            return Err(Ocr2MdError::InvalidConfig("model must not be empty".into()));
        }

        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How a local PDF reaches the OCR service.
///
/// Two strategies exist because the service accepts documents both ways and
/// they trade differently: the signed-URL exchange costs two extra requests
/// but keeps the OCR request small; the inline data URI is a single request
/// whose body grows by roughly a third over the raw file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStrategy {
    /// Upload to `/v1/files`, exchange the file id for a short-lived signed
    /// URL, then run OCR against that URL. (default)
    #[default]
    SignedUrl,
    /// Embed the whole PDF as a `data:application/pdf;base64,…` URI in the
    /// OCR request body. No upload round-trip.
    DataUri,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let config = OcrConfig::builder()
            .api_key("sk-test")
            .build()
            .expect("valid config");
        assert_eq!(config.base_url, "https://api.mistral.ai");
        assert_eq!(config.model, "mistral-ocr-latest");
        assert!(config.include_images);
        assert_eq!(config.upload_strategy, UploadStrategy::SignedUrl);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.signed_url_expiry_hours, 24);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = OcrConfig::builder()
            .api_key("sk-test")
            .base_url("http://127.0.0.1:9000/")
            .build()
            .expect("valid config");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = OcrConfig::builder()
            .api_key("sk-test")
            .base_url("ftp://api.mistral.ai")
            .build()
            .unwrap_err();
        assert!(matches!(err, Ocr2MdError::InvalidConfig(_)));
    }

    #[test]
    fn expiry_hours_are_clamped() {
        let config = OcrConfig::builder()
            .api_key("sk-test")
            .signed_url_expiry_hours(0)
            .build()
            .expect("valid config");
        assert_eq!(config.signed_url_expiry_hours, 1);

        let config = OcrConfig::builder()
            .api_key("sk-test")
            .signed_url_expiry_hours(10_000)
            .build()
            .expect("valid config");
        assert_eq!(config.signed_url_expiry_hours, 168);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = OcrConfig::builder()
            .api_key("sk-very-secret")
            .build()
            .expect("valid config");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-very-secret"), "got: {rendered}");
        assert!(rendered.contains("<redacted>"));
    }
}
