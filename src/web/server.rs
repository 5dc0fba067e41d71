//! Web server setup and configuration.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::handlers::{
    archive_handler, clear_documents_handler, convert_files_handler, convert_urls_handler,
    download_document_handler, health_handler, index_handler, list_documents_handler,
};
use super::types::{ApiSizeLimits, AppState};
use crate::error::Ocr2MdError;
use crate::pipeline::ocr::OcrEngine;

/// Read the upload limit from `OCR2MD_MAX_UPLOAD_MB`, falling back to
/// 100 MB when unset or unparsable.
fn parse_size_limits_from_env() -> ApiSizeLimits {
    const DEFAULT_MB: usize = 100;

    if let Ok(value) = std::env::var("OCR2MD_MAX_UPLOAD_MB") {
        match value.parse::<usize>() {
            Ok(mb) if mb > 0 => {
                info!("Upload size limit configured from OCR2MD_MAX_UPLOAD_MB: {} MB", mb);
                return ApiSizeLimits::from_mb(mb);
            }
            _ => warn!(
                "Ignoring OCR2MD_MAX_UPLOAD_MB='{}', must be a positive integer of megabytes",
                value
            ),
        }
    }

    let limits = ApiSizeLimits::from_mb(DEFAULT_MB);
    info!(
        "Upload size limit: {} MB (default, set OCR2MD_MAX_UPLOAD_MB to change)",
        DEFAULT_MB
    );
    limits
}

/// Create the router with default size limits and a fresh session store.
///
/// Public so the router can be embedded in a larger application.
pub fn create_router(engine: Arc<dyn OcrEngine>) -> Router {
    create_router_with_limits(engine, ApiSizeLimits::default())
}

/// Create the router with custom size limits and a fresh session store.
pub fn create_router_with_limits(engine: Arc<dyn OcrEngine>, limits: ApiSizeLimits) -> Router {
    create_router_with_state(AppState::new(engine), limits)
}

/// Create the router over an existing [`AppState`].
///
/// Lets callers share one session store across routers, or hand in a
/// scripted engine when testing handler behaviour.
pub fn create_router_with_state(state: AppState, limits: ApiSizeLimits) -> Router {
    // Permissive CORS: the server binds to localhost by default and the
    // API carries no credentials beyond what the operator already holds.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/convert/files", post(convert_files_handler))
        .route("/api/convert/urls", post(convert_urls_handler))
        .route(
            "/api/documents",
            get(list_documents_handler).delete(clear_documents_handler),
        )
        .route("/api/documents/{id}/download", get(download_document_handler))
        .route("/api/archive", get(archive_handler))
        .layer(DefaultBodyLimit::max(limits.max_request_body_bytes))
        .layer(RequestBodyLimitLayer::new(limits.max_request_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server and block until it exits.
///
/// # Arguments
///
/// * `host` - IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// * `port` - Port number to bind to (e.g., 8080)
/// * `engine` - OCR engine used for every conversion of the session
pub async fn serve(
    host: impl AsRef<str>,
    port: u16,
    engine: Arc<dyn OcrEngine>,
) -> Result<(), Ocr2MdError> {
    let ip: IpAddr = host.as_ref().parse().map_err(|e| {
        Ocr2MdError::InvalidConfig(format!("invalid host address '{}': {e}", host.as_ref()))
    })?;
    let addr = SocketAddr::new(ip, port);

    let limits = parse_size_limits_from_env();
    let app = create_router_with_limits(engine, limits);

    info!("Serving the OCR web UI on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Ocr2MdError::Internal(format!("bind {addr}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Ocr2MdError::Internal(format!("server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Ocr2MdError;
    use crate::pipeline::input::DocumentSource;
    use crate::pipeline::ocr::OcrResponse;
    use async_trait::async_trait;

    struct NoopEngine;

    #[async_trait]
    impl crate::pipeline::ocr::OcrEngine for NoopEngine {
        async fn process(&self, _source: &DocumentSource) -> Result<OcrResponse, Ocr2MdError> {
            Ok(OcrResponse {
                model: None,
                pages: Vec::new(),
                usage_info: None,
            })
        }
    }

    #[test]
    fn router_builds() {
        let router = create_router(Arc::new(NoopEngine));
        assert!(std::mem::size_of_val(&router) > 0);
    }

    #[test]
    fn size_limit_env_var_is_honoured() {
        // All interactions with the variable stay inside this one test so
        // parallel test threads never observe a half-set value.
        std::env::remove_var("OCR2MD_MAX_UPLOAD_MB");
        assert_eq!(
            parse_size_limits_from_env().max_request_body_bytes,
            100 * 1024 * 1024
        );

        std::env::set_var("OCR2MD_MAX_UPLOAD_MB", "250");
        assert_eq!(
            parse_size_limits_from_env().max_request_body_bytes,
            250 * 1024 * 1024
        );

        std::env::set_var("OCR2MD_MAX_UPLOAD_MB", "not a number");
        assert_eq!(
            parse_size_limits_from_env().max_request_body_bytes,
            100 * 1024 * 1024
        );

        std::env::set_var("OCR2MD_MAX_UPLOAD_MB", "0");
        assert_eq!(
            parse_size_limits_from_env().max_request_body_bytes,
            100 * 1024 * 1024
        );

        std::env::remove_var("OCR2MD_MAX_UPLOAD_MB");
    }
}
