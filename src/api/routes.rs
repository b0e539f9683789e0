//! API Routes
//!
//! Configures the Axum router with all scratch registry endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, files_handler, health_handler, stats_handler, upload_handler, AppState,
};

/// Room for multipart boundaries and headers on top of the upload limit.
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /uploads` - Save a multipart upload as a scratch file
/// - `GET /files` - List tracked scratch files
/// - `POST /cleanup` - Run a manual sweep
/// - `GET /stats` - Get registry statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Body limit: upload limit plus multipart overhead, so oversize uploads
///   reach the registry's own size check
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.registry.config().max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/uploads", post(upload_handler))
        .route("/files", get(files_handler))
        .route("/cleanup", post(cleanup_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
