//! API Handlers
//!
//! HTTP request handlers for each scratch registry endpoint.

use std::sync::Arc;
use std::time::SystemTime;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap},
    Json,
};
use tracing::warn;

use crate::config::Config;
use crate::error::{Result, ScratchError};
use crate::models::{
    CleanupResponse, FilesResponse, HealthResponse, StatsResponse, UploadRequest, UploadResponse,
};
use crate::scratch::ScratchRegistry;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared scratch registry
    pub registry: Arc<ScratchRegistry>,
    /// Lower-case extensions accepted for upload
    pub accepted_types: Arc<Vec<String>>,
}

impl AppState {
    /// Creates a new AppState around the given registry.
    pub fn new(registry: ScratchRegistry, accepted_types: Vec<String>) -> Self {
        Self {
            registry: Arc::new(registry),
            accepted_types: Arc::new(accepted_types),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Creates the backing directory if needed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = ScratchRegistry::new(config.scratch.clone())?;
        Ok(Self::new(registry, config.accepted_types.clone()))
    }
}

/// Handler for POST /uploads
///
/// Saves the multipart `file` field as a scratch file.
pub async fn upload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let limit = state.registry.config().max_upload_bytes;
    let req = match UploadRequest::from_multipart(multipart, limit, content_length(&headers)).await
    {
        Ok(req) => req,
        Err(e) => {
            if matches!(e, ScratchError::SizeLimit { .. }) {
                warn!("Rejected upload body: {}", e);
                state.registry.record_rejected().await;
            }
            return Err(e);
        }
    };
    req.validate(&state.accepted_types)?;

    let path = state.registry.save_upload(&req.bytes, &req.file_name).await?;
    let created_at = state
        .registry
        .created_at(&path)
        .await
        .unwrap_or_else(SystemTime::now);

    Ok(Json(UploadResponse::new(
        &path,
        &req.file_name,
        req.bytes.len() as u64,
        created_at,
    )))
}

/// Declared request body length, if present and well formed.
fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Handler for GET /files
///
/// Lists tracked scratch files, oldest first.
pub async fn files_handler(State(state): State<AppState>) -> Json<FilesResponse> {
    let files = state.registry.tracked_files().await;
    let expiry = state.registry.config().expiry;

    Json(FilesResponse::new(&files, SystemTime::now(), expiry))
}

/// Handler for POST /cleanup
///
/// Runs a manual sweep and reports what it removed.
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let report = state.registry.manual_sweep().await;
    Json(CleanupResponse::new(report))
}

/// Handler for GET /stats
///
/// Returns registry statistics and the configured limits.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.registry.stats().await;
    Json(StatsResponse::new(stats, state.registry.config()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
