//! Error types for the scratch registry
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::scratch::format_file_size;

// == Scratch Error Enum ==
/// Unified error type for the scratch registry and its HTTP surface.
#[derive(Error, Debug)]
pub enum ScratchError {
    /// Upload is larger than the configured maximum
    #[error(
        "File exceeds size limit of {}. Your file is {}.",
        human_size(.limit),
        human_size(.actual)
    )]
    SizeLimit { actual: u64, limit: u64 },

    /// Upload has an extension outside the accepted set
    #[error("File type not supported: {0}")]
    UnsupportedFileType(String),

    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Filesystem failure in the backing directory
    #[error("Scratch file I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn human_size(bytes: &u64) -> String {
    format_file_size(*bytes)
}

// == IntoResponse Implementation ==
impl IntoResponse for ScratchError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScratchError::SizeLimit { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ScratchError::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ScratchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ScratchError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ScratchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the scratch registry.
pub type Result<T> = std::result::Result<T, ScratchError>;
