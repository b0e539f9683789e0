//! Request DTOs for the scratch registry API
//!
//! Defines how an incoming multipart upload is read and validated.

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

use crate::error::{Result, ScratchError};
use crate::scratch::is_accepted_type;

/// Name of the multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "file";

/// A document received through `POST /uploads`
///
/// # Fields
/// - `file_name`: The client-side file name
/// - `bytes`: The raw file contents
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// The client-side file name
    pub file_name: String,
    /// The raw file contents
    pub bytes: Bytes,
}

impl UploadRequest {
    /// Reads the first `file` field of a multipart body.
    ///
    /// Other fields are ignored. A body cut off by the request body limit is
    /// reported as a size-limit error against `max_upload_bytes`.
    ///
    /// # Arguments
    /// * `multipart` - The multipart extractor
    /// * `max_upload_bytes` - Configured upload limit
    /// * `content_length` - Declared request length, if the client sent one
    pub async fn from_multipart(
        mut multipart: Multipart,
        max_upload_bytes: u64,
        content_length: Option<u64>,
    ) -> Result<Self> {
        let read_error = |e: MultipartError| multipart_error(e, max_upload_bytes, content_length);

        while let Some(field) = multipart.next_field().await.map_err(read_error)? {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }

            let file_name = field
                .file_name()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    ScratchError::InvalidRequest("Uploaded file has no file name".to_string())
                })?;

            let bytes = field.bytes().await.map_err(read_error)?;

            return Ok(Self { file_name, bytes });
        }

        Err(ScratchError::InvalidRequest(format!(
            "Missing multipart field '{}'",
            UPLOAD_FIELD
        )))
    }

    /// Checks the file extension against the accepted types.
    pub fn validate(&self, accepted_types: &[String]) -> Result<()> {
        if is_accepted_type(&self.file_name, accepted_types) {
            return Ok(());
        }

        let formats: Vec<String> = accepted_types.iter().map(|t| format!(".{}", t)).collect();
        Err(ScratchError::UnsupportedFileType(format!(
            "{}. Please upload one of the following formats: {}",
            self.file_name,
            formats.join(", ")
        )))
    }
}

/// Maps a multipart read failure onto the API error type.
///
/// Without a `Content-Length` the actual size is only known to exceed the
/// limit, so it is reported as one byte over.
fn multipart_error(e: MultipartError, limit: u64, content_length: Option<u64>) -> ScratchError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ScratchError::SizeLimit {
            actual: content_length.unwrap_or_else(|| limit.saturating_add(1)),
            limit,
        };
    }
    ScratchError::InvalidRequest(e.body_text())
}
