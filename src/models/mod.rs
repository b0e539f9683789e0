//! Request and Response models for the scratch registry API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! reading multipart uploads and serializing HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::UploadRequest;
pub use responses::{
    CleanupResponse, ErrorResponse, FilesResponse, HealthResponse, StatsResponse,
    TrackedFileResponse, UploadResponse,
};
