//! Response DTOs for the scratch registry API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::path::Path;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ScratchConfig;
use crate::scratch::{format_file_size, output_file_name, ScratchStats, SweepReport, TrackedFile};

fn rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}

/// Response body for a saved upload (POST /uploads)
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// Scratch file location handed to the converter
    pub path: String,
    /// Client-side file name
    pub file_name: String,
    /// Suggested name of the converted Markdown file
    pub output_name: String,
    /// Size in bytes
    pub size: u64,
    /// Human readable size
    pub size_display: String,
    /// Registration time, ISO 8601
    pub created_at: String,
}

impl UploadResponse {
    /// Creates a new UploadResponse
    pub fn new(path: &Path, file_name: &str, size: u64, created_at: SystemTime) -> Self {
        Self {
            path: path.display().to_string(),
            file_name: file_name.to_string(),
            output_name: output_file_name(file_name),
            size,
            size_display: format_file_size(size),
            created_at: rfc3339(created_at),
        }
    }
}

/// One tracked scratch file (GET /files)
#[derive(Debug, Clone, Serialize)]
pub struct TrackedFileResponse {
    pub path: String,
    pub file_name: String,
    pub created_at: String,
    /// Seconds since registration
    pub age_seconds: u64,
    /// Seconds until the file becomes eligible for deletion
    pub expires_in_seconds: u64,
}

impl TrackedFileResponse {
    /// Describes `file` as seen at `now`
    pub fn new(file: &TrackedFile, now: SystemTime, expiry: Duration) -> Self {
        Self {
            path: file.path().display().to_string(),
            file_name: file.file_name().to_string(),
            created_at: rfc3339(file.created_at),
            age_seconds: file.age_at(now).as_secs(),
            expires_in_seconds: file.remaining_at(now, expiry).as_secs(),
        }
    }
}

/// Response body for the file listing (GET /files)
#[derive(Debug, Clone, Serialize)]
pub struct FilesResponse {
    /// Number of tracked files
    pub count: usize,
    /// Tracked files, oldest first
    pub files: Vec<TrackedFileResponse>,
}

impl FilesResponse {
    pub fn new(files: &[TrackedFile], now: SystemTime, expiry: Duration) -> Self {
        Self {
            count: files.len(),
            files: files
                .iter()
                .map(|file| TrackedFileResponse::new(file, now, expiry))
                .collect(),
        }
    }
}

/// Response body for manual cleanup (POST /cleanup)
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Summary message
    pub message: String,
    /// Files deleted across both passes
    pub deleted: usize,
    #[serde(flatten)]
    pub report: SweepReport,
}

impl CleanupResponse {
    /// Creates a new CleanupResponse from a sweep report
    pub fn new(report: SweepReport) -> Self {
        let deleted = report.deleted();
        Self {
            message: format!("Cleanup removed {} expired files", deleted),
            deleted,
            report,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: ScratchStats,
    /// Upload limit in bytes
    pub max_upload_bytes: u64,
    /// Expiry window in seconds
    pub expiry_seconds: u64,
    /// Sweep interval in seconds
    pub sweep_interval_seconds: u64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from registry statistics and limits
    pub fn new(stats: ScratchStats, config: &ScratchConfig) -> Self {
        Self {
            stats,
            max_upload_bytes: config.max_upload_bytes,
            expiry_seconds: config.expiry.as_secs(),
            sweep_interval_seconds: config.sweep_interval.as_secs(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
