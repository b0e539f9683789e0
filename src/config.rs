//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Name of the scratch subdirectory under the OS temp root.
pub const SCRATCH_DIR_NAME: &str = "markdown-converter-ui";

/// Extensions the upload handler accepts by default.
pub const DEFAULT_ACCEPTED_TYPES: [&str; 6] = ["docx", "html", "pdf", "txt", "md", "rtf"];

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Limits and locations governing the scratch registry and its reaper.
///
/// Passed by value into [`crate::scratch::ScratchRegistry::new`] so tests can
/// inject tiny thresholds without touching process-wide state.
#[derive(Debug, Clone)]
pub struct ScratchConfig {
    /// Directory holding every scratch file
    pub scratch_dir: PathBuf,
    /// Largest upload accepted, in bytes
    pub max_upload_bytes: u64,
    /// Age after which a scratch file may be deleted
    pub expiry: Duration,
    /// Pause between two reaper sweeps
    pub sweep_interval: Duration,
}

impl ScratchConfig {
    /// Default limits rooted at the given directory.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            max_upload_bytes: 50 * BYTES_PER_MB,
            expiry: Duration::from_secs(2 * 3600),
            sweep_interval: Duration::from_secs(15 * 60),
        }
    }
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self::new(default_scratch_dir())
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Registry and reaper settings
    pub scratch: ScratchConfig,
    /// Lower-case file extensions accepted for upload
    pub accepted_types: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAX_FILE_SIZE_MB` - Upload limit in megabytes (default: 50)
    /// - `FILE_EXPIRY_HOURS` - Hours before a scratch file expires (default: 2)
    /// - `CLEANUP_INTERVAL_MINUTES` - Minutes between sweeps (default: 15)
    /// - `SCRATCH_DIR` - Backing directory (default: `<temp>/markdown-converter-ui`)
    /// - `ACCEPTED_FILE_TYPES` - Comma-separated extensions (default: docx,html,pdf,txt,md,rtf)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_upload_mb: u64 = parse_var("MAX_FILE_SIZE_MB").unwrap_or(50);
        let expiry_hours: u64 = parse_var("FILE_EXPIRY_HOURS").unwrap_or(2);
        let interval_minutes: u64 = parse_var("CLEANUP_INTERVAL_MINUTES").unwrap_or(15);

        let scratch_dir = env::var("SCRATCH_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.scratch.scratch_dir);

        let accepted_types = env::var("ACCEPTED_FILE_TYPES")
            .ok()
            .map(|v| parse_types(&v))
            .filter(|types| !types.is_empty())
            .unwrap_or(defaults.accepted_types);

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            scratch: ScratchConfig {
                scratch_dir,
                max_upload_bytes: max_upload_mb.saturating_mul(BYTES_PER_MB),
                expiry: Duration::from_secs(expiry_hours.saturating_mul(3600)),
                sweep_interval: Duration::from_secs(interval_minutes.max(1).saturating_mul(60)),
            },
            accepted_types,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            scratch: ScratchConfig::default(),
            accepted_types: DEFAULT_ACCEPTED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// `<os temp dir>/markdown-converter-ui`
pub fn default_scratch_dir() -> PathBuf {
    env::temp_dir().join(SCRATCH_DIR_NAME)
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_types(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
