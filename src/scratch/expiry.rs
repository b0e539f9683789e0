//! Expiry Policy Module
//!
//! Age and size rules shared by the registry, the reaper and manual cleanup.

use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, SystemTime};

use tracing::warn;

use crate::error::{Result, ScratchError};
use crate::scratch::LARGE_UPLOAD_RATIO;

/// Age of something created at `created`, observed at `now`.
///
/// Saturates at zero when `now` is earlier than `created` (clock skew, or a
/// modification time in the future).
pub fn age_at(created: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(created).unwrap_or(Duration::ZERO)
}

/// Strict comparison: an age equal to the window is not yet expired.
pub fn has_outlived(age: Duration, expiry: Duration) -> bool {
    age > expiry
}

/// Rejects uploads larger than `limit` bytes.
pub fn check_upload_size(actual: u64, limit: u64) -> Result<()> {
    if actual > limit {
        return Err(ScratchError::SizeLimit { actual, limit });
    }
    Ok(())
}

/// True when an accepted upload is close enough to the limit to be worth a log line.
pub fn is_large_upload(actual: u64, limit: u64) -> bool {
    actual as f64 > limit as f64 * LARGE_UPLOAD_RATIO
}

/// Checks whether the file at `path` has outlived `expiry`, judged by its
/// modification time against `reference` (or the current time).
///
/// Missing files are simply not expired. Any other stat failure is logged and
/// also reported as not expired, so callers never have to handle an error.
pub async fn is_expired(path: &Path, expiry: Duration, reference: Option<SystemTime>) -> bool {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return false,
        Err(e) => {
            warn!("Error checking file expiry for {}: {}", path.display(), e);
            return false;
        }
    };

    let modified = match metadata.modified() {
        Ok(modified) => modified,
        Err(e) => {
            warn!("No modification time for {}: {}", path.display(), e);
            return false;
        }
    };

    let now = reference.unwrap_or_else(SystemTime::now);
    has_outlived(age_at(modified, now), expiry)
}
