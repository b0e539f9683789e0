//! Tracked File Module
//!
//! Defines the registry record for one scratch file.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::scratch::{age_at, has_outlived};

// == Tracked File ==
/// A scratch file created through the registry, with its expiry clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Location inside the backing directory
    pub path: PathBuf,
    /// When the file was registered
    pub created_at: SystemTime,
}

impl TrackedFile {
    // == Constructor ==
    /// Creates a record stamped with the current time.
    pub fn new(path: PathBuf) -> Self {
        Self::with_created_at(path, SystemTime::now())
    }

    /// Creates a record with an explicit creation time.
    pub fn with_created_at(path: PathBuf, created_at: SystemTime) -> Self {
        Self { path, created_at }
    }

    // == Age ==
    /// Age of the file at `now`, zero if `now` precedes creation.
    pub fn age_at(&self, now: SystemTime) -> Duration {
        age_at(self.created_at, now)
    }

    // == Is Expired ==
    /// True once the file has lived strictly longer than `expiry` at `now`.
    pub fn is_expired_at(&self, now: SystemTime, expiry: Duration) -> bool {
        has_outlived(self.age_at(now), expiry)
    }

    // == Time To Live ==
    /// Time left before the file becomes eligible for deletion.
    ///
    /// Returns `Duration::ZERO` once the expiry window has fully elapsed.
    pub fn remaining_at(&self, now: SystemTime, expiry: Duration) -> Duration {
        expiry.saturating_sub(self.age_at(now))
    }

    /// File name component of the path, or an empty string.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// Borrow the path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
