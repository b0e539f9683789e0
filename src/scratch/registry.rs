//! Scratch Registry Module
//!
//! Owns the backing directory and the in-memory map of tracked scratch files.
//! Saves uploads, and reaps expired files in two passes: tracked entries by
//! their registration time, then untracked files by modification time.

use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::config::ScratchConfig;
use crate::error::{Result, ScratchError};
use crate::scratch::{
    check_upload_size, format_file_size, is_expired, is_large_upload, scratch_file_name,
    ScratchStats, TrackedFile,
};

// == Sweep Report ==
/// Outcome of one sweep or one pass of a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Expired tracked files removed (including ones already gone)
    pub tracked_deleted: usize,
    /// Expired untracked files removed
    pub untracked_deleted: usize,
    /// Tracked entries forgotten because the file disappeared early
    pub vanished: usize,
    /// Deletions that failed
    pub failures: usize,
}

impl SweepReport {
    /// Files deleted across both passes.
    pub fn deleted(&self) -> usize {
        self.tracked_deleted + self.untracked_deleted
    }

    fn merge(&mut self, other: SweepReport) {
        self.tracked_deleted += other.tracked_deleted;
        self.untracked_deleted += other.untracked_deleted;
        self.vanished += other.vanished;
        self.failures += other.failures;
    }
}

// == Scratch Registry ==
/// Process-wide registry of scratch files.
///
/// Shared as `Arc<ScratchRegistry>`. Locks guard only the map and counters and
/// are never held across file I/O.
#[derive(Debug)]
pub struct ScratchRegistry {
    /// Limits and backing directory
    config: ScratchConfig,
    /// Tracked files keyed by path
    files: RwLock<HashMap<PathBuf, TrackedFile>>,
    /// Activity counters
    stats: Mutex<ScratchStats>,
}

impl ScratchRegistry {
    // == Constructor ==
    /// Creates a registry, making sure the backing directory exists.
    pub fn new(config: ScratchConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.scratch_dir).map_err(|source| ScratchError::Io {
            path: config.scratch_dir.clone(),
            source,
        })?;

        Ok(Self {
            config,
            files: RwLock::new(HashMap::new()),
            stats: Mutex::new(ScratchStats::new()),
        })
    }

    // == Save Upload ==
    /// Writes an upload to a fresh scratch file and starts tracking it.
    ///
    /// Oversized uploads are refused before anything touches the disk. The
    /// returned path stays readable until a sweep reaps it.
    ///
    /// # Arguments
    /// * `bytes` - Upload contents, written verbatim
    /// * `original_name` - Client-side file name; only its extension is kept
    pub async fn save_upload(&self, bytes: &[u8], original_name: &str) -> Result<PathBuf> {
        let size = bytes.len() as u64;
        let limit = self.config.max_upload_bytes;

        if let Err(e) = check_upload_size(size, limit) {
            self.stats.lock().await.record_rejected();
            warn!("Rejected upload {:?}: {}", original_name, e);
            return Err(e);
        }

        if is_large_upload(size, limit) {
            info!(
                "Large file detected ({}). Processing may take longer.",
                format_file_size(size)
            );
        }

        let path = self
            .config
            .scratch_dir
            .join(scratch_file_name(original_name));

        if let Err(source) = write_new_file(&self.config.scratch_dir, &path, bytes).await {
            error!("Error saving uploaded file {}: {}", path.display(), source);
            // Never remove a file this call did not create
            if source.kind() != ErrorKind::AlreadyExists {
                let _ = fs::remove_file(&path).await;
            }
            return Err(ScratchError::Io { path, source });
        }

        let tracked = {
            let mut files = self.files.write().await;
            files.insert(path.clone(), TrackedFile::new(path.clone()));
            files.len()
        };

        {
            let mut stats = self.stats.lock().await;
            stats.record_saved();
            stats.set_tracked_files(tracked);
        }

        info!(
            "Created temporary file: {} ({})",
            path.display(),
            format_file_size(size)
        );
        Ok(path)
    }

    // == Sweep ==
    /// Runs both passes against the current time.
    pub async fn sweep(&self) -> SweepReport {
        self.sweep_at(SystemTime::now()).await
    }

    /// Runs the tracked pass, then the untracked pass, judging age at `now`.
    ///
    /// Never fails: every problem is logged and counted in the report.
    pub async fn sweep_at(&self, now: SystemTime) -> SweepReport {
        let (mut report, failed) = self.reap_tracked(now).await;
        report.merge(self.reap_untracked(now, &failed).await);

        let tracked = self.len().await;
        {
            let mut stats = self.stats.lock().await;
            stats.record_sweep(&report);
            stats.set_tracked_files(tracked);
        }

        if report.deleted() > 0 || report.failures > 0 {
            info!(
                "Sweep: deleted {} tracked and {} untracked files, {} failures, {} still tracked",
                report.tracked_deleted, report.untracked_deleted, report.failures, tracked
            );
        } else {
            debug!("Sweep: no expired files found, {} tracked", tracked);
        }

        report
    }

    // == Manual Cleanup ==
    /// Sweeps immediately and returns the number of files deleted.
    pub async fn manual_cleanup(&self) -> usize {
        self.manual_sweep().await.deleted()
    }

    /// Sweeps immediately and returns the full report.
    pub async fn manual_sweep(&self) -> SweepReport {
        info!("Manual cleanup triggered");
        let report = self.sweep().await;
        self.stats.lock().await.record_manual_cleanup();
        report
    }

    // == Tracked Pass ==
    /// Deletes tracked files older than the expiry window at `now`.
    ///
    /// Expired entries leave the map whether or not the delete succeeds.
    /// Entries whose file vanished before expiry are forgotten.
    pub async fn reap_tracked_at(&self, now: SystemTime) -> SweepReport {
        self.reap_tracked(now).await.0
    }

    /// Tracked pass that also returns the paths it failed to delete.
    async fn reap_tracked(&self, now: SystemTime) -> (SweepReport, HashSet<PathBuf>) {
        let expiry = self.config.expiry;
        let mut report = SweepReport::default();
        let mut failed = HashSet::new();

        // Claim expired entries under the lock before touching the disk
        let (expired, live): (Vec<TrackedFile>, Vec<PathBuf>) = {
            let mut files = self.files.write().await;
            let expired_paths: Vec<PathBuf> = files
                .values()
                .filter(|file| file.is_expired_at(now, expiry))
                .map(|file| file.path.clone())
                .collect();
            let expired = expired_paths
                .iter()
                .filter_map(|path| files.remove(path))
                .collect();
            (expired, files.keys().cloned().collect())
        };

        for file in expired {
            match fs::remove_file(&file.path).await {
                Ok(()) => {
                    info!("Deleted expired file: {}", file.path.display());
                    report.tracked_deleted += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("Expired file already gone: {}", file.path.display());
                    report.tracked_deleted += 1;
                }
                Err(e) => {
                    warn!("Error deleting file {}: {}", file.path().display(), e);
                    report.failures += 1;
                    failed.insert(file.path);
                }
            }
        }

        let mut vanished = Vec::new();
        for path in live {
            if let Ok(false) = fs::try_exists(&path).await {
                vanished.push(path);
            }
        }

        if !vanished.is_empty() {
            let mut files = self.files.write().await;
            for path in &vanished {
                if files.remove(path).is_some() {
                    info!("Tracked file removed externally: {}", path.display());
                    report.vanished += 1;
                }
            }
        }

        (report, failed)
    }

    // == Untracked Pass ==
    /// Deletes regular files in the backing directory that the map does not
    /// know about and whose modification time is past the expiry window.
    pub async fn reap_untracked_at(&self, now: SystemTime) -> SweepReport {
        self.reap_untracked(now, &HashSet::new()).await
    }

    /// Untracked pass that leaves `skip` alone.
    ///
    /// `skip` holds files the tracked pass of the same sweep already failed
    /// to delete; they wait for the next sweep.
    async fn reap_untracked(&self, now: SystemTime, skip: &HashSet<PathBuf>) -> SweepReport {
        let dir = &self.config.scratch_dir;
        let mut report = SweepReport::default();

        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                error!("Error cleaning up directory {}: {}", dir.display(), e);
                return report;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    error!("Error listing directory {}: {}", dir.display(), e);
                    break;
                }
            };

            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    warn!("Cannot stat {}: {}", path.display(), e);
                    continue;
                }
            }

            if skip.contains(&path) || self.is_tracked(&path).await {
                continue;
            }
            if !is_expired(&path, self.config.expiry, Some(now)).await {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    info!("Deleted untracked expired file: {}", path.display());
                    report.untracked_deleted += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("Untracked file already gone: {}", path.display());
                }
                Err(e) => {
                    warn!("Error deleting untracked file {}: {}", path.display(), e);
                    report.failures += 1;
                }
            }
        }

        report
    }

    /// Counts an upload refused before it reached [`Self::save_upload`].
    pub async fn record_rejected(&self) {
        self.stats.lock().await.record_rejected();
    }

    // == Queries ==
    /// Snapshot of tracked files, oldest first.
    pub async fn tracked_files(&self) -> Vec<TrackedFile> {
        let mut files: Vec<TrackedFile> = self.files.read().await.values().cloned().collect();
        files.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.path.cmp(&b.path))
        });
        files
    }

    /// Registration time of a tracked path.
    pub async fn created_at(&self, path: &Path) -> Option<SystemTime> {
        self.files.read().await.get(path).map(|file| file.created_at)
    }

    /// Returns true if `path` is in the map.
    pub async fn is_tracked(&self, path: &Path) -> bool {
        self.files.read().await.contains_key(path)
    }

    /// Returns the current number of tracked files.
    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    /// Returns true if nothing is tracked.
    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }

    /// Returns current statistics.
    pub async fn stats(&self) -> ScratchStats {
        let tracked = self.len().await;
        let mut stats = self.stats.lock().await.clone();
        stats.set_tracked_files(tracked);
        stats
    }

    /// Returns the backing directory.
    pub fn scratch_dir(&self) -> &Path {
        &self.config.scratch_dir
    }

    /// Returns the limits this registry was built with.
    pub fn config(&self) -> &ScratchConfig {
        &self.config
    }
}

/// Creates `path` (which must not exist yet) and writes `bytes` to it.
async fn write_new_file(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::create_dir_all(dir).await?;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}
