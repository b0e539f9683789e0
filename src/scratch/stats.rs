//! Scratch Statistics Module
//!
//! Tracks upload and reaping counters for the registry.

use serde::Serialize;

use crate::scratch::SweepReport;

// == Scratch Stats ==
/// Counters describing registry activity since start-up.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScratchStats {
    /// Uploads written to the backing directory
    pub uploads_saved: u64,
    /// Uploads refused for exceeding the size limit
    pub uploads_rejected: u64,
    /// Tracked files deleted after expiry
    pub tracked_reaped: u64,
    /// Untracked files deleted after expiry
    pub untracked_reaped: u64,
    /// Tracked entries dropped because their file disappeared
    pub vanished: u64,
    /// Deletions that failed and were left for a later sweep
    pub delete_failures: u64,
    /// Completed sweeps, scheduled or manual
    pub sweeps: u64,
    /// Sweeps triggered through manual cleanup
    pub manual_cleanups: u64,
    /// Current number of tracked files
    pub tracked_files: usize,
}

impl ScratchStats {
    // == Constructor ==
    /// Creates a new ScratchStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a stored upload.
    pub fn record_saved(&mut self) {
        self.uploads_saved += 1;
    }

    /// Counts an upload refused for its size.
    pub fn record_rejected(&mut self) {
        self.uploads_rejected += 1;
    }

    // == Record Sweep ==
    /// Folds one sweep's outcome into the totals.
    pub fn record_sweep(&mut self, report: &SweepReport) {
        self.tracked_reaped += report.tracked_deleted as u64;
        self.untracked_reaped += report.untracked_deleted as u64;
        self.vanished += report.vanished as u64;
        self.delete_failures += report.failures as u64;
        self.sweeps += 1;
    }

    /// Counts a manual cleanup request.
    pub fn record_manual_cleanup(&mut self) {
        self.manual_cleanups += 1;
    }

    // == Update Entry Count ==
    /// Updates the tracked files count.
    pub fn set_tracked_files(&mut self, count: usize) {
        self.tracked_files = count;
    }

    /// Total files deleted by all sweeps.
    pub fn total_reaped(&self) -> u64 {
        self.tracked_reaped + self.untracked_reaped
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = ScratchStats::new();
        assert_eq!(stats.uploads_saved, 0);
        assert_eq!(stats.uploads_rejected, 0);
        assert_eq!(stats.sweeps, 0);
        assert_eq!(stats.tracked_files, 0);
        assert_eq!(stats.total_reaped(), 0);
    }

    #[test]
    fn test_record_uploads() {
        let mut stats = ScratchStats::new();
        stats.record_saved();
        stats.record_saved();
        stats.record_rejected();
        assert_eq!(stats.uploads_saved, 2);
        assert_eq!(stats.uploads_rejected, 1);
    }

    #[test]
    fn test_record_sweep_accumulates() {
        let mut stats = ScratchStats::new();
        let report = SweepReport {
            tracked_deleted: 2,
            untracked_deleted: 1,
            vanished: 1,
            failures: 3,
        };
        stats.record_sweep(&report);
        stats.record_sweep(&SweepReport::default());

        assert_eq!(stats.tracked_reaped, 2);
        assert_eq!(stats.untracked_reaped, 1);
        assert_eq!(stats.vanished, 1);
        assert_eq!(stats.delete_failures, 3);
        assert_eq!(stats.sweeps, 2);
        assert_eq!(stats.total_reaped(), 3);
    }

    #[test]
    fn test_set_tracked_files() {
        let mut stats = ScratchStats::new();
        stats.set_tracked_files(42);
        assert_eq!(stats.tracked_files, 42);
    }
}
