//! Scratch Module
//!
//! Per-upload scratch files: naming, tracking, expiry policy and reaping.

mod entry;
mod expiry;
mod naming;
mod registry;
mod stats;


// Re-export public types
pub use entry::TrackedFile;
pub use expiry::{age_at, check_upload_size, has_outlived, is_expired, is_large_upload};
pub use naming::{format_file_size, is_accepted_type, output_file_name, scratch_file_name};
pub use registry::{ScratchRegistry, SweepReport};
pub use stats::ScratchStats;

// == Public Constants ==
/// Fraction of the upload limit above which an upload is logged as large
pub const LARGE_UPLOAD_RATIO: f64 = 0.7;
