//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Reaper: sweeps expired scratch files at the configured interval

mod reaper;

pub use reaper::spawn_reaper_task;
