//! Scratch Reaper - Upload scratch files for a document-to-Markdown converter
//!
//! Saves each upload as a uniquely named scratch file, tracks its age, and
//! reclaims expired files with a background reaper and on-demand cleanup.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod scratch;
pub mod tasks;

pub use api::AppState;
pub use config::{Config, ScratchConfig};
pub use error::{Result, ScratchError};
pub use scratch::{ScratchRegistry, SweepReport};
pub use tasks::spawn_reaper_task;
