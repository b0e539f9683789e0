//! Naming Helpers
//!
//! Scratch file names, accepted-type checks and display formatting for uploads.

use std::path::Path;

use uuid::Uuid;

// == Scratch File Name ==
/// Builds a collision-free on-disk name for an upload.
///
/// The name is a fresh v4 UUID followed by the original extension. The
/// original base name is never used, so hostile names cannot escape the
/// backing directory. Extensions that are not plain ASCII alphanumerics are
/// dropped.
pub fn scratch_file_name(original_name: &str) -> String {
    let id = Uuid::new_v4();
    match extension_of(original_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

// == Accepted Type ==
/// Case-insensitive check of the file extension against `accepted`.
pub fn is_accepted_type(file_name: &str, accepted: &[String]) -> bool {
    match extension_of(file_name) {
        Some(ext) => accepted.iter().any(|t| t.eq_ignore_ascii_case(&ext)),
        None => false,
    }
}

// == Output File Name ==
/// Name offered for the converted Markdown download, e.g. `report.docx` -> `report.md`.
pub fn output_file_name(input_name: &str) -> String {
    let stem = Path::new(input_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document");
    format!("{}.md", stem)
}

// == Human Readable Size ==
/// Formats a byte count as `N bytes`, `x.y KB` or `x.y MB`.
pub fn format_file_size(size_bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if size_bytes < KB {
        format!("{} bytes", size_bytes)
    } else if size_bytes < MB {
        format!("{:.1} KB", size_bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", size_bytes as f64 / MB as f64)
    }
}

/// Lower-cased extension of the final path component, if it is safe to reuse.
fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
