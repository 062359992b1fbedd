//! Flat-file storage adapter.
//!
//! Category-keyed JSON blobs, typed documents with sidecar metadata,
//! calendar events/tasks, and named UI assets, all as plain files under
//! the configured root. Every successful write is mirrored into a
//! download-staging area partitioned by `(content_type, subtype)`; the
//! HTTP download route serves only from that staging area.
//!
//! I/O is synchronous per call. Concurrent writers to the same file are
//! not coordinated; last write wins.

pub mod asset_store;
pub mod business_store;
pub mod calendar_store;
pub mod document_store;
pub mod download_store;

pub use asset_store::AssetStore;
pub use business_store::BusinessStore;
pub use calendar_store::CalendarStore;
pub use document_store::{DocumentEntry, DocumentRecord, DocumentStore};
pub use download_store::{DownloadEntry, DownloadStore};

use std::path::Path;

use crate::error::WorkflowError;

/// Sidecar metadata files share the directory of the file they describe.
pub(crate) fn is_metadata_sidecar(filename: &str) -> bool {
    filename.ends_with("_metadata.json")
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<(), WorkflowError> {
    std::fs::create_dir_all(dir).map_err(|e| WorkflowError::storage("create_dir", dir, e))
}

pub(crate) fn write_text(path: &Path, content: &str) -> Result<(), WorkflowError> {
    std::fs::write(path, content).map_err(|e| WorkflowError::storage("write", path, e))
}

pub(crate) fn write_json(path: &Path, value: &serde_json::Value) -> Result<(), WorkflowError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| WorkflowError::storage("serialize", path, e))?;
    write_text(path, &text)
}

pub(crate) fn read_json(path: &Path) -> Result<serde_json::Value, WorkflowError> {
    let text =
        std::fs::read_to_string(path).map_err(|e| WorkflowError::storage("read", path, e))?;
    serde_json::from_str(&text).map_err(|e| WorkflowError::storage("parse", path, e))
}

/// Reject filenames that could escape their directory.
pub(crate) fn safe_filename(name: &str) -> Result<(), WorkflowError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(WorkflowError::BadRequest(format!("Invalid filename: {}", name)));
    }
    Ok(())
}

/// ISO-8601 timestamp for `updated_at` / `created_at` stamps.
pub(crate) fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}
