//! Download staging area.
//!
//! Mirrored copies of every stored file, partitioned by
//! `(content_type, subtype)`, each with a metadata sidecar recording the
//! public download path. The HTTP gateway's download route resolves and
//! streams exclusively from here.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::error::WorkflowError;

use super::{ensure_dir, is_metadata_sidecar, now_iso, safe_filename, write_json, write_text};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadEntry {
    pub filename: String,
    pub content_type: String,
    pub subtype: String,
    pub download_path: String,
}

#[derive(Debug, Clone)]
pub struct DownloadStore {
    config: StorageConfig,
}

impl DownloadStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Stage a copy of a stored file, returning its public download path.
    pub fn stage(
        &self,
        content_type: &str,
        subtype: &str,
        filename: &str,
        content: &str,
    ) -> Result<String, WorkflowError> {
        safe_filename(filename)?;
        let dir = self.config.downloads_dir().join(content_type).join(subtype);
        ensure_dir(&dir)?;

        let path = dir.join(filename);
        write_text(&path, content)?;

        let download_path = format!("/api/download/{}/{}/{}", content_type, subtype, filename);
        let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
        let sidecar = dir.join(format!("{}_metadata.json", stem));
        write_json(
            &sidecar,
            &serde_json::json!({
                "filename": filename,
                "content_type": content_type,
                "subtype": subtype,
                "download_path": download_path,
                "staged_at": now_iso(),
            }),
        )?;

        tracing::debug!(path = %path.display(), "staged download");
        Ok(download_path)
    }

    /// Resolve a `(content_type, subtype, filename)` triple to a file path,
    /// if the file has been staged.
    pub fn resolve(&self, content_type: &str, subtype: &str, filename: &str) -> Option<PathBuf> {
        safe_filename(filename).ok()?;
        safe_filename(content_type).ok()?;
        safe_filename(subtype).ok()?;
        let path = self
            .config
            .downloads_dir()
            .join(content_type)
            .join(subtype)
            .join(filename);
        path.is_file().then_some(path)
    }

    /// List staged downloads, optionally filtered by content type and
    /// subtype. Sidecar metadata files are never listed.
    pub fn list(
        &self,
        content_type: Option<&str>,
        subtype: Option<&str>,
    ) -> Result<Vec<DownloadEntry>, WorkflowError> {
        let mut entries = Vec::new();
        let root = self.config.downloads_dir();
        if !root.is_dir() {
            return Ok(entries);
        }

        for ct_dir in read_dirs(&root)? {
            let ct_name = dir_name(&ct_dir);
            if content_type.is_some_and(|want| want != ct_name) {
                continue;
            }
            for st_dir in read_dirs(&ct_dir)? {
                let st_name = dir_name(&st_dir);
                if subtype.is_some_and(|want| want != st_name) {
                    continue;
                }
                let read = std::fs::read_dir(&st_dir)
                    .map_err(|e| WorkflowError::storage("list", &st_dir, e))?;
                for entry in read.flatten() {
                    let path = entry.path();
                    let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    if !path.is_file() || is_metadata_sidecar(filename) {
                        continue;
                    }
                    entries.push(DownloadEntry {
                        filename: filename.to_string(),
                        content_type: ct_name.clone(),
                        subtype: st_name.clone(),
                        download_path: format!(
                            "/api/download/{}/{}/{}",
                            ct_name, st_name, filename
                        ),
                    });
                }
            }
        }

        entries.sort_by(|a, b| a.download_path.cmp(&b.download_path));
        Ok(entries)
    }
}

fn read_dirs(dir: &std::path::Path) -> Result<Vec<PathBuf>, WorkflowError> {
    let read = std::fs::read_dir(dir).map_err(|e| WorkflowError::storage("list", dir, e))?;
    Ok(read
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect())
}

fn dir_name(path: &std::path::Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
