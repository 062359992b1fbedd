//! Named UI assets grouped by asset type.
//!
//! Layout: `data/ui_assets/<asset_type>/<filename>`. Saves mirror into
//! the downloads area under `("ui", asset_type)`.

use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::error::WorkflowError;

use super::{ensure_dir, is_metadata_sidecar, safe_filename, write_text, DownloadStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    pub filename: String,
    pub asset_type: String,
}

pub struct AssetStore {
    config: StorageConfig,
    downloads: DownloadStore,
}

impl AssetStore {
    pub fn new(config: StorageConfig) -> Self {
        let downloads = DownloadStore::new(config.clone());
        Self { config, downloads }
    }

    /// Save a UI asset, returning its public download path.
    pub fn save(
        &self,
        asset_type: &str,
        filename: &str,
        content: &str,
    ) -> Result<String, WorkflowError> {
        safe_filename(asset_type)?;
        safe_filename(filename)?;

        let dir = self.config.ui_assets_dir().join(asset_type);
        ensure_dir(&dir)?;
        write_text(&dir.join(filename), content)?;

        let download_path = self.downloads.stage("ui", asset_type, filename, content)?;
        tracing::info!(asset_type, filename, "saved ui asset");
        Ok(download_path)
    }

    pub fn get(&self, asset_type: &str, filename: &str) -> Result<Option<String>, WorkflowError> {
        safe_filename(asset_type)?;
        safe_filename(filename)?;
        let path = self.config.ui_assets_dir().join(asset_type).join(filename);
        if !path.is_file() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| WorkflowError::storage("read", &path, e))
    }

    /// List assets, optionally filtered by asset type.
    pub fn list(&self, asset_type: Option<&str>) -> Result<Vec<AssetEntry>, WorkflowError> {
        let root = self.config.ui_assets_dir();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let type_dirs: Vec<std::path::PathBuf> = match asset_type {
            Some(kind) => {
                safe_filename(kind)?;
                let dir = root.join(kind);
                if dir.is_dir() {
                    vec![dir]
                } else {
                    Vec::new()
                }
            }
            None => std::fs::read_dir(&root)
                .map_err(|e| WorkflowError::storage("list", &root, e))?
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect(),
        };

        let mut assets = Vec::new();
        for dir in type_dirs {
            let kind = dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let read =
                std::fs::read_dir(&dir).map_err(|e| WorkflowError::storage("list", &dir, e))?;
            for entry in read.flatten() {
                let path = entry.path();
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if path.is_file() && !is_metadata_sidecar(name) {
                    assets.push(AssetEntry {
                        filename: name.to_string(),
                        asset_type: kind.clone(),
                    });
                }
            }
        }

        assets.sort_by(|a, b| (&a.asset_type, &a.filename).cmp(&(&b.asset_type, &b.filename)));
        Ok(assets)
    }
}
