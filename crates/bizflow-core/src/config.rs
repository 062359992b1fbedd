//! Storage root configuration.
//!
//! All persisted state is plain JSON and text files under one root
//! directory, organized by category/type/subtype. `BUSINESS_WORKFLOW_DIR`
//! overrides the root; the default is a fixed per-user data path.

use std::path::{Path, PathBuf};

/// Environment variable overriding the storage root.
pub const ROOT_DIR_ENV: &str = "BUSINESS_WORKFLOW_DIR";

#[derive(Debug, Clone)]
pub struct StorageConfig {
    base_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve the storage root: `BUSINESS_WORKFLOW_DIR` if set, otherwise
    /// `<user data dir>/bizflow`.
    pub fn from_env() -> Self {
        let base_dir = std::env::var(ROOT_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("bizflow")
            });
        Self::new(base_dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn business_dir(&self) -> PathBuf {
        self.data_dir().join("business")
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir().join("documents")
    }

    pub fn calendar_dir(&self) -> PathBuf {
        self.data_dir().join("calendar")
    }

    pub fn ui_assets_dir(&self) -> PathBuf {
        self.data_dir().join("ui_assets")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.base_dir.join("downloads")
    }
}
