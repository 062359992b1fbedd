//! Typed documents with optional sidecar metadata.
//!
//! Layout: `data/documents/<document_type>/<filename>` plus
//! `<stem>_metadata.json` when metadata is provided. Saves mirror into
//! the downloads area under `("document", document_type)`.

use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::error::WorkflowError;

use super::{
    ensure_dir, is_metadata_sidecar, now_iso, read_json, safe_filename, write_json, write_text,
    DownloadStore,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub content: String,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub filename: String,
    pub document_type: String,
}

pub struct DocumentStore {
    config: StorageConfig,
    downloads: DownloadStore,
}

impl DocumentStore {
    pub fn new(config: StorageConfig) -> Self {
        let downloads = DownloadStore::new(config.clone());
        Self { config, downloads }
    }

    /// Save a document, returning its public download path.
    pub fn save(
        &self,
        document_type: &str,
        filename: &str,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<String, WorkflowError> {
        safe_filename(document_type)?;
        safe_filename(filename)?;

        let dir = self.config.documents_dir().join(document_type);
        ensure_dir(&dir)?;
        write_text(&dir.join(filename), content)?;

        if let Some(mut metadata) = metadata {
            if let Some(object) = metadata.as_object_mut() {
                object.insert("filename".to_string(), serde_json::json!(filename));
                object.insert("document_type".to_string(), serde_json::json!(document_type));
                object.insert("created_at".to_string(), serde_json::json!(now_iso()));
            }
            let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
            write_json(&dir.join(format!("{}_metadata.json", stem)), &metadata)?;
        }

        let download_path = self
            .downloads
            .stage("document", document_type, filename, content)?;
        tracing::info!(document_type, filename, "saved document");
        Ok(download_path)
    }

    pub fn get(
        &self,
        document_type: &str,
        filename: &str,
    ) -> Result<Option<DocumentRecord>, WorkflowError> {
        safe_filename(document_type)?;
        safe_filename(filename)?;
        let dir = self.config.documents_dir().join(document_type);
        let path = dir.join(filename);
        if !path.is_file() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&path).map_err(|e| WorkflowError::storage("read", &path, e))?;

        let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
        let sidecar = dir.join(format!("{}_metadata.json", stem));
        let metadata = if sidecar.is_file() {
            Some(read_json(&sidecar)?)
        } else {
            None
        };

        Ok(Some(DocumentRecord { content, metadata }))
    }

    /// List documents, optionally filtered by type. Sidecars excluded.
    pub fn list(&self, document_type: Option<&str>) -> Result<Vec<DocumentEntry>, WorkflowError> {
        let root = self.config.documents_dir();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let type_dirs: Vec<std::path::PathBuf> = match document_type {
            Some(doc_type) => {
                safe_filename(doc_type)?;
                let dir = root.join(doc_type);
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

        let mut documents = Vec::new();
        for dir in type_dirs {
            let doc_type = dir
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
                    documents.push(DocumentEntry {
                        filename: name.to_string(),
                        document_type: doc_type.clone(),
                    });
                }
            }
        }

        documents.sort_by(|a, b| {
            (&a.document_type, &a.filename).cmp(&(&b.document_type, &b.filename))
        });
        Ok(documents)
    }
}
