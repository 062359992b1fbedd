//! Category-keyed business data blobs.
//!
//! One JSON object per category under `data/business/<category>.json`;
//! every save stamps `updated_at` and mirrors into the downloads area.

use crate::config::StorageConfig;
use crate::error::WorkflowError;

use super::{ensure_dir, now_iso, read_json, safe_filename, write_json, DownloadStore};

pub struct BusinessStore {
    config: StorageConfig,
    downloads: DownloadStore,
}

impl BusinessStore {
    pub fn new(config: StorageConfig) -> Self {
        let downloads = DownloadStore::new(config.clone());
        Self { config, downloads }
    }

    /// Save a business data object under a category, stamping `updated_at`.
    /// Returns the stored value.
    pub fn save(
        &self,
        category: &str,
        data: serde_json::Value,
    ) -> Result<serde_json::Value, WorkflowError> {
        safe_filename(category)?;
        let mut data = data;
        let Some(object) = data.as_object_mut() else {
            return Err(WorkflowError::BadRequest(
                "Business data must be a JSON object".to_string(),
            ));
        };
        object.insert("updated_at".to_string(), serde_json::json!(now_iso()));

        let dir = self.config.business_dir();
        ensure_dir(&dir)?;
        let path = dir.join(format!("{}.json", category));
        write_json(&path, &data)?;

        let mirrored = serde_json::to_string_pretty(&data)
            .map_err(|e| WorkflowError::storage("serialize", &path, e))?;
        self.downloads
            .stage("business", "data", &format!("{}.json", category), &mirrored)?;

        tracing::info!(category, "saved business data");
        Ok(data)
    }

    pub fn get(&self, category: &str) -> Result<Option<serde_json::Value>, WorkflowError> {
        safe_filename(category)?;
        let path = self.config.business_dir().join(format!("{}.json", category));
        if !path.is_file() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    /// List all saved category names.
    pub fn list(&self) -> Result<Vec<String>, WorkflowError> {
        let dir = self.config.business_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let read = std::fs::read_dir(&dir).map_err(|e| WorkflowError::storage("list", &dir, e))?;
        let mut categories: Vec<String> = read
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    path.file_stem()
                        .and_then(|s| s.to_str())
                        .map(|s| s.to_string())
                } else {
                    None
                }
            })
            .collect();
        categories.sort();
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, BusinessStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = BusinessStore::new(StorageConfig::new(dir.path()));
        (dir, store)
    }

    #[test]
    fn test_round_trip_adds_updated_at() {
        let (_dir, store) = store();
        let saved = store
            .save("profile", serde_json::json!({"company": "ACME Corp", "industry": "widgets"}))
            .unwrap();
        assert!(saved.get("updated_at").is_some());

        let loaded = store.get("profile").unwrap().unwrap();
        assert_eq!(loaded["company"], "ACME Corp");
        assert_eq!(loaded["industry"], "widgets");
        assert!(loaded.get("updated_at").is_some());
    }

    #[test]
    fn test_missing_category_is_none() {
        let (_dir, store) = store();
        assert!(store.get("nothing").unwrap().is_none());
    }

    #[test]
    fn test_list_categories() {
        let (_dir, store) = store();
        store.save("profile", serde_json::json!({})).unwrap();
        store.save("licenses", serde_json::json!({})).unwrap();
        assert_eq!(store.list().unwrap(), vec!["licenses", "profile"]);
    }

    #[test]
    fn test_save_mirrors_into_downloads() {
        let (dir, store) = store();
        store.save("profile", serde_json::json!({"a": 1})).unwrap();
        let staged = dir.path().join("downloads/business/data/profile.json");
        assert!(staged.is_file());
    }

    #[test]
    fn test_non_object_rejected() {
        let (_dir, store) = store();
        let err = store.save("profile", serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, WorkflowError::BadRequest(_)));
    }
}
