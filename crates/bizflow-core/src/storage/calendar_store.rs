//! Calendar events and tasks.
//!
//! One JSON file per item under `data/calendar/`, prefixed by kind
//! (`event_*.json`, `task_*.json`). Items without an `id` get a generated
//! `<kind>_<unix timestamp>` id. Saves mirror into the downloads area.

use crate::config::StorageConfig;
use crate::error::WorkflowError;

use super::{ensure_dir, now_iso, read_json, safe_filename, write_json, DownloadStore};

pub struct CalendarStore {
    config: StorageConfig,
    downloads: DownloadStore,
}

impl CalendarStore {
    pub fn new(config: StorageConfig) -> Self {
        let downloads = DownloadStore::new(config.clone());
        Self { config, downloads }
    }

    /// Save a calendar event, generating an `event_<ts>` id when absent.
    /// Returns the event id.
    pub fn save_event(&self, event: serde_json::Value) -> Result<String, WorkflowError> {
        self.save_item("event", "events", event)
    }

    /// Save a task, generating a `task_<ts>` id when absent.
    pub fn save_task(&self, task: serde_json::Value) -> Result<String, WorkflowError> {
        self.save_item("task", "tasks", task)
    }

    fn save_item(
        &self,
        kind: &str,
        download_subtype: &str,
        item: serde_json::Value,
    ) -> Result<String, WorkflowError> {
        let mut item = item;
        let Some(object) = item.as_object_mut() else {
            return Err(WorkflowError::BadRequest(format!(
                "Calendar {} must be a JSON object",
                kind
            )));
        };

        let id = match object.get("id").and_then(|v| v.as_str()) {
            Some(id) => id.to_string(),
            None => {
                let id = format!("{}_{}", kind, chrono::Utc::now().timestamp());
                object.insert("id".to_string(), serde_json::json!(id));
                id
            }
        };
        safe_filename(&id)?;
        object.insert("updated_at".to_string(), serde_json::json!(now_iso()));

        let dir = self.config.calendar_dir();
        ensure_dir(&dir)?;
        let filename = if id.starts_with(&format!("{}_", kind)) {
            format!("{}.json", id)
        } else {
            format!("{}_{}.json", kind, id)
        };
        let path = dir.join(&filename);
        write_json(&path, &item)?;

        let mirrored = serde_json::to_string_pretty(&item)
            .map_err(|e| WorkflowError::storage("serialize", &path, e))?;
        self.downloads
            .stage("calendar", download_subtype, &filename, &mirrored)?;

        tracing::info!(kind, id = %id, "saved calendar item");
        Ok(id)
    }

    /// Get one event by id.
    pub fn event(&self, id: &str) -> Result<Option<serde_json::Value>, WorkflowError> {
        self.item("event", id)
    }

    /// Get one task by id.
    pub fn task(&self, id: &str) -> Result<Option<serde_json::Value>, WorkflowError> {
        self.item("task", id)
    }

    fn item(&self, kind: &str, id: &str) -> Result<Option<serde_json::Value>, WorkflowError> {
        safe_filename(id)?;
        let filename = if id.starts_with(&format!("{}_", kind)) {
            format!("{}.json", id)
        } else {
            format!("{}_{}.json", kind, id)
        };
        let path = self.config.calendar_dir().join(filename);
        if !path.is_file() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    /// List events, filtered by an inclusive date range when both bounds
    /// are given. The event date is `date` or `start_date`.
    pub fn events(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, WorkflowError> {
        let items = self.list_kind("event_")?;
        let filtered = match (start_date, end_date) {
            (Some(start), Some(end)) => items
                .into_iter()
                .filter(|event| {
                    event
                        .get("date")
                        .or_else(|| event.get("start_date"))
                        .and_then(|v| v.as_str())
                        .is_some_and(|date| start <= date && date <= end)
                })
                .collect(),
            _ => items,
        };
        Ok(filtered)
    }

    /// List tasks, optionally filtered by `status`.
    pub fn tasks(&self, status: Option<&str>) -> Result<Vec<serde_json::Value>, WorkflowError> {
        let items = self.list_kind("task_")?;
        let filtered = match status {
            Some(want) => items
                .into_iter()
                .filter(|task| task.get("status").and_then(|v| v.as_str()) == Some(want))
                .collect(),
            None => items,
        };
        Ok(filtered)
    }

    fn list_kind(&self, prefix: &str) -> Result<Vec<serde_json::Value>, WorkflowError> {
        let dir = self.config.calendar_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let read = std::fs::read_dir(&dir).map_err(|e| WorkflowError::storage("list", &dir, e))?;
        let mut items = Vec::new();
        for entry in read.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with(prefix) && name.ends_with(".json") {
                items.push(read_json(&path)?);
            }
        }
        items.sort_by(|a, b| {
            let a_id = a.get("id").and_then(|v| v.as_str()).unwrap_or_default();
            let b_id = b.get("id").and_then(|v| v.as_str()).unwrap_or_default();
            a_id.cmp(b_id)
        });
        Ok(items)
    }
}
