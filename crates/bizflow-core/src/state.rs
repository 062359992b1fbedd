//! Shared application state for the HTTP server and CLI.
//!
//! One immutable configuration object constructed at startup: both
//! registries, the composition executor, and the storage stores. There
//! is no ambient global lookup; every consumer receives the state
//! explicitly.

use std::path::Path;
use std::sync::Arc;

use crate::catalog;
use crate::config::StorageConfig;
use crate::error::WorkflowError;
use crate::executor::CompositionExecutor;
use crate::registry::{AgentRegistry, WorkflowRegistry};
use crate::runtime::AgentRuntime;
use crate::storage::{AssetStore, BusinessStore, CalendarStore, DocumentStore, DownloadStore};

/// Shared state accessible by all API handlers.
pub struct AppStateInner {
    pub agents: Arc<AgentRegistry>,
    pub workflows: Arc<WorkflowRegistry>,
    pub executor: CompositionExecutor,
    pub business_store: BusinessStore,
    pub document_store: DocumentStore,
    pub calendar_store: CalendarStore,
    pub asset_store: AssetStore,
    pub download_store: DownloadStore,
    pub storage_config: StorageConfig,
}

pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    /// Build the state from the built-in catalog, optionally extended
    /// with YAML declarations from a directory.
    pub fn new(
        storage_config: StorageConfig,
        runtime: Arc<dyn AgentRuntime>,
        declarations_dir: Option<&Path>,
    ) -> Result<Self, WorkflowError> {
        let (mut agents, mut workflows) = catalog::builtin_registries()?;
        if let Some(dir) = declarations_dir {
            let count = catalog::loader::load_dir(dir, &mut agents, &mut workflows)?;
            tracing::info!(count, dir = %dir.display(), "loaded extra declarations");
        }
        catalog::validate(&workflows, &agents);

        let agents = Arc::new(agents);
        let workflows = Arc::new(workflows);
        let executor = CompositionExecutor::new(agents.clone(), workflows.clone(), runtime);

        Ok(Self {
            agents,
            workflows,
            executor,
            business_store: BusinessStore::new(storage_config.clone()),
            document_store: DocumentStore::new(storage_config.clone()),
            calendar_store: CalendarStore::new(storage_config.clone()),
            asset_store: AssetStore::new(storage_config.clone()),
            download_store: DownloadStore::new(storage_config.clone()),
            storage_config,
        })
    }
}
