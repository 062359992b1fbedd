pub mod list;
pub mod run;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use bizflow_core::runtime::HttpAgentRuntime;
use bizflow_core::state::{AppState, AppStateInner};
use bizflow_core::StorageConfig;

/// Build the shared application state used by the `run` and `serve`
/// commands.
pub fn init_state(
    data_dir: Option<&str>,
    declarations: Option<&str>,
) -> Result<AppState, String> {
    let storage_config = match data_dir {
        Some(dir) => StorageConfig::new(dir),
        None => StorageConfig::from_env(),
    };

    let runtime = HttpAgentRuntime::from_env()
        .map_err(|e| format!("Failed to configure agent runtime: {}", e))?;

    let inner = AppStateInner::new(
        storage_config,
        Arc::new(runtime),
        declarations.map(Path::new),
    )
    .map_err(|e| format!("Failed to initialize state: {}", e))?;

    Ok(Arc::new(inner))
}
