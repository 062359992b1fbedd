pub mod catalog;
pub mod downloads;
pub mod workflows;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use bizflow_core::state::AppState;

/// Build the complete API router with all sub-routes.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(workflows::router())
        .merge(downloads::router())
        .merge(catalog::router())
        .route("/api/config", get(get_config))
}

/// GET /api/config — the resolved storage layout.
async fn get_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = &state.storage_config;
    Json(serde_json::json!({
        "base_dir": config.base_dir().display().to_string(),
        "data_dir": config.data_dir().display().to_string(),
        "downloads_dir": config.downloads_dir().display().to_string(),
    }))
}
