//! Read-only catalog introspection.
//!
//! GET /api/agents    — every registered agent
//! GET /api/workflows — every registered workflow descriptor

use axum::{extract::State, routing::get, Json, Router};

use bizflow_core::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/agents", get(list_agents))
        .route("/api/workflows", get(list_workflows))
}

async fn list_agents(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut agents: Vec<_> = state.agents.all().collect();
    agents.sort_by(|a, b| a.name.cmp(&b.name));
    Json(serde_json::json!({ "agents": agents }))
}

async fn list_workflows(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut workflows: Vec<_> = state.workflows.all().collect();
    workflows.sort_by(|a, b| a.name().cmp(b.name()));
    Json(serde_json::json!({ "workflows": workflows }))
}
