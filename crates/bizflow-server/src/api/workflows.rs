//! Workflow trigger endpoints.
//!
//! Each domain gets a POST route that serializes the request body and
//! hands it to a fixed entry workflow:
//!
//! POST /api/onboarding            → onboarding_workflow
//! POST /api/document/{action}     → document_router
//! POST /api/ui/{action}           → ui_workflow
//! POST /api/calendar/{action}     → calendar_workflow
//! POST /api/marketing/{action}    → marketing_router
//!
//! Action routes prefix the serialized body with the action verb so the
//! entry workflow (or its router) can see what was asked for.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};

use bizflow_core::state::AppState;
use bizflow_core::{ExecutionResult, WorkflowError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/onboarding", post(run_onboarding))
        .route("/api/document/{action}", post(run_document))
        .route("/api/ui/{action}", post(run_ui))
        .route("/api/calendar/{action}", post(run_calendar))
        .route("/api/marketing/{action}", post(run_marketing))
}

async fn run_onboarding(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, WorkflowError> {
    execute(&state, "onboarding_workflow", body.to_string()).await
}

async fn run_document(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, WorkflowError> {
    execute(&state, "document_router", action_input(&action, &body)).await
}

async fn run_ui(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, WorkflowError> {
    execute(&state, "ui_workflow", action_input(&action, &body)).await
}

async fn run_calendar(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, WorkflowError> {
    execute(&state, "calendar_workflow", action_input(&action, &body)).await
}

async fn run_marketing(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, WorkflowError> {
    execute(&state, "marketing_router", action_input(&action, &body)).await
}

fn action_input(action: &str, body: &serde_json::Value) -> String {
    format!("{}: {}", action, body)
}

async fn execute(
    state: &AppState,
    workflow: &str,
    input: String,
) -> Result<Json<serde_json::Value>, WorkflowError> {
    tracing::info!(workflow, "triggering workflow");
    let ExecutionResult { output, transcript } = state.executor.execute(workflow, &input).await?;
    Ok(Json(serde_json::json!({
        "result": output,
        "transcript": transcript,
    })))
}
