//! Artifact download endpoints.
//!
//! GET /api/download/{content_type}/{subtype}/{filename} — stream a staged file
//! GET /api/downloads?content_type=&subtype=             — list staged files
//!
//! Files are served only from the download staging area; the triple is
//! validated against path traversal by the store.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use bizflow_core::state::AppState;
use bizflow_core::WorkflowError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/download/{content_type}/{subtype}/{filename}",
            get(download_file),
        )
        .route("/api/downloads", get(list_downloads))
}

async fn download_file(
    State(state): State<AppState>,
    Path((content_type, subtype, filename)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, WorkflowError> {
    let path = state
        .download_store
        .resolve(&content_type, &subtype, &filename)
        .ok_or_else(|| {
            WorkflowError::NotFound(format!(
                "No staged file '{}/{}/{}'",
                content_type, subtype, filename
            ))
        })?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| WorkflowError::storage("read", &path, e))?;

    let headers = [
        (header::CONTENT_TYPE, mime_for(&filename).to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, bytes))
}

#[derive(Debug, Deserialize)]
struct DownloadsQuery {
    content_type: Option<String>,
    subtype: Option<String>,
}

async fn list_downloads(
    State(state): State<AppState>,
    Query(query): Query<DownloadsQuery>,
) -> Result<Json<serde_json::Value>, WorkflowError> {
    let entries = state
        .download_store
        .list(query.content_type.as_deref(), query.subtype.as_deref())?;
    Ok(Json(serde_json::json!({ "downloads": entries })))
}

/// Infer the response content type from the file extension.
fn mime_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_inference() {
        assert_eq!(mime_for("report.pdf"), "application/pdf");
        assert_eq!(mime_for("theme.CSS"), "text/css");
        assert_eq!(mime_for("photo.jpeg"), "image/jpeg");
        assert_eq!(mime_for("archive.tar.gz"), "application/octet-stream");
        assert_eq!(mime_for("no_extension"), "application/octet-stream");
    }
}
