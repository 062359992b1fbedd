//! Core error type for the bizflow platform.
//!
//! `WorkflowError` is used throughout the core domain (registries, executor,
//! storage). When the `axum` feature is enabled, it also implements
//! `IntoResponse` so it can be used directly as an axum handler error type.

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// A workflow step referenced a name present in neither registry.
    #[error("Unknown target '{0}': not a registered workflow or agent")]
    UnknownTarget(String),

    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    /// A router selected something outside its declared candidate set.
    #[error("Router '{router}' selected undeclared candidate: {choice}")]
    InvalidRoute { router: String, choice: String },

    /// A workflow reference cycle (direct or transitive) was detected.
    #[error("Workflow composition cycle detected at '{0}'")]
    CompositionCycle(String),

    #[error("Storage {op} failed for '{path}': {message}")]
    Storage {
        op: &'static str,
        path: String,
        message: String,
    },

    /// Opaque failure surfaced by the external agent runtime.
    #[error("Agent runtime failure: {0}")]
    Runtime(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl WorkflowError {
    /// Wrap an I/O or serialization failure with the operation and path
    /// it occurred on.
    pub fn storage(op: &'static str, path: impl AsRef<std::path::Path>, err: impl std::fmt::Display) -> Self {
        WorkflowError::Storage {
            op,
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// axum integration (opt-in via feature flag)
// ---------------------------------------------------------------------------

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for WorkflowError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
            WorkflowError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WorkflowError::DuplicateName(_) => StatusCode::CONFLICT,
            WorkflowError::UnknownAgent(_)
            | WorkflowError::UnknownTarget(_)
            | WorkflowError::InvalidRoute { .. }
            | WorkflowError::CompositionCycle(_)
            | WorkflowError::Storage { .. }
            | WorkflowError::Runtime(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Only the descriptive message leaves the process, never a backtrace.
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_carries_context() {
        let err = WorkflowError::storage("write", "/tmp/data/business/profile.json", "disk full");
        let msg = err.to_string();
        assert!(msg.contains("write"));
        assert!(msg.contains("profile.json"));
        assert!(msg.contains("disk full"));
    }
}
