//! Bizflow Server — business workflow orchestration backend.
//!
//! A standalone Rust backend exposing the workflow platform over HTTP:
//! - RESTful API via axum for triggering workflow executions
//! - Download endpoints for generated artifacts
//! - Optional static frontend serving
//!
//! This crate can be used standalone (via `bizflow-cli serve`) or embedded
//! in other applications.

pub mod api;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bizflow_core::runtime::HttpAgentRuntime;
use bizflow_core::state::{AppState, AppStateInner};
use bizflow_core::StorageConfig;

/// Configuration for the bizflow backend server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Optional override for the storage root. When unset, the
    /// `BUSINESS_WORKFLOW_DIR` environment variable (or the platform
    /// data directory) decides.
    pub storage_dir: Option<String>,
    /// Optional directory of extra YAML agent/workflow declarations.
    pub declarations_dir: Option<String>,
    /// Optional path to static frontend files. When set, the server
    /// serves these files for all non-API routes.
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3220,
            storage_dir: None,
            declarations_dir: None,
            static_dir: None,
        }
    }
}

/// Create a shared `AppState` from the server configuration.
///
/// This is useful when you need to share the state between the HTTP server
/// and other consumers (e.g. a CLI `run` command).
pub fn create_app_state(config: &ServerConfig) -> Result<AppState, String> {
    let storage_config = match &config.storage_dir {
        Some(dir) => StorageConfig::new(dir),
        None => StorageConfig::from_env(),
    };

    let runtime = HttpAgentRuntime::from_env()
        .map_err(|e| format!("Failed to configure agent runtime: {}", e))?;

    let declarations = config.declarations_dir.as_deref().map(Path::new);
    let inner = AppStateInner::new(storage_config, Arc::new(runtime), declarations)
        .map_err(|e| format!("Failed to initialize state: {}", e))?;

    Ok(Arc::new(inner))
}

/// Start the backend server.
///
/// Returns the actual address the server is listening on.
pub async fn start_server(config: ServerConfig) -> Result<SocketAddr, String> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bizflow_server=info,tower_http=info".into()),
        )
        .init();

    tracing::info!(
        "Starting bizflow backend server on {}:{}",
        config.host,
        config.port
    );

    let state = create_app_state(&config)?;

    start_server_with_state(config, state).await
}

/// Start the HTTP server with a pre-built `AppState`.
pub async fn start_server_with_state(
    config: ServerConfig,
    state: AppState,
) -> Result<SocketAddr, String> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/", axum::routing::get(root))
        .merge(api::api_router())
        .route("/api/health", axum::routing::get(health_check))
        .layer(cors.clone())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Serve static frontend files if configured
    if let Some(ref static_dir) = config.static_dir {
        let static_path = std::path::Path::new(static_dir);
        if static_path.exists() && static_path.is_dir() {
            tracing::info!("Serving static frontend from: {}", static_dir);
            let serve_dir = tower_http::services::ServeDir::new(static_dir)
                .not_found_service(tower_http::services::ServeFile::new(
                    static_path.join("index.html"),
                ));
            app = app.fallback_service(serve_dir);
        } else {
            tracing::warn!(
                "Static directory not found: {}. Frontend won't be served.",
                static_dir
            );
        }
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local address: {}", e))?;

    tracing::info!("bizflow backend server listening on {}", local_addr);

    // Spawn the server in a background task
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}

async fn root() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "message": "Business workflow API is running",
    }))
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "server": "bizflow-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
