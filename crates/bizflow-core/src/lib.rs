//! Bizflow Core — transport-agnostic domain logic for the business
//! workflow orchestration platform.
//!
//! This crate contains the agent/workflow registries, the composition
//! executor, the agent runtime boundary, and the flat-file storage
//! adapter. It has **no HTTP framework dependency** by default, making
//! it suitable for use in:
//!
//! - HTTP servers (via `bizflow-server`)
//! - CLI tools (via `bizflow-cli`)
//!
//! # Feature Flags
//!
//! - `axum` — Enables `IntoResponse` impl on `WorkflowError` for use in
//!   axum handlers.

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod registry;
pub mod runtime;
pub mod state;
pub mod storage;

// Convenience re-exports
pub use config::StorageConfig;
pub use error::WorkflowError;
pub use executor::{CompositionExecutor, ExecutionResult, StepRecord};
pub use state::{AppState, AppStateInner};
