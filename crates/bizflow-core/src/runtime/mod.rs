//! Agent runtime boundary.
//!
//! The composition executor never talks to a model provider directly; it
//! hands an `AgentDescriptor` plus input text to an `AgentRuntime`, which
//! owns tool binding, capability servers, and the provider protocol.

pub mod http;

pub use http::HttpAgentRuntime;

use crate::error::WorkflowError;
use crate::models::AgentDescriptor;

/// External LLM agent execution runtime.
#[async_trait::async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Invoke the agent once with the given input, returning its text output.
    async fn invoke(&self, agent: &AgentDescriptor, input: &str) -> Result<String, WorkflowError>;
}
