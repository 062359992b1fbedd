//! HTTP agent runtime — invokes agents via an Anthropic-compatible
//! Messages API.
//!
//! The agent's instruction becomes the system prompt; its declared
//! capability servers are forwarded in a system preamble so the remote
//! runtime can bind the corresponding tools.

use crate::error::WorkflowError;
use crate::models::AgentDescriptor;

/// Configuration for the Messages API endpoint.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// API base URL.
    pub base_url: String,
    /// API key / auth token.
    pub api_key: String,
    /// Replacement for the built-in default model, when set.
    pub default_model: Option<String>,
    /// Maximum tokens per response.
    pub max_tokens: u32,
}

impl RuntimeConfig {
    /// Resolve endpoint configuration from the environment.
    ///
    /// Reads `ANTHROPIC_BASE_URL`, `ANTHROPIC_AUTH_TOKEN` or
    /// `ANTHROPIC_API_KEY` for the credential, and `ANTHROPIC_MODEL` to
    /// replace the built-in default model.
    pub fn from_env() -> Result<Self, WorkflowError> {
        let base_url = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com".to_string());
        let api_key = std::env::var("ANTHROPIC_AUTH_TOKEN")
            .or_else(|_| std::env::var("ANTHROPIC_API_KEY"))
            .map_err(|_| {
                WorkflowError::Runtime(
                    "No API key found. Set ANTHROPIC_AUTH_TOKEN or ANTHROPIC_API_KEY.".to_string(),
                )
            })?;
        Ok(Self {
            base_url,
            api_key,
            default_model: std::env::var("ANTHROPIC_MODEL").ok(),
            max_tokens: 8192,
        })
    }
}

/// Calls agents over the Anthropic-compatible Messages API.
pub struct HttpAgentRuntime {
    client: reqwest::Client,
    config: RuntimeConfig,
}

impl HttpAgentRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(300))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            config,
        }
    }

    pub fn from_env() -> Result<Self, WorkflowError> {
        Ok(Self::new(RuntimeConfig::from_env()?))
    }

    /// Build the full system prompt for an agent: instruction plus the
    /// declared capability-server preamble.
    fn system_prompt(agent: &AgentDescriptor) -> String {
        let mut system = agent.instruction.trim().to_string();
        if !agent.capabilities.is_empty() {
            let names: Vec<&str> = agent.capabilities.iter().map(|c| c.as_str()).collect();
            system.push_str(&format!("\n\nCapability servers available: {}", names.join(", ")));
        }
        if agent.human_input {
            system.push_str("\nYou may ask the operator for input when information is missing.");
        }
        system
    }

    /// The model to invoke: `ANTHROPIC_MODEL` replaces the built-in
    /// default, but never an explicitly declared per-agent model.
    fn model_for(&self, agent: &AgentDescriptor) -> String {
        match &self.config.default_model {
            Some(model) if agent.model == crate::models::DEFAULT_MODEL => model.clone(),
            _ => agent.model.clone(),
        }
    }
}

#[async_trait::async_trait]
impl super::AgentRuntime for HttpAgentRuntime {
    /// POST {base_url}/v1/messages
    /// Headers:
    ///   x-api-key: {api_key}
    ///   anthropic-version: 2023-06-01
    async fn invoke(&self, agent: &AgentDescriptor, input: &str) -> Result<String, WorkflowError> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let model = self.model_for(agent);

        let body = serde_json::json!({
            "model": model,
            "max_tokens": self.config.max_tokens,
            "system": Self::system_prompt(agent),
            "messages": [
                {
                    "role": "user",
                    "content": input
                }
            ]
        });

        tracing::info!(agent = %agent.name, model = %model, url = %url, "invoking agent");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| WorkflowError::Runtime(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| WorkflowError::Runtime(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(WorkflowError::Runtime(format!(
                "API returned {} for agent '{}': {}",
                status, agent.name, response_text
            )));
        }

        let json: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|e| WorkflowError::Runtime(format!("Failed to parse response JSON: {}", e)))?;

        // Concatenate the text content blocks.
        let content = json
            .get("content")
            .and_then(|c| c.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|block| {
                        if block.get("type").and_then(|t| t.as_str()) == Some("text") {
                            block.get("text").and_then(|t| t.as_str())
                        } else {
                            None
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if let Some(usage) = json.get("usage") {
            tracing::debug!(
                agent = %agent.name,
                input_tokens = usage.get("input_tokens").and_then(|v| v.as_u64()),
                output_tokens = usage.get("output_tokens").and_then(|v| v.as_u64()),
                "agent invocation complete"
            );
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_includes_capabilities() {
        let agent = AgentDescriptor::new(
            "archivist",
            "Organize business documents.",
            &["filesystem", "vector_db"],
        );
        let system = HttpAgentRuntime::system_prompt(&agent);
        assert!(system.starts_with("Organize business documents."));
        assert!(system.contains("filesystem, vector_db"));
        assert!(!system.contains("operator"));
    }

    #[test]
    fn test_model_env_override_spares_explicit_models() {
        let runtime = HttpAgentRuntime::new(RuntimeConfig {
            base_url: "http://localhost".into(),
            api_key: "test".into(),
            default_model: Some("claude-sonnet-4".into()),
            max_tokens: 1024,
        });

        let default_agent = AgentDescriptor::new("a", "x", &[]);
        assert_eq!(runtime.model_for(&default_agent), "claude-sonnet-4");

        let pinned = AgentDescriptor::new("b", "x", &[]).with_model("claude-3-5-haiku-20241022");
        assert_eq!(runtime.model_for(&pinned), "claude-3-5-haiku-20241022");
    }

    #[test]
    fn test_system_prompt_human_input_hint() {
        let agent = AgentDescriptor::new("intake", "Collect details.", &[]).with_human_input();
        let system = HttpAgentRuntime::system_prompt(&agent);
        assert!(system.contains("operator"));
        assert!(!system.contains("Capability servers"));
    }
}
