//! Agent descriptor — the declared behavior of one LLM-backed agent.
//!
//! An agent is pure configuration: an instruction (system prompt), the
//! capability servers it may use, and a model identifier. The external
//! agent runtime interprets all of it; the core never calls capability
//! servers directly.

use serde::{Deserialize, Serialize};

/// Default model for agents that do not declare one.
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";

/// Opaque name of an external capability provider (e.g. "filesystem",
/// "vector_db", "github", "pdf_generator"). Tool binding happens in the
/// external agent runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityRef(pub String);

impl CapabilityRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CapabilityRef {
    fn from(name: &str) -> Self {
        CapabilityRef(name.to_string())
    }
}

impl std::fmt::Display for CapabilityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered agent declaration. Immutable after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Unique agent name, referenced by workflows.
    pub name: String,

    /// Instruction text handed to the runtime as the system prompt.
    pub instruction: String,

    /// Capability servers this agent is permitted to invoke.
    #[serde(default)]
    pub capabilities: Vec<CapabilityRef>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Whether the agent may request human input mid-task.
    #[serde(default)]
    pub human_input: bool,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl AgentDescriptor {
    pub fn new(name: &str, instruction: &str, capabilities: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            instruction: instruction.to_string(),
            capabilities: capabilities.iter().map(|c| CapabilityRef::from(*c)).collect(),
            model: default_model(),
            human_input: false,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_human_input(mut self) -> Self {
        self.human_input = true;
        self
    }

    /// Parse an agent declaration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse agent YAML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_agent_yaml() {
        let yaml = r#"
name: "invoice_clerk"
instruction: |
  Generate invoices from billing data.
capabilities:
  - filesystem
  - pdf_generator
"#;
        let agent = AgentDescriptor::from_yaml(yaml).unwrap();
        assert_eq!(agent.name, "invoice_clerk");
        assert_eq!(agent.capabilities.len(), 2);
        assert_eq!(agent.capabilities[0].as_str(), "filesystem");
        assert_eq!(agent.model, DEFAULT_MODEL);
        assert!(!agent.human_input);
    }

    #[test]
    fn test_builder_helpers() {
        let agent = AgentDescriptor::new("greeter", "Greet.", &["filesystem"])
            .with_model("claude-sonnet-4")
            .with_human_input();
        assert_eq!(agent.model, "claude-sonnet-4");
        assert!(agent.human_input);
    }
}
