//! Agent and workflow registries.
//!
//! Both registries are populated once at startup and read-only for the
//! lifetime of the process; there is no update or delete. Target
//! resolution (workflow first, agent fallback) happens lazily at
//! execution time so declarations may reference each other freely.

use std::collections::HashMap;

use crate::error::WorkflowError;
use crate::models::{AgentDescriptor, WorkflowDescriptor};

/// Mapping from unique agent name to its declared descriptor.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, AgentDescriptor>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: AgentDescriptor) -> Result<(), WorkflowError> {
        if self.agents.contains_key(&descriptor.name) {
            return Err(WorkflowError::DuplicateName(descriptor.name));
        }
        tracing::debug!(agent = %descriptor.name, "registered agent");
        self.agents.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&AgentDescriptor, WorkflowError> {
        self.agents
            .get(name)
            .ok_or_else(|| WorkflowError::UnknownAgent(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Mapping from unique workflow name to its composition descriptor.
#[derive(Debug, Default)]
pub struct WorkflowRegistry {
    workflows: HashMap<String, WorkflowDescriptor>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: WorkflowDescriptor) -> Result<(), WorkflowError> {
        let name = descriptor.name().to_string();
        if self.workflows.contains_key(&name) {
            return Err(WorkflowError::DuplicateName(name));
        }
        tracing::debug!(workflow = %name, "registered workflow");
        self.workflows.insert(name, descriptor);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&WorkflowDescriptor, WorkflowError> {
        self.workflows
            .get(name)
            .ok_or_else(|| WorkflowError::UnknownTarget(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.workflows.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &WorkflowDescriptor> {
        self.workflows.values()
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

/// A resolved execution target: workflow registry first, agent fallback.
#[derive(Debug)]
pub enum Target<'a> {
    Workflow(&'a WorkflowDescriptor),
    Agent(&'a AgentDescriptor),
}

/// Resolve a step reference against both registries.
///
/// Resolution order is workflow registry first, then agent registry, so a
/// chain step naming a bare agent resolves correctly.
pub fn resolve_target<'a>(
    workflows: &'a WorkflowRegistry,
    agents: &'a AgentRegistry,
    name: &str,
) -> Result<Target<'a>, WorkflowError> {
    if let Ok(wf) = workflows.resolve(name) {
        return Ok(Target::Workflow(wf));
    }
    if let Ok(agent) = agents.resolve(name) {
        return Ok(Target::Agent(agent));
    }
    Err(WorkflowError::UnknownTarget(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str) -> AgentDescriptor {
        AgentDescriptor::new(name, "instruction", &["filesystem"])
    }

    fn chain(name: &str, steps: &[&str]) -> WorkflowDescriptor {
        WorkflowDescriptor::Chain {
            name: name.to_string(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            cumulative: false,
            continue_with_final: false,
        }
    }

    #[test]
    fn test_duplicate_agent_registration_fails() {
        let mut registry = AgentRegistry::new();
        registry.register(agent("scribe")).unwrap();
        let err = registry.register(agent("scribe")).unwrap_err();
        assert!(matches!(err, WorkflowError::DuplicateName(name) if name == "scribe"));
    }

    #[test]
    fn test_unknown_agent_resolution_fails() {
        let registry = AgentRegistry::new();
        let err = registry.resolve("ghost").unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownAgent(name) if name == "ghost"));
    }

    #[test]
    fn test_target_resolution_prefers_workflow() {
        let mut agents = AgentRegistry::new();
        agents.register(agent("shared_name")).unwrap();
        let mut workflows = WorkflowRegistry::new();
        workflows.register(chain("shared_name", &["shared_name"])).unwrap();

        match resolve_target(&workflows, &agents, "shared_name").unwrap() {
            Target::Workflow(wf) => assert_eq!(wf.name(), "shared_name"),
            Target::Agent(_) => panic!("workflow registry should win"),
        }
    }

    #[test]
    fn test_target_resolution_falls_back_to_agent() {
        let mut agents = AgentRegistry::new();
        agents.register(agent("scribe")).unwrap();
        let workflows = WorkflowRegistry::new();

        match resolve_target(&workflows, &agents, "scribe").unwrap() {
            Target::Agent(a) => assert_eq!(a.name, "scribe"),
            Target::Workflow(_) => panic!("no workflow registered"),
        }
    }

    #[test]
    fn test_target_resolution_unknown_fails() {
        let agents = AgentRegistry::new();
        let workflows = WorkflowRegistry::new();
        let err = resolve_target(&workflows, &agents, "nobody").unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownTarget(name) if name == "nobody"));
    }
}
