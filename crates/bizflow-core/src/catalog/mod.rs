//! Built-in agent and workflow catalog.
//!
//! The registries are populated once at startup from these static
//! declarations (optionally extended with YAML files, see `loader`),
//! then validated and frozen. Declarations are grouped by business
//! domain: core business, calendar, documents, marketing, UI.

mod business;
mod calendar;
mod documents;
pub mod loader;
mod marketing;
mod ui;

use crate::error::WorkflowError;
use crate::models::WorkflowDescriptor;
use crate::registry::{AgentRegistry, WorkflowRegistry};

pub(crate) fn chain(
    name: &str,
    steps: &[&str],
    cumulative: bool,
    continue_with_final: bool,
) -> WorkflowDescriptor {
    WorkflowDescriptor::Chain {
        name: name.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        cumulative,
        continue_with_final,
    }
}

/// Build the registries from the built-in declarations.
pub fn builtin_registries() -> Result<(AgentRegistry, WorkflowRegistry), WorkflowError> {
    let mut agents = AgentRegistry::new();
    let mut workflows = WorkflowRegistry::new();

    business::register(&mut agents, &mut workflows)?;
    calendar::register(&mut agents, &mut workflows)?;
    documents::register(&mut agents, &mut workflows)?;
    marketing::register(&mut agents, &mut workflows)?;
    ui::register(&mut agents, &mut workflows)?;

    tracing::info!(
        agents = agents.len(),
        workflows = workflows.len(),
        "catalog loaded"
    );
    Ok((agents, workflows))
}

/// Report workflow references that resolve to neither registry.
///
/// Execution-time resolution stays authoritative (declarations may be
/// extended across restarts); this pass only surfaces likely typos at
/// startup.
pub fn dangling_references(
    workflows: &WorkflowRegistry,
    agents: &AgentRegistry,
) -> Vec<(String, String)> {
    let mut dangling = Vec::new();
    for workflow in workflows.all() {
        for name in workflow.referenced_names() {
            if !workflows.contains(name) && !agents.contains(name) {
                dangling.push((workflow.name().to_string(), name.to_string()));
            }
        }
    }
    dangling
}

/// Log a warning for each dangling reference found.
pub fn validate(workflows: &WorkflowRegistry, agents: &AgentRegistry) {
    for (workflow, target) in dangling_references(workflows, agents) {
        tracing::warn!(
            workflow = %workflow,
            target = %target,
            "workflow references a name present in neither registry"
        );
    }
}
