//! Load extra agent and workflow declarations from YAML files.
//!
//! Each `.yaml`/`.yml` file in the declarations directory holds optional
//! `agents:` and `workflows:` lists:
//!
//! ```yaml
//! agents:
//!   - name: "invoice_clerk"
//!     instruction: "Generate invoices from billing data."
//!     capabilities: [filesystem, pdf_generator]
//!
//! workflows:
//!   - type: chain
//!     name: "invoice_workflow"
//!     steps: ["invoice_clerk", "pdf_creator"]
//!     cumulative: true
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::WorkflowError;
use crate::models::{AgentDescriptor, WorkflowDescriptor};
use crate::registry::{AgentRegistry, WorkflowRegistry};

#[derive(Debug, Deserialize)]
struct DeclarationFile {
    #[serde(default)]
    agents: Vec<AgentDescriptor>,
    #[serde(default)]
    workflows: Vec<WorkflowDescriptor>,
}

/// Load all declaration files from a directory into the registries.
/// Returns the number of declarations added.
pub fn load_dir(
    dir: &Path,
    agents: &mut AgentRegistry,
    workflows: &mut WorkflowRegistry,
) -> Result<usize, WorkflowError> {
    if !dir.is_dir() {
        return Err(WorkflowError::BadRequest(format!(
            "Declarations directory '{}' does not exist",
            dir.display()
        )));
    }

    let read = std::fs::read_dir(dir).map_err(|e| WorkflowError::storage("list", dir, e))?;
    let mut count = 0;
    for entry in read.flatten() {
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != "yaml" && ext != "yml" {
            continue;
        }

        let text = std::fs::read_to_string(&path)
            .map_err(|e| WorkflowError::storage("read", &path, e))?;
        let file: DeclarationFile = serde_yaml::from_str(&text)
            .map_err(|e| WorkflowError::storage("parse", &path, e))?;

        for agent in file.agents {
            tracing::info!(agent = %agent.name, file = %path.display(), "loaded agent declaration");
            agents.register(agent)?;
            count += 1;
        }
        for workflow in file.workflows {
            tracing::info!(workflow = %workflow.name(), file = %path.display(), "loaded workflow declaration");
            workflows.register(workflow)?;
            count += 1;
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_dir_registers_declarations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("invoicing.yaml"),
            r#"
agents:
  - name: "invoice_clerk"
    instruction: "Generate invoices."
    capabilities: [filesystem]

workflows:
  - type: chain
    name: "invoice_workflow"
    steps: ["invoice_clerk", "pdf_creator"]
    cumulative: true
"#,
        )
        .unwrap();

        let mut agents = AgentRegistry::new();
        let mut workflows = WorkflowRegistry::new();
        let count = load_dir(dir.path(), &mut agents, &mut workflows).unwrap();
        assert_eq!(count, 2);
        assert!(agents.contains("invoice_clerk"));
        assert!(workflows.contains("invoice_workflow"));
    }

    #[test]
    fn test_load_dir_rejects_duplicate_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.yaml"),
            "agents:\n  - name: \"dup\"\n    instruction: \"x\"\n",
        )
        .unwrap();

        let mut agents = AgentRegistry::new();
        agents
            .register(AgentDescriptor::new("dup", "existing", &[]))
            .unwrap();
        let mut workflows = WorkflowRegistry::new();
        let err = load_dir(dir.path(), &mut agents, &mut workflows).unwrap_err();
        assert!(matches!(err, WorkflowError::DuplicateName(_)));
    }

    #[test]
    fn test_load_dir_missing_directory_fails() {
        let mut agents = AgentRegistry::new();
        let mut workflows = WorkflowRegistry::new();
        let err = load_dir(Path::new("/nonexistent/decls"), &mut agents, &mut workflows)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::BadRequest(_)));
    }
}
