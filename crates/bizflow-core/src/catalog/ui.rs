//! UI generation agents and their chains.

use crate::error::WorkflowError;
use crate::models::{AgentDescriptor, WorkflowDescriptor};
use crate::registry::{AgentRegistry, WorkflowRegistry};

use super::chain;

pub(super) fn register(
    agents: &mut AgentRegistry,
    workflows: &mut WorkflowRegistry,
) -> Result<(), WorkflowError> {
    agents.register(AgentDescriptor::new(
        "ui_generator",
        "Generate UI components based on business styling and requirements. \
         Create React components that match an existing design system. \
         Generate code for new pages and components that maintain \
         consistency with the codebase.",
        &["filesystem", "github"],
    ))?;

    agents.register(AgentDescriptor::new(
        "ui_analyzer",
        "Analyze existing UI components and design patterns. \
         Extract styling information, component patterns, and design \
         elements from code. Provide detailed breakdowns of UI structure \
         to inform new component creation.",
        &["filesystem", "github"],
    ))?;

    agents.register(AgentDescriptor::new(
        "style_manager",
        "Manage business styling and branding across UI components. \
         Maintain color schemes, typography, and other design elements. \
         Ensure all new components adhere to the established brand guidelines.",
        &["filesystem"],
    ))?;

    workflows.register(chain(
        "ui_workflow",
        &["ui_analyzer", "style_manager", "ui_generator", "repo_manager"],
        true,
        false,
    ))?;

    workflows.register(chain(
        "ui_component_workflow",
        &["style_manager", "ui_generator", "repo_manager"],
        true,
        false,
    ))?;

    workflows.register(WorkflowDescriptor::Parallel {
        name: "ui_multi_component_workflow".to_string(),
        fan_out: vec![
            "ui_component_workflow".to_string(),
            "ui_component_workflow".to_string(),
            "ui_component_workflow".to_string(),
        ],
        fan_in: None,
        include_request: true,
    })?;

    Ok(())
}
