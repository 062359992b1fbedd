//! Core business agents: onboarding, data management, analysis, and the
//! repository manager shared with the UI workflows.

use crate::error::WorkflowError;
use crate::models::AgentDescriptor;
use crate::registry::{AgentRegistry, WorkflowRegistry};

use super::chain;

pub(super) fn register(
    agents: &mut AgentRegistry,
    workflows: &mut WorkflowRegistry,
) -> Result<(), WorkflowError> {
    agents.register(
        AgentDescriptor::new(
            "onboarding_agent",
            "Guide the business onboarding process and collect essential information. \
             Collect and organize business details including industry, company name, \
             business plans, website information, and digital assets. \
             Request human input when needed to complete onboarding.",
            &["filesystem", "vector_db"],
        )
        .with_human_input(),
    )?;

    agents.register(AgentDescriptor::new(
        "data_manager",
        "Manage business data with state tracking. \
         Track which data fields are finalized versus works-in-progress. \
         Store and retrieve business information from the vector database.",
        &["filesystem", "vector_db"],
    ))?;

    agents.register(AgentDescriptor::new(
        "business_analyzer",
        "Analyze business data and provide insights. \
         Identify business opportunities, challenges, and trends. \
         Generate reports and recommendations based on business data.",
        &["filesystem", "vector_db"],
    ))?;

    agents.register(AgentDescriptor::new(
        "repo_manager",
        "Manage GitHub repositories and handle code updates. \
         Create, update, and organize repository content. \
         Handle code versioning and deployment for business applications.",
        &["filesystem", "github"],
    ))?;

    workflows.register(chain(
        "onboarding_workflow",
        &["onboarding_agent", "data_manager", "document_generator"],
        true,
        true,
    ))?;

    Ok(())
}
