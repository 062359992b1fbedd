//! Marketing agents: social media, campaigns, creator partnerships,
//! brand guidelines, content generation, and audience analysis.

use crate::error::WorkflowError;
use crate::models::{AgentDescriptor, RatingLevel, WorkflowDescriptor, DEFAULT_MODEL};
use crate::registry::{AgentRegistry, WorkflowRegistry};

use super::chain;

pub(super) fn register(
    agents: &mut AgentRegistry,
    workflows: &mut WorkflowRegistry,
) -> Result<(), WorkflowError> {
    agents.register(AgentDescriptor::new(
        "social_media_manager",
        "Manage social media guidelines, templates, and posting schedules. \
         Create and organize content templates for different platforms. \
         Maintain brand voice guidelines across social channels. \
         Track posting frequency and engagement metrics.",
        &["filesystem", "vector_db"],
    ))?;

    agents.register(AgentDescriptor::new(
        "campaign_tracker",
        "Track and analyze advertising campaign performance. \
         Monitor PPC campaigns, ad spend, and ROI. \
         Generate reports on campaign effectiveness. \
         Provide optimization recommendations based on performance data.",
        &["filesystem", "vector_db"],
    ))?;

    agents.register(AgentDescriptor::new(
        "content_creator_manager",
        "Manage relationships with content creators and influencers. \
         Track creator metrics, engagement rates, and audience demographics. \
         Evaluate potential partners for brand alignment. \
         Maintain collaboration agreements and creative briefs.",
        &["filesystem", "vector_db"],
    ))?;

    agents.register(AgentDescriptor::new(
        "brand_guidelines_keeper",
        "Maintain the brand's marketing guidelines and assets. \
         Ensure consistency in messaging, imagery, and tone. \
         Provide access to approved brand assets and templates. \
         Track and enforce brand guidelines across marketing materials. \
         When evaluating content, rate it EXCELLENT, GOOD, FAIR, or POOR \
         against the guidelines.",
        &["filesystem"],
    ))?;

    agents.register(AgentDescriptor::new(
        "content_generator",
        "Generate marketing content based on brand guidelines. \
         Create social media posts, ad copy, and email content. \
         Adapt content for different platforms while maintaining brand voice. \
         Ensure all generated content aligns with brand positioning.",
        &["filesystem"],
    ))?;

    agents.register(AgentDescriptor::new(
        "audience_analyst",
        "Analyze audience data and engagement metrics. \
         Identify trends in customer behavior and preferences. \
         Segment audiences for targeted marketing campaigns. \
         Provide insights to improve audience targeting and engagement.",
        &["filesystem", "vector_db"],
    ))?;

    workflows.register(chain(
        "social_media_workflow",
        &["brand_guidelines_keeper", "social_media_manager", "content_generator"],
        true,
        false,
    ))?;

    workflows.register(chain(
        "campaign_management_workflow",
        &["audience_analyst", "campaign_tracker", "content_generator"],
        true,
        false,
    ))?;

    workflows.register(chain(
        "creator_partnership_workflow",
        &["brand_guidelines_keeper", "content_creator_manager", "audience_analyst"],
        true,
        false,
    ))?;

    workflows.register(WorkflowDescriptor::EvaluatorOptimizer {
        name: "content_quality_workflow".to_string(),
        generator: "content_generator".to_string(),
        evaluator: "brand_guidelines_keeper".to_string(),
        min_rating: RatingLevel::Excellent,
        max_refinements: 3,
    })?;

    workflows.register(WorkflowDescriptor::Parallel {
        name: "multi_platform_content_workflow".to_string(),
        fan_out: vec![
            "content_generator".to_string(),
            "content_generator".to_string(),
            "content_generator".to_string(),
        ],
        fan_in: Some("social_media_manager".to_string()),
        include_request: true,
    })?;

    workflows.register(WorkflowDescriptor::Router {
        name: "marketing_router".to_string(),
        candidates: vec![
            "social_media_workflow".to_string(),
            "campaign_management_workflow".to_string(),
            "creator_partnership_workflow".to_string(),
            "content_quality_workflow".to_string(),
        ],
        routing_model: Some(DEFAULT_MODEL.to_string()),
    })?;

    Ok(())
}
