//! Document generation, PDF conversion, organization, and quality control.

use crate::error::WorkflowError;
use crate::models::{AgentDescriptor, RatingLevel, WorkflowDescriptor};
use crate::registry::{AgentRegistry, WorkflowRegistry};

use super::chain;

pub(super) fn register(
    agents: &mut AgentRegistry,
    workflows: &mut WorkflowRegistry,
) -> Result<(), WorkflowError> {
    agents.register(AgentDescriptor::new(
        "document_generator",
        "Generate business documents based on templates and business information. \
         Create professional business plans, licenses, legal documents, and reports. \
         Follow proper document structure and formatting for business documentation.",
        &["filesystem", "vector_db"],
    ))?;

    agents.register(AgentDescriptor::new(
        "pdf_creator",
        "Convert documents to properly formatted PDF files. \
         Apply styling, formatting, and layout to create professional PDFs. \
         Ensure consistency across all business documentation.",
        &["filesystem", "pdf_generator"],
    ))?;

    agents.register(AgentDescriptor::new(
        "document_organizer",
        "Organize and manage business documents. \
         Categorize, tag, and structure document storage. \
         Provide efficient retrieval systems for accessing business documentation.",
        &["filesystem", "vector_db"],
    ))?;

    agents.register(AgentDescriptor::new(
        "quality_assurance",
        "Evaluate document quality and provide improvement feedback. \
         Assess business documents for professionalism, completeness, and accuracy. \
         Rate documents as EXCELLENT, GOOD, FAIR, or POOR with specific \
         improvement suggestions.",
        &[],
    ))?;

    // Refinement loop reused as a chain step by document_workflow.
    workflows.register(WorkflowDescriptor::EvaluatorOptimizer {
        name: "document_quality".to_string(),
        generator: "document_generator".to_string(),
        evaluator: "quality_assurance".to_string(),
        min_rating: RatingLevel::Excellent,
        max_refinements: 3,
    })?;

    workflows.register(chain(
        "document_workflow",
        &["document_quality", "pdf_creator", "document_organizer"],
        true,
        false,
    ))?;

    workflows.register(WorkflowDescriptor::EvaluatorOptimizer {
        name: "premium_document_workflow".to_string(),
        generator: "document_generator".to_string(),
        evaluator: "quality_assurance".to_string(),
        min_rating: RatingLevel::Excellent,
        max_refinements: 5,
    })?;

    workflows.register(WorkflowDescriptor::Router {
        name: "document_router".to_string(),
        candidates: vec![
            "document_workflow".to_string(),
            "premium_document_workflow".to_string(),
        ],
        routing_model: None,
    })?;

    Ok(())
}
