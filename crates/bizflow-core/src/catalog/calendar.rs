//! Calendar, task-tracking, and reminder agents and their chains.

use crate::error::WorkflowError;
use crate::models::AgentDescriptor;
use crate::registry::{AgentRegistry, WorkflowRegistry};

use super::chain;

pub(super) fn register(
    agents: &mut AgentRegistry,
    workflows: &mut WorkflowRegistry,
) -> Result<(), WorkflowError> {
    agents.register(AgentDescriptor::new(
        "calendar_manager",
        "Manage the business calendar, renewals, and to-do items. \
         Track important dates, deadlines, and recurring events. \
         Send reminders for license renewals and other time-sensitive tasks.",
        &["filesystem"],
    ))?;

    agents.register(AgentDescriptor::new(
        "task_tracker",
        "Track business tasks and progress toward company goals. \
         Create, update, and monitor to-do lists. \
         Provide progress reports and status updates on business initiatives.",
        &["filesystem", "vector_db"],
    ))?;

    agents.register(AgentDescriptor::new(
        "reminder_system",
        "Generate and manage business reminders and notifications. \
         Track upcoming deadlines and important events. \
         Create timely alerts for license renewals and regulatory requirements.",
        &["filesystem"],
    ))?;

    workflows.register(chain(
        "calendar_workflow",
        &["calendar_manager", "task_tracker", "reminder_system"],
        true,
        false,
    ))?;

    workflows.register(chain(
        "renewal_workflow",
        &["calendar_manager", "reminder_system"],
        true,
        false,
    ))?;

    workflows.register(chain(
        "goal_tracking_workflow",
        &["task_tracker", "calendar_manager"],
        true,
        false,
    ))?;

    Ok(())
}
