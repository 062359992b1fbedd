//! `bizflow agent list` / `bizflow workflow list` — catalog introspection.
//!
//! Listing needs no agent runtime, so the registries are built directly
//! instead of going through the full application state.

use std::path::Path;

use bizflow_core::catalog;
use bizflow_core::registry::{AgentRegistry, WorkflowRegistry};

fn registries(declarations: Option<&str>) -> Result<(AgentRegistry, WorkflowRegistry), String> {
    let (mut agents, mut workflows) =
        catalog::builtin_registries().map_err(|e| e.to_string())?;
    if let Some(dir) = declarations {
        catalog::loader::load_dir(Path::new(dir), &mut agents, &mut workflows)
            .map_err(|e| e.to_string())?;
    }
    Ok((agents, workflows))
}

pub fn agents(declarations: Option<&str>) -> Result<(), String> {
    let (agents, _) = registries(declarations)?;

    let mut rows: Vec<_> = agents.all().collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    println!("{} agents:", rows.len());
    for agent in rows {
        let caps: Vec<&str> = agent.capabilities.iter().map(|c| c.as_str()).collect();
        println!(
            "  {:<28} model={} capabilities=[{}]{}",
            agent.name,
            agent.model,
            caps.join(", "),
            if agent.human_input { " human_input" } else { "" },
        );
    }
    Ok(())
}

pub fn workflows(declarations: Option<&str>) -> Result<(), String> {
    let (_, workflows) = registries(declarations)?;

    let mut rows: Vec<_> = workflows.all().collect();
    rows.sort_by(|a, b| a.name().cmp(b.name()));

    println!("{} workflows:", rows.len());
    for workflow in rows {
        let refs: Vec<&str> = workflow.referenced_names().into_iter().collect();
        println!("  {:<32} -> [{}]", workflow.name(), refs.join(", "));
    }
    Ok(())
}

pub fn show_workflow(name: &str, declarations: Option<&str>) -> Result<(), String> {
    let (_, workflows) = registries(declarations)?;
    let descriptor = workflows.resolve(name).map_err(|e| e.to_string())?;
    let yaml = serde_yaml::to_string(descriptor).map_err(|e| e.to_string())?;
    print!("{}", yaml);
    Ok(())
}
