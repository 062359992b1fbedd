//! `bizflow run` — execute a single workflow and print the result.

pub async fn run(
    workflow: &str,
    input: &str,
    verbose: bool,
    data_dir: Option<String>,
    declarations: Option<String>,
) -> Result<(), String> {
    let state = super::init_state(data_dir.as_deref(), declarations.as_deref())?;

    let result = state
        .executor
        .execute(workflow, input)
        .await
        .map_err(|e| e.to_string())?;

    if verbose {
        for step in &result.transcript {
            println!("### {}", step.target);
            println!("{}\n", step.output);
        }
        println!("### final");
    }
    println!("{}", result.output);

    Ok(())
}
