//! Bizflow CLI — run business workflows from the command line.
//!
//! Reuses the same core domain logic (bizflow-core) and server bootstrap
//! (bizflow-server) that power the HTTP gateway.

mod commands;

use clap::{Parser, Subcommand};

/// Bizflow CLI — business workflow orchestration platform
#[derive(Parser)]
#[command(name = "bizflow", version, about = "Bizflow CLI — business workflow orchestration")]
pub struct Cli {
    /// Storage root directory for persisted data and downloads
    #[arg(long, env = "BUSINESS_WORKFLOW_DIR")]
    data_dir: Option<String>,

    /// Directory of extra YAML agent/workflow declarations
    #[arg(long)]
    declarations: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bizflow HTTP backend server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3220)]
        port: u16,
        /// Path to static frontend directory
        #[arg(long)]
        static_dir: Option<String>,
    },

    /// Execute a workflow by name and print its output
    Run {
        /// Workflow name (e.g. "onboarding_workflow")
        workflow: String,
        /// Request text to feed into the workflow
        input: String,
        /// Print the full step transcript, not just the final output
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// List catalog entries
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },

    /// List or describe workflows
    Workflow {
        #[command(subcommand)]
        action: WorkflowAction,
    },
}

#[derive(Subcommand)]
enum AgentAction {
    /// List all registered agents
    List,
}

#[derive(Subcommand)]
enum WorkflowAction {
    /// List all registered workflows
    List,
    /// Show a workflow descriptor as YAML
    Show {
        /// Workflow name
        name: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bizflow_core=warn,bizflow_server=warn,bizflow_cli=info".into()),
        )
        .init();

    let result = if let Some(command) = cli.command {
        match command {
            Commands::Serve {
                host,
                port,
                static_dir,
            } => {
                commands::serve::run(host, port, cli.data_dir, cli.declarations, static_dir).await
            }

            Commands::Run {
                workflow,
                input,
                verbose,
            } => {
                commands::run::run(&workflow, &input, verbose, cli.data_dir, cli.declarations)
                    .await
            }

            Commands::Agent { action } => match action {
                AgentAction::List => commands::list::agents(cli.declarations.as_deref()),
            },

            Commands::Workflow { action } => match action {
                WorkflowAction::List => commands::list::workflows(cli.declarations.as_deref()),
                WorkflowAction::Show { name } => {
                    commands::list::show_workflow(&name, cli.declarations.as_deref())
                }
            },
        }
    } else {
        // No subcommand — show help
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        Ok(())
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
