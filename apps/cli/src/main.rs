//! `nebula` CLI entry-point.
//!
//! Available sub-commands:
//! - `run`      — execute a workflow definition file and print the outcome.
//! - `validate` — deep-validate a workflow definition against the node registry.
//! - `explain`  — print the step-by-step plan the interpreter would follow.
//! - `nodes`    — list the bundled node catalog.
//! - `cron`     — validate a cron expression without arming a job.
//! - `serve`    — start the HTTP API (webhook dispatch, cron validation, executions).

mod config;
mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use nebula_action::ActionRegistry;
use nebula_api::AppState;
use nebula_engine::{Interpreter, RunRequest};
use nebula_log::{info, LogConfig};
use nebula_repository::{InMemoryAutomationRepository, InMemoryExecutionRepository};
use nebula_workflow::WorkflowDefinition;

#[derive(Parser)]
#[command(name = "nebula", about = "Nebula workflow engine CLI", version)]
struct Cli {
    /// Path to a config file; defaults to `nebula.toml` in the current
    /// directory, then `$XDG_CONFIG_HOME/nebula/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a workflow definition and print its outcome as JSON.
    Run {
        /// Path to the workflow definition JSON file.
        path: PathBuf,
        /// Re-run the workflow whenever `path` changes on disk.
        #[arg(long)]
        watch: bool,
        /// Bearer token injected as the `JWT_token` state key before the
        /// first node runs.
        #[arg(long)]
        jwt: Option<String>,
    },
    /// Validate a workflow definition against the node registry without running it.
    Validate {
        /// Path to the workflow definition JSON file.
        path: PathBuf,
    },
    /// Print the step-by-step plan a run would follow.
    Explain {
        /// Path to the workflow definition JSON file.
        path: PathBuf,
    },
    /// List every node type the bundled registry knows about.
    Nodes {
        /// Filter by category.
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive substring search over name and description.
        #[arg(long)]
        query: Option<String>,
    },
    /// Cron utilities.
    Cron {
        #[command(subcommand)]
        command: CronCommand,
    },
    /// Start the HTTP API server.
    Serve {
        /// Overrides the config file / `NEBULA_BIND` environment variable,
        /// which in turn override the built-in `0.0.0.0:8080` default.
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Subcommand)]
enum CronCommand {
    /// Check whether a cron expression is well-formed and report its next fire time.
    Validate {
        /// Five- or six-field cron expression.
        expression: String,
        /// IANA timezone name.
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
}

fn registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    nebula_action::builtin::register_all(&mut registry);
    registry
}

fn load_definition(path: &PathBuf) -> anyhow::Result<WorkflowDefinition> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("invalid JSON in {}: {e}", path.display()))?;
    WorkflowDefinition::parse(&value).map_err(|e| anyhow::anyhow!("{e}"))
}

pub(crate) async fn run_once(path: &PathBuf, jwt: Option<String>) -> anyhow::Result<()> {
    let definition = load_definition(path)?;
    let interpreter = Interpreter::new(Arc::new(registry()));
    let outcome = interpreter
        .run(
            &definition,
            RunRequest {
                jwt_token: jwt,
                ..Default::default()
            },
        )
        .await;

    println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
    if outcome.error.is_some() {
        anyhow::bail!("workflow failed: {}", outcome.error.unwrap_or_default());
    }
    Ok(())
}

/// `RunOutcome` has no `Serialize` of its own — the API layer builds its own
/// response shape from an `ExecutionRecord` instead (spec §6). The CLI isn't
/// on the wire, so a small ad hoc object here is enough to show a human
/// what happened.
fn outcome_json(outcome: &nebula_engine::RunOutcome) -> serde_json::Value {
    serde_json::json!({
        "status": outcome.status,
        "finalState": outcome.final_state,
        "result": outcome.result,
        "failedNodeId": outcome.failed_node_id,
        "error": outcome.error,
        "nodeLogs": outcome.node_logs,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nebula_log::init(&LogConfig::from_env());

    let cli = Cli::parse();
    let settings = config::Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Run { path, watch, jwt } => {
            if watch {
                watch::run_and_watch(&path, jwt).await?;
            } else {
                run_once(&path, jwt).await?;
            }
        }
        Command::Validate { path } => {
            let definition = load_definition(&path)?;
            let registry = registry();
            let issues = nebula_reflection::deep_validate(&definition, &registry);
            println!("{}", serde_json::to_string_pretty(&issues)?);
            if !issues.is_empty() {
                anyhow::bail!("{} validation issue(s) found", issues.len());
            }
        }
        Command::Explain { path } => {
            let definition = load_definition(&path)?;
            let explanation = nebula_reflection::WorkflowExplanation::explain(&definition);
            println!("{}", serde_json::to_string_pretty(&explanation)?);
        }
        Command::Nodes { category, query } => {
            let registry = registry();
            let catalog = nebula_reflection::NodeCatalog::from_registry(&registry);
            let entries = catalog.filter(category.as_deref(), query.as_deref());
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Cron {
            command: CronCommand::Validate { expression, timezone },
        } => {
            let result = nebula_scheduler::validate(&expression, &timezone);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.valid {
                anyhow::bail!("invalid cron expression: {}", result.error.unwrap_or_default());
            }
        }
        Command::Serve { bind } => {
            let bind = bind.or(settings.bind).unwrap_or_else(|| "0.0.0.0:8080".to_owned());
            let interpreter = Arc::new(Interpreter::new(Arc::new(registry())));
            let state = AppState::new(
                interpreter,
                Arc::new(InMemoryExecutionRepository::new()),
                Arc::new(InMemoryAutomationRepository::new()),
            );
            let app = nebula_api::router(state);
            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!(%bind, "nebula listening");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
