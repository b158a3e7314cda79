//! The HTTP server binary: webhook dispatch, cron validation, execution
//! listing. The bundled node set registers itself; server-local plugins
//! would be added to the same registry before it's handed to the
//! interpreter.

use std::sync::Arc;

use nebula_action::ActionRegistry;
use nebula_api::AppState;
use nebula_engine::Interpreter;
use nebula_log::{info, LogConfig};
use nebula_repository::{InMemoryAutomationRepository, InMemoryExecutionRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nebula_log::init(&LogConfig::from_env());

    let mut registry = ActionRegistry::new();
    nebula_action::builtin::register_all(&mut registry);
    let registry = Arc::new(registry);
    let interpreter = Arc::new(Interpreter::new(registry));
    let state = AppState::new(
        interpreter,
        Arc::new(InMemoryExecutionRepository::new()),
        Arc::new(InMemoryAutomationRepository::new()),
    );

    let app = nebula_api::router(state);
    let bind = std::env::var("NEBULA_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(%bind, "nebula-server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
