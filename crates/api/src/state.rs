//! Shared application state handed to every handler.

use std::collections::HashMap;
use std::sync::Arc;

use nebula_core::WorkflowId;
use nebula_engine::Interpreter;
use nebula_repository::{AutomationRepository, ExecutionRepository};
use nebula_workflow::WorkflowDefinition;
use parking_lot::RwLock;

/// Everything a handler needs: the interpreter, the two repositories, and an
/// in-memory workflow-definition store (no SQL dialect assumed — see
/// `nebula-repository`'s own doc comment for the same stance).
#[derive(Clone)]
pub struct AppState {
    pub interpreter: Arc<Interpreter>,
    pub execution_repo: Arc<dyn ExecutionRepository>,
    pub automation_repo: Arc<dyn AutomationRepository>,
    pub workflows: Arc<RwLock<HashMap<WorkflowId, WorkflowDefinition>>>,
}

impl AppState {
    #[must_use]
    pub fn new(
        interpreter: Arc<Interpreter>,
        execution_repo: Arc<dyn ExecutionRepository>,
        automation_repo: Arc<dyn AutomationRepository>,
    ) -> Self {
        Self {
            interpreter,
            execution_repo,
            automation_repo,
            workflows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register or replace a workflow definition so it can be reached by webhook.
    pub fn add_workflow(&self, definition: WorkflowDefinition) {
        self.workflows.write().insert(definition.id, definition);
    }
}
