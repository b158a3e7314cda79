//! The per-plugin fire callback.

use async_trait::async_trait;
use nebula_core::{AutomationId, ExecutionId, WorkflowId};
use nebula_execution::TriggeredBy;
use serde_json::Value;

/// Handed to a plugin's callback on every tick.
#[derive(Debug, Clone)]
pub struct AutomationExecutionContext {
    pub automation_id: AutomationId,
    pub execution_id: ExecutionId,
    pub workflow_id: WorkflowId,
    pub triggered_by: TriggeredBy,
    pub trigger_data: Value,
}

/// What a plugin registers to react to its automations' ticks.
///
/// The scheduler calls this and nothing else: creating the execution
/// record, running the interpreter, completing the record, and bumping the
/// automation's run counters all happen inside `on_fire`, not here.
#[async_trait]
pub trait AutomationCallback: Send + Sync {
    async fn on_fire(&self, ctx: AutomationExecutionContext) -> anyhow::Result<()>;
}
