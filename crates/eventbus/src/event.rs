//! The live events the interpreter emits, serializable to an external broker.

use chrono::{DateTime, Utc};
use nebula_core::{ExecutionId, WorkflowId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One of the six stable, named events the interpreter emits while running
/// a workflow. Event names and field names are part of the wire contract —
/// fields serialize camelCase (`workflowId`, `executionId`, `nodeId`,
/// `nodeType`, ...) to match the rest of the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum WorkflowEvent {
    /// The interpreter began walking a workflow's top-level sequence.
    #[serde(rename = "workflow:started")]
    WorkflowStarted {
        /// Workflow definition being run.
        workflow_id: WorkflowId,
        /// The execution this run belongs to.
        execution_id: ExecutionId,
        /// When the event occurred.
        timestamp: DateTime<Utc>,
    },

    /// The top-level sequence was exhausted without a failure.
    #[serde(rename = "workflow:completed")]
    WorkflowCompleted {
        /// Workflow definition that was run.
        workflow_id: WorkflowId,
        /// The execution this run belongs to.
        execution_id: ExecutionId,
        /// When the event occurred.
        timestamp: DateTime<Utc>,
    },

    /// A node failed, cancellation fired, or the node type was unknown.
    #[serde(rename = "workflow:failed")]
    WorkflowFailed {
        /// Workflow definition that was run.
        workflow_id: WorkflowId,
        /// The execution this run belongs to.
        execution_id: ExecutionId,
        /// Error message.
        error: String,
        /// When the event occurred.
        timestamp: DateTime<Utc>,
    },

    /// A node invocation began.
    #[serde(rename = "node:started")]
    NodeStarted {
        /// The execution this run belongs to.
        execution_id: ExecutionId,
        /// Invocation-tree index path, e.g. `"0.success?.1"`.
        node_id: String,
        /// The node's `nodeType`.
        node_type: String,
        /// When the event occurred.
        timestamp: DateTime<Utc>,
    },

    /// A node fired an edge carrying a payload.
    #[serde(rename = "node:completed")]
    NodeCompleted {
        /// The execution this run belongs to.
        execution_id: ExecutionId,
        /// Invocation-tree index path.
        node_id: String,
        /// The node's `nodeType`.
        node_type: String,
        /// Wall-clock duration of the invocation.
        duration_ms: u64,
        /// The fired edge's payload, if any.
        result: Option<Value>,
        /// When the event occurred.
        timestamp: DateTime<Utc>,
    },

    /// A node threw, was cancelled, or produced no edge.
    #[serde(rename = "node:failed")]
    NodeFailed {
        /// The execution this run belongs to.
        execution_id: ExecutionId,
        /// Invocation-tree index path.
        node_id: String,
        /// The node's `nodeType`.
        node_type: String,
        /// Error message.
        error: String,
        /// When the event occurred.
        timestamp: DateTime<Utc>,
    },
}

impl WorkflowEvent {
    /// The stable wire name for this event, e.g. `"node:completed"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::WorkflowStarted { .. } => "workflow:started",
            Self::WorkflowCompleted { .. } => "workflow:completed",
            Self::WorkflowFailed { .. } => "workflow:failed",
            Self::NodeStarted { .. } => "node:started",
            Self::NodeCompleted { .. } => "node:completed",
            Self::NodeFailed { .. } => "node:failed",
        }
    }

    /// The execution this event belongs to.
    #[must_use]
    pub fn execution_id(&self) -> ExecutionId {
        match self {
            Self::WorkflowStarted { execution_id, .. }
            | Self::WorkflowCompleted { execution_id, .. }
            | Self::WorkflowFailed { execution_id, .. }
            | Self::NodeStarted { execution_id, .. }
            | Self::NodeCompleted { execution_id, .. }
            | Self::NodeFailed { execution_id, .. } => *execution_id,
        }
    }
}
