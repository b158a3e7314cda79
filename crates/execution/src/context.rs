//! Runtime execution context (non-serializable).
//!
//! Distinct from [`ExecutionRecord`](crate::record::ExecutionRecord): the
//! record is the persisted row, this is the live state the interpreter
//! mutates while walking a workflow.

use std::sync::Arc;

use nebula_core::{ExecutionId, WorkflowId};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::error::ExecutionError;

/// The mutable, dot-path-addressable execution state, shared across every
/// node invocation in a run.
///
/// Wrapped in `Arc<RwLock<_>>` so the interpreter can hand out read access
/// to `nebula-expression` for `$.path` resolution while a node is running,
/// then take a write lock briefly to merge in the fired edge's payload.
#[derive(Debug)]
pub struct ExecutionContext {
    /// Unique identifier for this execution.
    pub execution_id: ExecutionId,
    /// The workflow being executed.
    pub workflow_id: WorkflowId,
    /// Token for cooperative cancellation, checked between node invocations.
    pub cancellation: CancellationToken,
    /// The live execution state.
    state: Arc<RwLock<Map<String, Value>>>,
}

impl ExecutionContext {
    /// Create a new context seeded with `initial_state`.
    #[must_use]
    pub fn new(execution_id: ExecutionId, workflow_id: WorkflowId, initial_state: Map<String, Value>) -> Self {
        Self {
            execution_id,
            workflow_id,
            cancellation: CancellationToken::new(),
            state: Arc::new(RwLock::new(initial_state)),
        }
    }

    /// Replace the cancellation token, e.g. to link it to a parent scope.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Snapshot the current state as an owned `Value` tree, for
    /// `$.path` resolution or logging `stateBefore`/`stateAfter`.
    #[must_use]
    pub fn snapshot(&self) -> Map<String, Value> {
        self.state.read().clone()
    }

    /// Merge an edge payload object into the state at the top level.
    ///
    /// Non-object payloads are ignored: a fired edge with a scalar or array
    /// payload doesn't have a natural place to merge, so the interpreter is
    /// expected to have already routed it into a specific state key before
    /// calling this, if it wants it retained.
    pub fn merge(&self, payload: &Value) {
        if let Value::Object(fields) = payload {
            let mut state = self.state.write();
            for (key, value) in fields {
                state.insert(key.clone(), value.clone());
            }
        }
    }

    /// Set a single state key directly.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.state.write().insert(key.into(), value);
    }

    /// Check if cancellation has been requested.
    pub fn check_cancelled(&self) -> Result<(), ExecutionError> {
        if self.cancellation.is_cancelled() {
            Err(ExecutionError::Cancelled)
        } else {
            Ok(())
        }
    }
}
