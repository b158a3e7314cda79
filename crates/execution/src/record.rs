//! The persisted execution record: one row per workflow run.

use chrono::{DateTime, Utc};
use nebula_core::{ExecutionId, WorkflowId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExecutionError;
use crate::node_log::NodeLogEntry;
use crate::status::ExecutionStatus;
use crate::transition::validate_transition;
use crate::triggered_by::TriggeredBy;

/// One row describing a single workflow run, from creation to completion.
///
/// Field names are a wire contract (spec §3, §6): camelCase, stable,
/// bit-exact against what the HTTP surface and persisted rows carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Unique identifier for this execution.
    pub id: ExecutionId,
    /// The workflow that was (or is being) run.
    pub workflow_id: WorkflowId,
    /// Current status.
    pub status: ExecutionStatus,
    /// What started this execution.
    pub triggered_by: TriggeredBy,
    /// The state the interpreter was seeded with.
    pub initial_state: Map<String, Value>,
    /// The state after the run finished, if it has.
    #[serde(default)]
    pub final_state: Option<Map<String, Value>>,
    /// Final edge payload of the run, if completed.
    #[serde(default)]
    pub result: Option<Value>,
    /// Error message, present only on a failed run.
    #[serde(default)]
    pub error: Option<String>,
    /// Invocation-tree index path of the node that failed, if any.
    #[serde(default)]
    pub failed_node_id: Option<String>,
    /// Ordered log of every node the interpreter invoked.
    #[serde(default)]
    pub node_logs: Vec<NodeLogEntry>,
    /// Optimistic concurrency version, bumped on each `complete_execution`.
    pub version: u64,
    /// When the record was created.
    pub started_at: DateTime<Utc>,
    /// When the run reached a terminal status.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExecutionRecord {
    /// Create a new record in the `Running` status — `createExecution` always
    /// starts a run immediately, there is no separately-observable `pending`
    /// row in the repository.
    #[must_use]
    pub fn start(
        id: ExecutionId,
        workflow_id: WorkflowId,
        triggered_by: TriggeredBy,
        initial_state: Map<String, Value>,
    ) -> Self {
        Self {
            id,
            workflow_id,
            status: ExecutionStatus::Running,
            triggered_by,
            initial_state,
            final_state: None,
            result: None,
            error: None,
            failed_node_id: None,
            node_logs: Vec::new(),
            version: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Append a node log entry. Idempotent under concurrent callers is the
    /// repository's job (serializing appends); this just mutates in place.
    pub fn append_node_log(&mut self, entry: NodeLogEntry) {
        self.node_logs.push(entry);
    }

    /// Transition to a terminal status, recording the outcome.
    ///
    /// Calling this a second time with the same `status` is a no-op success
    /// (idempotent completion) rather than a transition error, since a
    /// crashed caller may retry the same completion call.
    pub fn complete(
        &mut self,
        status: ExecutionStatus,
        result: Option<Value>,
        error: Option<String>,
        final_state: Option<Map<String, Value>>,
    ) -> Result<(), ExecutionError> {
        if self.status == status && self.status.is_terminal() {
            return Ok(());
        }

        validate_transition(self.status, status)?;
        self.status = status;
        self.result = result;
        self.error = error;
        self.final_state = final_state;
        self.version += 1;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Mark a specific node as the one that failed, setting `failedNodeId`.
    pub fn set_failed_node(&mut self, node_id: impl Into<String>) {
        self.failed_node_id = Some(node_id.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_record() -> ExecutionRecord {
        let mut state = Map::new();
        state.insert("a".into(), json!(10));
        ExecutionRecord::start(
            ExecutionId::v4(),
            WorkflowId::v4(),
            TriggeredBy::Manual,
            state,
        )
    }

    #[test]
    fn starts_running() {
        let record = make_record();
        assert_eq!(record.status, ExecutionStatus::Running);
        assert_eq!(record.version, 0);
        assert!(record.completed_at.is_none());
    }

    #[test]
    fn complete_success_bumps_version_and_sets_completed_at() {
        let mut record = make_record();
        record
            .complete(ExecutionStatus::Completed, Some(json!(30)), None, Some(Map::new()))
            .unwrap();
        assert_eq!(record.status, ExecutionStatus::Completed);
        assert_eq!(record.version, 1);
        assert!(record.completed_at.is_some());
        assert_eq!(record.result, Some(json!(30)));
    }

    #[test]
    fn complete_is_idempotent() {
        let mut record = make_record();
        record
            .complete(ExecutionStatus::Completed, Some(json!(1)), None, None)
            .unwrap();
        let version_after_first = record.version;
        record
            .complete(ExecutionStatus::Completed, Some(json!(1)), None, None)
            .unwrap();
        assert_eq!(record.version, version_after_first);
    }

    #[test]
    fn complete_from_terminal_to_different_status_errors() {
        let mut record = make_record();
        record.complete(ExecutionStatus::Completed, None, None, None).unwrap();
        let err = record.complete(ExecutionStatus::Failed, None, None, None).unwrap_err();
        assert!(err.to_string().contains("invalid transition"));
    }

    #[test]
    fn set_failed_node_records_path() {
        let mut record = make_record();
        record.set_failed_node("0.success?.1");
        assert_eq!(record.failed_node_id.as_deref(), Some("0.success?.1"));
    }

    #[test]
    fn append_node_log_preserves_order() {
        let mut record = make_record();
        let entry = |id: &str| crate::node_log::NodeLogEntry {
            node_id: id.into(),
            node_type: "log".into(),
            status: crate::node_log::NodeLogStatus::Completed,
            duration_ms: 1,
            config: json!({}),
            output: None,
            error: None,
            state_before: Map::new(),
            state_after: Map::new(),
        };
        record.append_node_log(entry("0"));
        record.append_node_log(entry("1"));
        assert_eq!(record.node_logs.len(), 2);
        assert_eq!(record.node_logs[0].node_id, "0");
        assert_eq!(record.node_logs[1].node_id, "1");
    }

    #[test]
    fn serde_roundtrip() {
        let record = make_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: ExecutionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, record.id);
        assert_eq!(back.status, record.status);
    }
}
