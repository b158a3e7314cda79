//! The per-node audit trail the interpreter appends to as it runs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of a single node invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeLogStatus {
    /// The node fired an edge carrying a payload.
    Completed,
    /// The node threw, was cancelled, or was unresolvable.
    Failed,
}

/// One entry in an execution's node log: everything needed to reconstruct a
/// timeline and a state-diff without re-running the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLogEntry {
    /// Invocation-tree index path, e.g. `"0"` or `"0.success?.1"`.
    pub node_id: String,
    /// The node's `nodeType` (the key before any alias/loop suffix).
    pub node_type: String,
    /// Whether the node completed or failed.
    pub status: NodeLogStatus,
    /// Wall-clock duration of the invocation.
    pub duration_ms: u64,
    /// The node's config after `$.path` resolution.
    pub config: Value,
    /// The payload carried by the edge that fired, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    /// Error message, present only when `status == Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Execution state immediately before this node ran.
    pub state_before: Map<String, Value>,
    /// Execution state immediately after this node's edge payload was merged in.
    pub state_after: Map<String, Value>,
}

impl NodeLogEntry {
    /// `true` if this entry records a completed (non-failed) node.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == NodeLogStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(status: NodeLogStatus) -> NodeLogEntry {
        NodeLogEntry {
            node_id: "0".into(),
            node_type: "math".into(),
            status,
            duration_ms: 4,
            config: json!({"operation": "add"}),
            output: Some(json!({"mathResult": 30})),
            error: None,
            state_before: serde_json::Map::new(),
            state_after: serde_json::Map::new(),
        }
    }

    #[test]
    fn is_completed() {
        assert!(entry(NodeLogStatus::Completed).is_completed());
        assert!(!entry(NodeLogStatus::Failed).is_completed());
    }

    #[test]
    fn serde_omits_absent_error_and_output() {
        let mut e = entry(NodeLogStatus::Failed);
        e.output = None;
        e.error = Some("boom".into());
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["error"], json!("boom"));
        assert!(json.get("output").is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let e = entry(NodeLogStatus::Completed);
        let json = serde_json::to_string(&e).unwrap();
        let back: NodeLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.node_id, e.node_id);
        assert_eq!(back.output, e.output);
    }
}
