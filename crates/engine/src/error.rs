//! Engine-level error types.

use nebula_error::{Coded, ErrorCode};
use thiserror::Error;

/// Errors the interpreter itself can raise, as distinct from a node's own
/// [`ActionError`](nebula_action::ActionError) (which becomes a
/// [`EngineError::NodeFailed`] once caught).
#[derive(Debug, Error)]
pub enum EngineError {
    /// `nodeType` has no registered implementation.
    #[error("unknown node type: {0}")]
    UnknownNode(String),

    /// A node's `execute` returned an [`EdgeMap`](nebula_action::EdgeMap)
    /// with no fired edge.
    #[error("node {0} declared no outcome")]
    NodeNoEdge(String),

    /// The execution's cancellation signal was observed between nodes.
    #[error("execution cancelled")]
    Cancelled,

    /// A node threw during `execute`.
    #[error("node {node_id} failed: {message}")]
    NodeFailed {
        /// Invocation-tree index path of the failing node.
        node_id: String,
        /// The node's error message.
        message: String,
    },

    /// The workflow definition itself was malformed.
    #[error("invalid workflow: {0}")]
    InvalidWorkflow(#[from] nebula_workflow::WorkflowError),

    /// A loop node (`...`) re-entered itself past [`nebula_workflow::MAX_WORKFLOW_NODES`]
    /// iterations without its loop edge resolving to `null`.
    #[error("loop node {0} exceeded the maximum iteration count")]
    LoopLimitExceeded(String),
}

impl Coded for EngineError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownNode(_) => ErrorCode::UnknownNode,
            Self::NodeNoEdge(_) => ErrorCode::NodeNoEdge,
            Self::Cancelled => ErrorCode::Cancelled,
            Self::NodeFailed { .. } => ErrorCode::NodeFailed,
            Self::InvalidWorkflow(_) => ErrorCode::ValidationError,
            Self::LoopLimitExceeded(_) => ErrorCode::LoopLimitExceeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_node_code() {
        let err = EngineError::UnknownNode("ghost".into());
        assert_eq!(err.code(), ErrorCode::UnknownNode);
        assert_eq!(err.to_string(), "unknown node type: ghost");
    }

    #[test]
    fn node_no_edge_code() {
        let err = EngineError::NodeNoEdge("0".into());
        assert_eq!(err.code(), ErrorCode::NodeNoEdge);
    }

    #[test]
    fn cancelled_code() {
        assert_eq!(EngineError::Cancelled.code(), ErrorCode::Cancelled);
    }

    #[test]
    fn loop_limit_exceeded_code() {
        let err = EngineError::LoopLimitExceeded("0".into());
        assert_eq!(err.code(), ErrorCode::LoopLimitExceeded);
        assert!(err.to_string().contains('0'));
    }

    #[test]
    fn node_failed_display_and_code() {
        let err = EngineError::NodeFailed {
            node_id: "0.success?.1".into(),
            message: "timeout".into(),
        };
        assert_eq!(err.code(), ErrorCode::NodeFailed);
        assert!(err.to_string().contains("0.success?.1"));
    }
}
