//! Execution-record error types.

use nebula_error::{Coded, ErrorCode};
use thiserror::Error;

use crate::status::ExecutionStatus;

/// Errors raised while tracking an execution record.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A status transition is not valid for the current status.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Attempted target status.
        to: String,
    },

    /// The execution does not exist in the repository.
    #[error("execution not found: {0}")]
    NotFound(String),

    /// A concurrent writer already advanced this execution's version.
    #[error("version conflict on execution {0}")]
    VersionConflict(String),

    /// Execution was cancelled via the cooperative cancellation signal.
    #[error("execution cancelled")]
    Cancelled,

    /// A serialization or deserialization error.
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExecutionError {
    /// Build an [`ExecutionError::InvalidTransition`] from two statuses.
    #[must_use]
    pub fn invalid_transition(from: ExecutionStatus, to: ExecutionStatus) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl Coded for ExecutionError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidTransition { .. } | Self::Serialization(_) => ErrorCode::ValidationError,
            Self::NotFound(_) => ErrorCode::WorkflowNotFound,
            Self::VersionConflict(_) => ErrorCode::VersionConflict,
            Self::Cancelled => ErrorCode::Cancelled,
        }
    }
}
