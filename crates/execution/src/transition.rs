//! Execution-status transition validation.

use crate::error::ExecutionError;
use crate::status::ExecutionStatus;

/// Returns `true` if the transition from `from` to `to` is valid.
///
/// Execution status is monotone: `Pending -> Running -> (Completed | Failed)`.
/// There is no path back out of a terminal status.
#[must_use]
pub fn can_transition(from: ExecutionStatus, to: ExecutionStatus) -> bool {
    matches!(
        (from, to),
        (ExecutionStatus::Pending, ExecutionStatus::Running)
            | (ExecutionStatus::Running, ExecutionStatus::Completed)
            | (ExecutionStatus::Running, ExecutionStatus::Failed)
    )
}

/// Validate a transition, returning an error if invalid.
pub fn validate_transition(from: ExecutionStatus, to: ExecutionStatus) -> Result<(), ExecutionError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(ExecutionError::invalid_transition(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        assert!(can_transition(
            ExecutionStatus::Pending,
            ExecutionStatus::Running
        ));
        assert!(can_transition(
            ExecutionStatus::Running,
            ExecutionStatus::Completed
        ));
        assert!(can_transition(
            ExecutionStatus::Running,
            ExecutionStatus::Failed
        ));
    }

    #[test]
    fn invalid_transitions() {
        assert!(!can_transition(
            ExecutionStatus::Pending,
            ExecutionStatus::Completed
        ));
        assert!(!can_transition(
            ExecutionStatus::Completed,
            ExecutionStatus::Running
        ));
        assert!(!can_transition(
            ExecutionStatus::Failed,
            ExecutionStatus::Running
        ));
        assert!(!can_transition(
            ExecutionStatus::Pending,
            ExecutionStatus::Pending
        ));
    }

    #[test]
    fn validate_transition_ok() {
        assert!(validate_transition(ExecutionStatus::Pending, ExecutionStatus::Running).is_ok());
    }

    #[test]
    fn validate_transition_err() {
        let err = validate_transition(ExecutionStatus::Completed, ExecutionStatus::Running)
            .unwrap_err();
        assert!(err.to_string().contains("invalid transition"));
    }
}
