use nebula_error::{Coded, ErrorCode};

/// Error type for action execution.
///
/// Spec's error taxonomy treats every unhandled action failure uniformly as
/// `NODE_FAILED` — there is no retry/backoff policy at this layer (the
/// interpreter itself doesn't retry; see `nebula-engine`).
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ActionError {
    /// The action failed to produce a result.
    #[error("{message}")]
    Failed {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Input config failed validation before execution began.
    #[error("validation: {0}")]
    Validation(String),

    /// Execution cancelled via the cooperative cancellation token.
    #[error("cancelled")]
    Cancelled,
}

impl ActionError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed {
            message: msg.into(),
            details: None,
        }
    }

    pub fn failed_with_details(msg: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Failed {
            message: msg.into(),
            details: Some(details),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl Coded for ActionError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::Failed { .. } => ErrorCode::NodeFailed,
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::Cancelled => ErrorCode::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_error_displays_message() {
        let err = ActionError::failed("connection reset");
        assert_eq!(err.to_string(), "connection reset");
        assert_eq!(err.code(), ErrorCode::NodeFailed);
    }

    #[test]
    fn validation_error_has_validation_code() {
        let err = ActionError::validation("missing field");
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn cancelled_has_cancelled_code() {
        assert_eq!(ActionError::Cancelled.code(), ErrorCode::Cancelled);
    }

    #[test]
    fn failed_with_details_carries_payload() {
        let details = serde_json::json!({"field": "email"});
        let err = ActionError::failed_with_details("invalid input", details.clone());
        match err {
            ActionError::Failed { details: d, .. } => assert_eq!(d, Some(details)),
            _ => panic!("expected Failed"),
        }
    }
}
