//! Repository-level error types.

use nebula_error::{Coded, ErrorCode};
use thiserror::Error;

/// Errors raised by the execution or automation repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No row exists under the requested id.
    #[error("execution not found: {0}")]
    NotFound(String),

    /// A requested page size exceeded [`nebula_core::MAX_PAGE_SIZE`].
    #[error("page size {0} exceeds the maximum of {1}")]
    PageTooLarge(usize, usize),

    /// An underlying status-transition or version check failed.
    #[error(transparent)]
    Execution(#[from] nebula_execution::ExecutionError),
}

impl Coded for RepositoryError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::WorkflowNotFound,
            Self::PageTooLarge(..) => ErrorCode::ValidationError,
            Self::Execution(inner) => inner.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_code() {
        let err = RepositoryError::NotFound("abc".into());
        assert_eq!(err.code(), ErrorCode::WorkflowNotFound);
    }

    #[test]
    fn page_too_large_code_and_message() {
        let err = RepositoryError::PageTooLarge(500, 100);
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.to_string(), "page size 500 exceeds the maximum of 100");
    }

    #[test]
    fn wraps_execution_error_code() {
        let err = RepositoryError::from(nebula_execution::ExecutionError::Cancelled);
        assert_eq!(err.code(), ErrorCode::Cancelled);
    }
}
