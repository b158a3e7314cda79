use nebula_error::{Coded, ErrorCode};

/// Errors parsing or validating a workflow definition.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("node invocation must be a single-entry JSON object, got: {0}")]
    MalformedInvocation(String),

    #[error("node invocation body must be a JSON object")]
    MalformedBody,

    #[error("edge value must be null, an object, or an array, got: {0}")]
    MalformedEdge(String),

    #[error("workflow definition is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("workflow `{0}` exceeds the maximum of {1} nodes")]
    TooManyNodes(String, usize),
}

impl Coded for WorkflowError {
    fn code(&self) -> ErrorCode {
        ErrorCode::ValidationError
    }
}
