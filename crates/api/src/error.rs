//! Maps domain errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nebula_error::{Coded, ErrorCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no automation is bound to webhook path {0:?}")]
    UnknownWebhookPath(String),

    #[error("workflow {0} is not registered")]
    UnknownWorkflow(String),

    #[error("automation {0} is disabled")]
    AutomationDisabled(String),

    #[error(transparent)]
    Repository(#[from] nebula_repository::RepositoryError),
}

impl Coded for ApiError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownWebhookPath(_) | Self::UnknownWorkflow(_) => ErrorCode::WorkflowNotFound,
            Self::AutomationDisabled(_) => ErrorCode::VersionConflict,
            Self::Repository(err) => err.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::AutomationDisabled(_) => StatusCode::CONFLICT,
            _ => match self.code() {
                ErrorCode::WorkflowNotFound => StatusCode::NOT_FOUND,
                ErrorCode::ValidationError | ErrorCode::CronInvalid | ErrorCode::ReferenceError => StatusCode::BAD_REQUEST,
                ErrorCode::VersionConflict => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        let body = Json(json!({
            "code": self.code(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
