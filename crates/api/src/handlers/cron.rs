//! `POST /automations/cron/validate` — a thin wrapper over the scheduler's pure
//! validation function; no job is armed by calling this endpoint.

use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub cron_expression: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_owned()
}

pub async fn validate(Json(request): Json<ValidateRequest>) -> Json<nebula_scheduler::CronValidation> {
    Json(nebula_scheduler::validate(&request.cron_expression, &request.timezone))
}
