//! Execution listing and lookup (spec §6 `GET /executions`).

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use nebula_core::{ExecutionId, WorkflowId};
use nebula_execution::{ExecutionRecord, ExecutionStatus};
use nebula_repository::{ExecutionFilter, ExecutionRepository, SortBy, SortOrder};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Query params as the wire names the spec fixes: `startDate`/`endDate`
/// bound the window, `pageSize`/`sortBy`/`sortOrder` as in §6.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<ExecutionStatus>,
    pub workflow_id: Option<WorkflowId>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub offset: usize,
    pub page_size: Option<usize>,
    pub sort_by: Option<SortByQuery>,
    pub sort_order: Option<SortOrderQuery>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortByQuery {
    StartTime,
    CompletedAt,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrderQuery {
    Asc,
    Desc,
}

impl From<ListQuery> for ExecutionFilter {
    fn from(query: ListQuery) -> Self {
        Self {
            status: query.status,
            workflow_id: query.workflow_id,
            since: query.start_date,
            until: query.end_date,
            offset: query.offset,
            // spec §6: pageSize clamped to [1, 100], default 50.
            limit: Some(query.page_size.unwrap_or(50).clamp(1, 100)),
            sort_by: match query.sort_by {
                Some(SortByQuery::CompletedAt) => SortBy::CompletedAt,
                _ => SortBy::StartTime,
            },
            sort_order: match query.sort_order {
                Some(SortOrderQuery::Asc) => SortOrder::Asc,
                _ => SortOrder::Desc,
            },
        }
    }
}

pub async fn list(Query(query): Query<ListQuery>, State(state): State<AppState>) -> Result<Json<Vec<ExecutionRecord>>, ApiError> {
    let records = state.execution_repo.list(query.into()).await?;
    Ok(Json(records))
}

pub async fn get_one(Path(id): Path<ExecutionId>, State(state): State<AppState>) -> Result<Json<ExecutionRecord>, ApiError> {
    let record = state.execution_repo.get(id).await?;
    Ok(Json(record))
}
