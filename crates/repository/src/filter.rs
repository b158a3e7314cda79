//! List-query filtering shared by the execution and automation repositories.

use chrono::{DateTime, Utc};
use nebula_core::WorkflowId;
use nebula_execution::{ExecutionRecord, ExecutionStatus};

/// Which timestamp `ExecutionRepository::list` orders by (spec §6
/// `sortBy ∈ {startTime, completedAt}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    StartTime,
    CompletedAt,
}

/// Ascending or descending (spec §6 `sortOrder`, default `desc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Desc
    }
}

/// Filter + pagination for `ExecutionRepository::list`.
///
/// Cursor-free: pagination is `(offset, limit)`, with `limit` clamped to
/// [`nebula_core::MAX_PAGE_SIZE`] by the repository, not the caller.
#[derive(Debug, Clone, Default)]
pub struct ExecutionFilter {
    pub status: Option<ExecutionStatus>,
    pub workflow_id: Option<WorkflowId>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub offset: usize,
    pub limit: Option<usize>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl ExecutionFilter {
    /// Sort `records` in place per `sort_by`/`sort_order`. Records missing
    /// the sort key (e.g. `completed_at` on a still-running execution) sort
    /// last regardless of order.
    pub fn sort(&self, records: &mut [ExecutionRecord]) {
        records.sort_by(|a, b| {
            let key = |r: &ExecutionRecord| match self.sort_by {
                SortBy::StartTime => Some(r.started_at),
                SortBy::CompletedAt => r.completed_at,
            };
            let ordering = match (key(a), key(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            match self.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    #[must_use]
    pub fn matches(&self, record: &nebula_execution::ExecutionRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(workflow_id) = self.workflow_id {
            if record.workflow_id != workflow_id {
                return false;
            }
        }
        if let Some(since) = self.since {
            if record.started_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if record.started_at > until {
                return false;
            }
        }
        true
    }
}
