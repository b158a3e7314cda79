//! The execution write/read path (spec §4.E).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use nebula_core::{ExecutionId, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use nebula_execution::{ExecutionRecord, ExecutionStatus, NodeLogEntry};
use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::RepositoryError;
use crate::filter::ExecutionFilter;

/// Persists [`ExecutionRecord`]s: the write path an interpreter run reports
/// into, and the read path callers list and page through.
///
/// Implementations serialize concurrent `append_node_log` calls to the same
/// execution — the in-memory reference implementation does this with a
/// single lock over the whole table, which is correct but coarse; a SQL
/// backend would serialize per-row instead.
#[async_trait]
pub trait ExecutionRepository: Send + Sync {
    /// Insert a new record. Errors if `record.id` already exists.
    async fn create_execution(&self, record: ExecutionRecord) -> Result<(), RepositoryError>;

    /// Atomically transition `id` to a terminal status. Idempotent: a
    /// second call with the same terminal status is a no-op success.
    async fn complete_execution(
        &self,
        id: ExecutionId,
        status: ExecutionStatus,
        result: Option<Value>,
        error: Option<String>,
        final_state: Option<Map<String, Value>>,
    ) -> Result<(), RepositoryError>;

    /// Append one node log entry, in call order.
    async fn append_node_log(&self, id: ExecutionId, entry: NodeLogEntry) -> Result<(), RepositoryError>;

    /// Mark the invocation-tree path of the node that failed.
    async fn set_failed_node(&self, id: ExecutionId, node_id: String) -> Result<(), RepositoryError>;

    /// Fetch the full row by id.
    async fn get(&self, id: ExecutionId) -> Result<ExecutionRecord, RepositoryError>;

    /// Page through records matching `filter`, most recently started first.
    async fn list(&self, filter: ExecutionFilter) -> Result<Vec<ExecutionRecord>, RepositoryError>;
}

/// Reference in-memory implementation: a process stands in for "no SQL
/// dialect assumed" (spec §1).
#[derive(Default)]
pub struct InMemoryExecutionRepository {
    records: RwLock<HashMap<ExecutionId, ExecutionRecord>>,
}

impl InMemoryExecutionRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExecutionRepository for InMemoryExecutionRepository {
    async fn create_execution(&self, record: ExecutionRecord) -> Result<(), RepositoryError> {
        self.records.write().insert(record.id, record);
        Ok(())
    }

    async fn complete_execution(
        &self,
        id: ExecutionId,
        status: ExecutionStatus,
        result: Option<Value>,
        error: Option<String>,
        final_state: Option<Map<String, Value>>,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        record.complete(status, result, error, final_state)?;
        Ok(())
    }

    async fn append_node_log(&self, id: ExecutionId, entry: NodeLogEntry) -> Result<(), RepositoryError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        record.append_node_log(entry);
        Ok(())
    }

    async fn set_failed_node(&self, id: ExecutionId, node_id: String) -> Result<(), RepositoryError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        record.set_failed_node(node_id);
        Ok(())
    }

    async fn get(&self, id: ExecutionId) -> Result<ExecutionRecord, RepositoryError> {
        self.records
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn list(&self, filter: ExecutionFilter) -> Result<Vec<ExecutionRecord>, RepositoryError> {
        let limit = filter.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        if limit > MAX_PAGE_SIZE {
            return Err(RepositoryError::PageTooLarge(limit, MAX_PAGE_SIZE));
        }

        let mut matched: Vec<ExecutionRecord> = self
            .records
            .read()
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        filter.sort(&mut matched);

        Ok(matched.into_iter().skip(filter.offset).take(limit).collect())
    }
}

/// Cheaply clonable handle over the shared in-memory table, for wiring one
/// repository instance into both the interpreter caller and an HTTP layer.
pub type SharedExecutionRepository = Arc<dyn ExecutionRepository>;

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::WorkflowId;
    use nebula_execution::{NodeLogStatus, TriggeredBy};
    use serde_json::json;

    fn record() -> ExecutionRecord {
        ExecutionRecord::start(ExecutionId::v4(), WorkflowId::v4(), TriggeredBy::Manual, Map::new())
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = InMemoryExecutionRepository::new();
        let record = record();
        let id = record.id;
        repo.create_execution(record).await.unwrap();

        let fetched = repo.get(id).await.unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.status, ExecutionStatus::Running);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let repo = InMemoryExecutionRepository::new();
        let err = repo.get(ExecutionId::v4()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn complete_execution_is_idempotent() {
        let repo = InMemoryExecutionRepository::new();
        let record = record();
        let id = record.id;
        repo.create_execution(record).await.unwrap();

        repo.complete_execution(id, ExecutionStatus::Completed, Some(json!(1)), None, None)
            .await
            .unwrap();
        repo.complete_execution(id, ExecutionStatus::Completed, Some(json!(1)), None, None)
            .await
            .unwrap();

        let fetched = repo.get(id).await.unwrap();
        assert_eq!(fetched.version, 1);
    }

    #[tokio::test]
    async fn append_node_log_accumulates_in_order() {
        let repo = InMemoryExecutionRepository::new();
        let record = record();
        let id = record.id;
        repo.create_execution(record).await.unwrap();

        for node_id in ["0", "1"] {
            repo.append_node_log(
                id,
                NodeLogEntry {
                    node_id: node_id.into(),
                    node_type: "log".into(),
                    status: NodeLogStatus::Completed,
                    duration_ms: 1,
                    config: json!({}),
                    output: None,
                    error: None,
                    state_before: Map::new(),
                    state_after: Map::new(),
                },
            )
            .await
            .unwrap();
        }

        let fetched = repo.get(id).await.unwrap();
        assert_eq!(fetched.node_logs.len(), 2);
        assert_eq!(fetched.node_logs[0].node_id, "0");
    }

    #[tokio::test]
    async fn list_filters_by_status_and_respects_limit() {
        let repo = InMemoryExecutionRepository::new();
        for _ in 0..3 {
            repo.create_execution(record()).await.unwrap();
        }
        let completed = record();
        let completed_id = completed.id;
        repo.create_execution(completed).await.unwrap();
        repo.complete_execution(completed_id, ExecutionStatus::Completed, None, None, None)
            .await
            .unwrap();

        let running = repo
            .list(ExecutionFilter {
                status: Some(ExecutionStatus::Running),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(running.len(), 3);

        let limited = repo
            .list(ExecutionFilter {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn list_rejects_page_size_over_the_max() {
        let repo = InMemoryExecutionRepository::new();
        let err = repo
            .list(ExecutionFilter {
                limit: Some(500),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::PageTooLarge(500, 100)));
    }
}
