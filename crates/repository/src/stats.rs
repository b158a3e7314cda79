//! Aggregate stats across a filtered set of executions (spec §4.E "Stats").

use std::collections::HashMap;

use nebula_execution::{ExecutionRecord, ExecutionStatus};

/// `total`, `byStatus`, `successRate`, and `averageDuration` across a set of
/// records — always computed fresh from the raw rows, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionStats {
    pub total: usize,
    pub by_status: HashMap<ExecutionStatus, usize>,
    /// `completed / total`, or `0.0` when `total == 0`.
    pub success_rate: f64,
    /// Mean wall-clock duration over completed runs only, in milliseconds.
    pub average_duration_ms: Option<f64>,
}

/// Compute [`ExecutionStats`] over `records`.
#[must_use]
pub fn compute_stats(records: &[ExecutionRecord]) -> ExecutionStats {
    let total = records.len();

    let mut by_status: HashMap<ExecutionStatus, usize> = HashMap::new();
    for record in records {
        *by_status.entry(record.status).or_insert(0) += 1;
    }

    let completed: Vec<&ExecutionRecord> = records
        .iter()
        .filter(|r| r.status == ExecutionStatus::Completed)
        .collect();

    let success_rate = if total == 0 {
        0.0
    } else {
        completed.len() as f64 / total as f64
    };

    let average_duration_ms = if completed.is_empty() {
        None
    } else {
        let durations: Vec<f64> = completed
            .iter()
            .filter_map(|r| r.completed_at.map(|end| (end - r.started_at).num_milliseconds() as f64))
            .collect();
        if durations.is_empty() {
            None
        } else {
            Some(durations.iter().sum::<f64>() / durations.len() as f64)
        }
    };

    ExecutionStats {
        total,
        by_status,
        success_rate,
        average_duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::{ExecutionId, WorkflowId};
    use nebula_execution::TriggeredBy;
    use serde_json::Map;

    fn running() -> ExecutionRecord {
        ExecutionRecord::start(ExecutionId::v4(), WorkflowId::v4(), TriggeredBy::Manual, Map::new())
    }

    #[test]
    fn empty_set_has_zero_total_and_rate() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert!(stats.average_duration_ms.is_none());
    }

    #[test]
    fn success_rate_counts_only_completed() {
        let mut completed = running();
        completed.complete(ExecutionStatus::Completed, None, None, None).unwrap();
        let mut failed = running();
        failed.complete(ExecutionStatus::Failed, None, Some("x".into()), None).unwrap();

        let stats = compute_stats(&[completed, failed, running()]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success_rate, 1.0 / 3.0);
        assert_eq!(stats.by_status[&ExecutionStatus::Running], 1);
    }

    #[test]
    fn average_duration_only_over_completed_runs() {
        let mut record = running();
        record.started_at = chrono::Utc::now() - chrono::Duration::seconds(2);
        record.complete(ExecutionStatus::Completed, None, None, None).unwrap();

        let stats = compute_stats(&[record]);
        let avg = stats.average_duration_ms.unwrap();
        assert!(avg >= 1900.0, "expected ~2000ms, got {avg}");
    }
}
