//! Reconstructing a human-readable timeline from a raw execution record
//! (spec §4.E "Derived views") — nothing here is persisted separately.

use chrono::{DateTime, Utc};
use nebula_execution::{ExecutionRecord, ExecutionStatus, NodeLogStatus};

/// One moment in an execution's life, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    WorkflowStarted { at: DateTime<Utc> },
    NodeStarted { node_id: String, node_type: String },
    NodeCompleted { node_id: String, node_type: String },
    NodeFailed { node_id: String, node_type: String, error: String },
    StateChanged { node_id: String },
    WorkflowCompleted { at: DateTime<Utc> },
    WorkflowFailed { at: DateTime<Utc>, error: String },
}

/// Rebuild the event sequence the live bus would have emitted while this
/// execution ran.
#[must_use]
pub fn timeline(record: &ExecutionRecord) -> Vec<TimelineEvent> {
    let mut events = vec![TimelineEvent::WorkflowStarted { at: record.started_at }];

    for entry in &record.node_logs {
        events.push(TimelineEvent::NodeStarted {
            node_id: entry.node_id.clone(),
            node_type: entry.node_type.clone(),
        });

        if entry.state_before != entry.state_after {
            events.push(TimelineEvent::StateChanged {
                node_id: entry.node_id.clone(),
            });
        }

        events.push(match entry.status {
            NodeLogStatus::Completed => TimelineEvent::NodeCompleted {
                node_id: entry.node_id.clone(),
                node_type: entry.node_type.clone(),
            },
            NodeLogStatus::Failed => TimelineEvent::NodeFailed {
                node_id: entry.node_id.clone(),
                node_type: entry.node_type.clone(),
                error: entry.error.clone().unwrap_or_default(),
            },
        });
    }

    if let Some(completed_at) = record.completed_at {
        events.push(match record.status {
            ExecutionStatus::Completed => TimelineEvent::WorkflowCompleted { at: completed_at },
            ExecutionStatus::Failed => TimelineEvent::WorkflowFailed {
                at: completed_at,
                error: record.error.clone().unwrap_or_default(),
            },
            ExecutionStatus::Pending | ExecutionStatus::Running => unreachable!("completed_at implies a terminal status"),
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::{ExecutionId, WorkflowId};
    use nebula_execution::{NodeLogEntry, TriggeredBy};
    use serde_json::{json, Map};

    fn base_record() -> ExecutionRecord {
        ExecutionRecord::start(ExecutionId::v4(), WorkflowId::v4(), TriggeredBy::Manual, Map::new())
    }

    #[test]
    fn running_record_has_no_terminal_event() {
        let events = timeline(&base_record());
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TimelineEvent::WorkflowStarted { .. }));
    }

    #[test]
    fn state_change_is_reported_only_when_state_actually_changed() {
        let mut record = base_record();
        let mut after = Map::new();
        after.insert("a".into(), json!(1));
        record.append_node_log(NodeLogEntry {
            node_id: "0".into(),
            node_type: "math".into(),
            status: NodeLogStatus::Completed,
            duration_ms: 1,
            config: json!({}),
            output: None,
            error: None,
            state_before: Map::new(),
            state_after: after,
        });
        record.append_node_log(NodeLogEntry {
            node_id: "1".into(),
            node_type: "log".into(),
            status: NodeLogStatus::Completed,
            duration_ms: 1,
            config: json!({}),
            output: None,
            error: None,
            state_before: {
                let mut m = Map::new();
                m.insert("a".into(), json!(1));
                m
            },
            state_after: {
                let mut m = Map::new();
                m.insert("a".into(), json!(1));
                m
            },
        });

        let events = timeline(&record);
        let state_changes = events.iter().filter(|e| matches!(e, TimelineEvent::StateChanged { .. })).count();
        assert_eq!(state_changes, 1);
    }

    #[test]
    fn terminal_event_reflects_final_status() {
        let mut record = base_record();
        record
            .complete(ExecutionStatus::Failed, None, Some("kaboom".into()), None)
            .unwrap();

        let events = timeline(&record);
        match events.last().unwrap() {
            TimelineEvent::WorkflowFailed { error, .. } => assert_eq!(error, "kaboom"),
            other => panic!("expected WorkflowFailed, got {other:?}"),
        }
    }
}
