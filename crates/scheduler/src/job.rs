//! The scheduled-job entity and its state machine.

use chrono::{DateTime, Utc};
use nebula_core::{AutomationId, PluginId, WorkflowId};

/// `idle → armed → firing → (armed | idle)`, with any state collapsing to
/// `idle` on `unschedule_automation` or plugin teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// No timer is armed for this automation.
    Idle,
    /// A timer is armed for `next_run_at`.
    Armed,
    /// The tick fired; the plugin callback is running.
    Firing,
}

/// One row of the scheduler's job table.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub automation_id: AutomationId,
    pub plugin_id: PluginId,
    pub workflow_id: WorkflowId,
    pub cron_expression: String,
    pub timezone: String,
    pub state: JobState,
    pub next_run_at: Option<DateTime<Utc>>,
}

impl ScheduledJob {
    #[must_use]
    pub fn new(
        automation_id: AutomationId,
        plugin_id: PluginId,
        workflow_id: WorkflowId,
        cron_expression: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            automation_id,
            plugin_id,
            workflow_id,
            cron_expression: cron_expression.into(),
            timezone: timezone.into(),
            state: JobState::Idle,
            next_run_at: None,
        }
    }
}
