//! Automations: persistent trigger-to-workflow bindings (spec §3, §4.F).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nebula_core::{AutomationId, PluginId, TenantId, WorkflowId};
use nebula_execution::{ExecutionRecord, TriggeredBy};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RepositoryError;

/// What causes an automation to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerType {
    /// Fires once, immediately, when created — no recurring timer.
    Immediate,
    /// Fires on a cron schedule; see [`TriggerConfig::Cron`].
    Cron,
    /// Fires on an inbound webhook call; see [`TriggerConfig::Webhook`].
    Webhook,
}

/// The trigger-specific configuration shape, one variant per [`TriggerType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TriggerConfig {
    Immediate,
    Cron {
        cron_expression: String,
        #[serde(default = "default_timezone")]
        timezone: String,
    },
    Webhook {
        webhook_url: String,
    },
}

fn default_timezone() -> String {
    "UTC".to_owned()
}

impl TriggerConfig {
    /// The [`TriggerType`] this configuration belongs to.
    #[must_use]
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            Self::Immediate => TriggerType::Immediate,
            Self::Cron { .. } => TriggerType::Cron,
            Self::Webhook { .. } => TriggerType::Webhook,
        }
    }
}

/// A persistent trigger-to-workflow binding.
///
/// **Invariant:** `success_count + failure_count <= run_count`; `next_run_at`
/// is `Some` iff `trigger_config` is `Cron` and `enabled` — enforced by
/// [`Automation::record_run`] and [`Automation::set_enabled`], never by the
/// caller directly mutating the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    pub id: AutomationId,
    pub plugin_id: PluginId,
    pub tenant_id: Option<TenantId>,
    pub workflow_id: WorkflowId,
    pub enabled: bool,
    pub trigger_config: TriggerConfig,
    pub run_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl Automation {
    /// Create a new, disabled-by-default automation with zeroed counters.
    #[must_use]
    pub fn new(id: AutomationId, plugin_id: PluginId, workflow_id: WorkflowId, trigger_config: TriggerConfig) -> Self {
        Self {
            id,
            plugin_id,
            tenant_id: None,
            workflow_id,
            enabled: false,
            trigger_config,
            run_count: 0,
            success_count: 0,
            failure_count: 0,
            last_run_at: None,
            next_run_at: None,
            last_error: None,
        }
    }

    /// Record the outcome of one fire: bumps `run_count` and exactly one of
    /// `success_count` / `failure_count`, and sets `last_run_at`/`last_error`.
    pub fn record_run(&mut self, success: bool, error: Option<String>) {
        self.run_count += 1;
        if success {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.last_run_at = Some(Utc::now());
        self.last_error = error;
    }

    /// Toggle `enabled`, clearing `next_run_at` when disabled (the cron
    /// invariant: a non-cron or disabled automation never has a next run).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.next_run_at = None;
        }
    }

    /// Set the next scheduled fire time. No-op (clears instead) unless this
    /// is an enabled cron automation.
    pub fn set_next_run_at(&mut self, next: Option<DateTime<Utc>>) {
        self.next_run_at = if self.enabled && matches!(self.trigger_config, TriggerConfig::Cron { .. }) {
            next
        } else {
            None
        };
    }
}

/// An execution started by an automation: the same shape as
/// [`ExecutionRecord`] plus the automation linkage and the trigger payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationExecution {
    pub execution: ExecutionRecord,
    pub automation_id: AutomationId,
    pub trigger_source: TriggeredBy,
    pub trigger_data: Value,
}

/// Persists [`Automation`] rows.
#[async_trait]
pub trait AutomationRepository: Send + Sync {
    async fn create(&self, automation: Automation) -> Result<(), RepositoryError>;
    async fn get(&self, id: AutomationId) -> Result<Automation, RepositoryError>;
    async fn update(&self, automation: Automation) -> Result<(), RepositoryError>;
    async fn list_enabled(&self) -> Result<Vec<Automation>, RepositoryError>;
    async fn list_by_plugin(&self, plugin_id: PluginId) -> Result<Vec<Automation>, RepositoryError>;
    /// Every automation regardless of `enabled`, for callers (e.g. webhook
    /// dispatch) that need to tell "unknown path" apart from "known path,
    /// disabled automation".
    async fn list_all(&self) -> Result<Vec<Automation>, RepositoryError>;
}

/// In-memory reference implementation, mirroring
/// [`crate::InMemoryExecutionRepository`].
#[derive(Default)]
pub struct InMemoryAutomationRepository {
    automations: RwLock<HashMap<AutomationId, Automation>>,
}

impl InMemoryAutomationRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AutomationRepository for InMemoryAutomationRepository {
    async fn create(&self, automation: Automation) -> Result<(), RepositoryError> {
        self.automations.write().insert(automation.id, automation);
        Ok(())
    }

    async fn get(&self, id: AutomationId) -> Result<Automation, RepositoryError> {
        self.automations
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn update(&self, automation: Automation) -> Result<(), RepositoryError> {
        let mut automations = self.automations.write();
        if !automations.contains_key(&automation.id) {
            return Err(RepositoryError::NotFound(automation.id.to_string()));
        }
        automations.insert(automation.id, automation);
        Ok(())
    }

    async fn list_enabled(&self) -> Result<Vec<Automation>, RepositoryError> {
        Ok(self.automations.read().values().filter(|a| a.enabled).cloned().collect())
    }

    async fn list_by_plugin(&self, plugin_id: PluginId) -> Result<Vec<Automation>, RepositoryError> {
        Ok(self
            .automations
            .read()
            .values()
            .filter(|a| a.plugin_id == plugin_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Automation>, RepositoryError> {
        Ok(self.automations.read().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cron_automation() -> Automation {
        Automation::new(
            AutomationId::v4(),
            PluginId::v4(),
            WorkflowId::v4(),
            TriggerConfig::Cron {
                cron_expression: "0 * * * *".into(),
                timezone: "UTC".into(),
            },
        )
    }

    #[test]
    fn record_run_keeps_the_run_count_invariant() {
        let mut automation = cron_automation();
        automation.record_run(true, None);
        automation.record_run(false, Some("boom".into()));
        assert_eq!(automation.run_count, 2);
        assert_eq!(automation.success_count + automation.failure_count, automation.run_count);
        assert_eq!(automation.last_error.as_deref(), Some("boom"));
    }

    #[test]
    fn next_run_at_requires_enabled_cron() {
        let mut automation = cron_automation();
        automation.set_next_run_at(Some(Utc::now()));
        assert!(automation.next_run_at.is_none(), "disabled automation must not have a next run");

        automation.set_enabled(true);
        automation.set_next_run_at(Some(Utc::now()));
        assert!(automation.next_run_at.is_some());
    }

    #[test]
    fn disabling_clears_next_run_at() {
        let mut automation = cron_automation();
        automation.set_enabled(true);
        automation.set_next_run_at(Some(Utc::now()));
        assert!(automation.next_run_at.is_some());

        automation.set_enabled(false);
        assert!(automation.next_run_at.is_none());
    }

    #[test]
    fn non_cron_automation_never_gets_a_next_run() {
        let mut automation = Automation::new(
            AutomationId::v4(),
            PluginId::v4(),
            WorkflowId::v4(),
            TriggerConfig::Webhook {
                webhook_url: "/hooks/abc".into(),
            },
        );
        automation.set_enabled(true);
        automation.set_next_run_at(Some(Utc::now()));
        assert!(automation.next_run_at.is_none());
    }

    #[tokio::test]
    async fn create_get_update_round_trip() {
        let repo = InMemoryAutomationRepository::new();
        let automation = cron_automation();
        let id = automation.id;
        repo.create(automation).await.unwrap();

        let mut fetched = repo.get(id).await.unwrap();
        fetched.set_enabled(true);
        repo.update(fetched).await.unwrap();

        assert!(repo.get(id).await.unwrap().enabled);
    }

    #[tokio::test]
    async fn list_enabled_excludes_disabled() {
        let repo = InMemoryAutomationRepository::new();
        let mut enabled = cron_automation();
        enabled.set_enabled(true);
        repo.create(enabled).await.unwrap();
        repo.create(cron_automation()).await.unwrap();

        assert_eq!(repo.list_enabled().await.unwrap().len(), 1);
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_missing_automation_errors() {
        let repo = InMemoryAutomationRepository::new();
        let err = repo.update(cron_automation()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
