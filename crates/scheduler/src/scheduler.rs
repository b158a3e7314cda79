//! The process-wide job table: arming, firing, and tearing down cron timers.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use nebula_core::{AutomationId, ExecutionId, PluginId};
use nebula_execution::TriggeredBy;
use parking_lot::Mutex;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::callback::{AutomationCallback, AutomationExecutionContext};
use crate::error::SchedulerError;
use crate::job::{JobState, ScheduledJob};
use crate::validate::validate;

struct JobHandle {
    job: Arc<Mutex<ScheduledJob>>,
    cancel: CancellationToken,
}

/// What a single tick resolved to; mostly useful for tests and the manual
/// [`Scheduler::tick_now`] entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// The callback ran (its own success/failure is reported via `anyhow::Result`, logged, not returned here).
    Fired,
    /// A tick arrived while the automation was already firing; dropped, not queued.
    SkippedAlreadyFiring,
    /// No plugin is registered under this job's `plugin_id`.
    SkippedNoCallback,
}

/// Owns every armed cron timer in the process.
///
/// One background task per scheduled automation, started by
/// [`Scheduler::schedule_automation`] and stopped by cancelling its
/// [`CancellationToken`] — from `unschedule_automation`, `unregister_plugin`,
/// or `Scheduler` being dropped entirely. Methods that spawn a task take
/// `self: &Arc<Self>` so the task can hold its own reference.
#[derive(Default)]
pub struct Scheduler {
    jobs: DashMap<AutomationId, JobHandle>,
    callbacks: DashMap<PluginId, Arc<dyn AutomationCallback>>,
    /// Per-automation single-flight guard, independent of a job's own
    /// `state` field so a manual [`Scheduler::tick_now`] races the timer
    /// loop safely too.
    firing: DashMap<AutomationId, ()>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `plugin_id`, replacing any prior registration.
    pub fn register_plugin(&self, plugin_id: PluginId, callback: Arc<dyn AutomationCallback>) {
        self.callbacks.insert(plugin_id, callback);
    }

    /// Drop the callback and cancel every job owned by `plugin_id`.
    pub fn unregister_plugin(&self, plugin_id: PluginId) {
        self.callbacks.remove(&plugin_id);
        let owned: Vec<AutomationId> = self
            .jobs
            .iter()
            .filter(|entry| entry.value().job.lock().plugin_id == plugin_id)
            .map(|entry| *entry.key())
            .collect();
        for automation_id in owned {
            self.unschedule_automation(automation_id);
        }
    }

    /// Arm a timer for `job`. Re-scheduling an automation that already has
    /// one cancels and replaces the prior timer atomically before the new
    /// one starts.
    pub fn schedule_automation(self: &Arc<Self>, job: ScheduledJob) -> Result<(), SchedulerError> {
        let validation = validate(&job.cron_expression, &job.timezone);
        if !validation.valid {
            return Err(SchedulerError::InvalidCron {
                expression: job.cron_expression,
                timezone: job.timezone,
                reason: validation.error.unwrap_or_default(),
            });
        }

        let automation_id = job.automation_id;
        if self.jobs.contains_key(&automation_id) {
            self.unschedule_automation(automation_id);
        }

        let mut job = job;
        job.state = JobState::Armed;
        job.next_run_at = validation.next_run;

        let shared = Arc::new(Mutex::new(job));
        let cancel = CancellationToken::new();
        self.jobs.insert(
            automation_id,
            JobHandle {
                job: Arc::clone(&shared),
                cancel: cancel.clone(),
            },
        );

        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            scheduler.run_timer(automation_id, shared, cancel).await;
        });

        Ok(())
    }

    /// Cancel and remove `automation_id`'s timer. A no-op if it was never scheduled.
    pub fn unschedule_automation(&self, automation_id: AutomationId) {
        if let Some((_, handle)) = self.jobs.remove(&automation_id) {
            handle.job.lock().state = JobState::Idle;
            handle.cancel.cancel();
        }
    }

    /// Re-arm every job in `jobs` at process start. A `next_run_at` already
    /// in the past is simply recomputed from `validate` — missed ticks are
    /// not backfilled.
    pub fn rearm_all(self: &Arc<Self>, jobs: Vec<ScheduledJob>) {
        for job in jobs {
            let automation_id = job.automation_id;
            if let Err(err) = self.schedule_automation(job) {
                warn!(%automation_id, %err, "failed to re-arm automation at startup");
            }
        }
    }

    /// Current state of `automation_id`'s job, or `None` if unscheduled.
    #[must_use]
    pub fn state_of(&self, automation_id: AutomationId) -> Option<JobState> {
        self.jobs.get(&automation_id).map(|handle| handle.job.lock().state)
    }

    /// Fire `automation_id` immediately, outside its timer cadence —
    /// exercises the same single-flight and callback-lookup path a tick
    /// would, for manual/test triggering.
    pub async fn tick_now(&self, automation_id: AutomationId) -> Result<FireOutcome, SchedulerError> {
        let handle = self
            .jobs
            .get(&automation_id)
            .map(|entry| (Arc::clone(&entry.value().job)))
            .ok_or_else(|| SchedulerError::NotScheduled(automation_id.to_string()))?;
        Ok(self.fire_once(automation_id, &handle).await)
    }

    async fn run_timer(self: Arc<Self>, automation_id: AutomationId, job: Arc<Mutex<ScheduledJob>>, cancel: CancellationToken) {
        loop {
            let Some(next_run_at) = job.lock().next_run_at else {
                break;
            };
            let delay = (next_run_at - Utc::now()).to_std().unwrap_or(std::time::Duration::ZERO);
            let deadline = tokio::time::Instant::now() + delay;

            tokio::select! {
                () = cancel.cancelled() => {
                    job.lock().state = JobState::Idle;
                    break;
                }
                () = tokio::time::sleep_until(deadline) => {}
            }

            if cancel.is_cancelled() {
                job.lock().state = JobState::Idle;
                break;
            }

            self.fire_once(automation_id, &job).await;

            let still_scheduled = self.jobs.contains_key(&automation_id);
            let rearmed = still_scheduled && job.lock().next_run_at.is_some();
            if !rearmed {
                break;
            }
        }
    }

    /// The shared fire path: single-flight guard, callback lookup and
    /// invocation, and `nextRunAt` recomputation. Used by both the timer
    /// loop and [`Scheduler::tick_now`].
    async fn fire_once(&self, automation_id: AutomationId, job: &Arc<Mutex<ScheduledJob>>) -> FireOutcome {
        if self.firing.insert(automation_id, ()).is_some() {
            warn!(%automation_id, "tick arrived while already firing; dropped");
            return FireOutcome::SkippedAlreadyFiring;
        }

        job.lock().state = JobState::Firing;

        let (plugin_id, workflow_id, cron_expression, timezone) = {
            let guard = job.lock();
            (guard.plugin_id, guard.workflow_id, guard.cron_expression.clone(), guard.timezone.clone())
        };

        let outcome = match self.callbacks.get(&plugin_id).map(|entry| Arc::clone(&entry)) {
            None => {
                warn!(%automation_id, %plugin_id, "no callback registered; dropping tick");
                FireOutcome::SkippedNoCallback
            }
            Some(callback) => {
                let ctx = AutomationExecutionContext {
                    automation_id,
                    execution_id: ExecutionId::v4(),
                    workflow_id,
                    triggered_by: TriggeredBy::Automation,
                    trigger_data: Value::Null,
                };
                if let Err(err) = callback.on_fire(ctx).await {
                    warn!(%automation_id, %err, "automation callback failed");
                } else {
                    info!(%automation_id, "automation fired");
                }
                FireOutcome::Fired
            }
        };

        let validation = validate(&cron_expression, &timezone);
        {
            let mut guard = job.lock();
            guard.next_run_at = validation.next_run;
            guard.state = if validation.next_run.is_some() { JobState::Armed } else { JobState::Idle };
        }

        self.firing.remove(&automation_id);
        outcome
    }
}
