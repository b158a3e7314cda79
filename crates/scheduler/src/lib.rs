#![forbid(unsafe_code)]

//! # Nebula Scheduler
//!
//! Owns cron-expression timers and fires automations through a per-plugin
//! callback. This crate never touches persistence or the interpreter
//! directly — [`AutomationCallback::on_fire`] is where a caller creates the
//! execution record, runs the workflow, and writes the outcome back.

mod callback;
mod error;
mod job;
mod scheduler;
mod validate;

pub use callback::{AutomationCallback, AutomationExecutionContext};
pub use error::SchedulerError;
pub use job::{JobState, ScheduledJob};
pub use scheduler::{FireOutcome, Scheduler};
pub use validate::{validate, CronValidation};
