//! Scheduler error types.

use nebula_error::{Coded, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// `cronExpression` failed to parse, or `timezone` isn't a known IANA name.
    #[error("invalid cron expression {expression:?} for timezone {timezone:?}: {reason}")]
    InvalidCron {
        expression: String,
        timezone: String,
        reason: String,
    },

    /// The automation has no armed timer (it was never scheduled, or already unscheduled).
    #[error("automation {0} is not scheduled")]
    NotScheduled(String),

    /// No plugin registered a callback under this id.
    #[error("plugin {0} has no registered callback")]
    PluginNotRegistered(String),
}

impl Coded for SchedulerError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidCron { .. } => ErrorCode::CronInvalid,
            Self::NotScheduled(_) | Self::PluginNotRegistered(_) => ErrorCode::ValidationError,
        }
    }
}
