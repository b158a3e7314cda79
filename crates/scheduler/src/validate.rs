//! Cron validation as a pure function — no timer, no job-table lookup.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use serde::{Deserialize, Serialize};

/// Result of checking a cron expression against a timezone.
///
/// `rename_all = "camelCase"` so this serializes directly as the API's
/// `{ valid, nextRun?, error? }` response body (spec §6) without a
/// handler-side adapter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronValidation {
    pub valid: bool,
    /// The next instant the expression would fire, in UTC.
    pub next_run: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// The `cron` crate requires an explicit seconds field; a bare five-field
/// unix-style expression gets `0 ` prefixed so both grammars accepted by the
/// spec parse the same way.
fn with_seconds_field(cron_expression: &str) -> String {
    if cron_expression.split_whitespace().count() == 5 {
        format!("0 {cron_expression}")
    } else {
        cron_expression.to_owned()
    }
}

/// Check `cron_expression` (five- or six-field, seconds optional) in
/// `timezone` (an IANA name; pass `"UTC"` for none). Reads the wall clock to
/// compute `next_run` but never arms a timer or mutates scheduler state.
#[must_use]
pub fn validate(cron_expression: &str, timezone: &str) -> CronValidation {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => {
            return CronValidation {
                valid: false,
                next_run: None,
                error: Some(format!("unknown timezone: {timezone}")),
            };
        }
    };

    match Schedule::from_str(&with_seconds_field(cron_expression)) {
        Ok(schedule) => {
            let now = Utc::now().with_timezone(&tz);
            let next_run = schedule.after(&now).next().map(|dt| dt.with_timezone(&Utc));
            CronValidation {
                valid: true,
                next_run,
                error: None,
            }
        }
        Err(err) => CronValidation {
            valid: false,
            next_run: None,
            error: Some(err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hourly_expression_is_valid_with_a_next_run() {
        let result = validate("0 0 * * * *", "UTC");
        assert!(result.valid);
        assert!(result.next_run.is_some());
        assert!(result.error.is_none());
    }

    #[test]
    fn five_field_unix_style_expression_is_normalized_and_accepted() {
        let result = validate("0 0 * * *", "UTC");
        assert!(result.valid);
        assert!(result.next_run.is_some());
    }

    #[test]
    fn garbage_expression_is_rejected_with_a_reason() {
        let result = validate("not a cron expression", "UTC");
        assert!(!result.valid);
        assert!(result.next_run.is_none());
        assert!(result.error.is_some());
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let result = validate("0 0 * * * *", "Mars/Olympus_Mons");
        assert!(!result.valid);
        assert_eq!(result.error.as_deref(), Some("unknown timezone: Mars/Olympus_Mons"));
    }

    #[test]
    fn named_timezone_is_accepted() {
        let result = validate("0 30 9 * * *", "Europe/Berlin");
        assert!(result.valid);
    }
}
