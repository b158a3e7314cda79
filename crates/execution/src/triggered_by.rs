//! How an execution was started.

use serde::{Deserialize, Serialize};

/// The source that caused a workflow execution to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggeredBy {
    /// Started via the CLI or an explicit API call.
    Manual,
    /// Started by a cron-scheduled automation.
    Automation,
    /// Started by an inbound webhook call.
    Webhook,
    /// Started by a programmatic API client other than the manual trigger.
    Api,
}

impl std::fmt::Display for TriggeredBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Automation => write!(f, "automation"),
            Self::Webhook => write!(f, "webhook"),
            Self::Api => write!(f, "api"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_rename_snake_case() {
        assert_eq!(
            serde_json::to_string(&TriggeredBy::Automation).unwrap(),
            "\"automation\""
        );
    }

    #[test]
    fn display_formatting() {
        assert_eq!(TriggeredBy::Manual.to_string(), "manual");
        assert_eq!(TriggeredBy::Webhook.to_string(), "webhook");
    }
}
