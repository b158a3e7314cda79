//! The stable error-code taxonomy shared by every Nebula crate.
//!
//! Crate-local error enums (`ExecutionError`, `ActionError`, `EngineError`, …)
//! stay specific to their own seam — they carry whatever context makes sense
//! locally. What they all agree on is [`ErrorCode`]: a small, serializable
//! set of stable identifiers that survive into an [`crate::ExecutionRecord`]-shaped
//! persisted record, an HTTP response body, and a log line equally well.
//! Adding a variant is a source-compatible change; renaming one is not.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, serializable error identifiers.
///
/// These codes are part of the engine's external contract: they appear in
/// persisted execution records and in HTTP error bodies, so once shipped a
/// variant's `as_str()` value must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A workflow referenced a node type the registry doesn't know about.
    UnknownNode,
    /// A node's execute returned no edge, or one the engine could not follow.
    NodeNoEdge,
    /// A workflow id did not resolve to a stored definition.
    WorkflowNotFound,
    /// A cron expression failed to parse or falls outside the accepted grammar.
    CronInvalid,
    /// An in-flight execution was cancelled cooperatively.
    Cancelled,
    /// A node's `execute` returned an error or panicked.
    NodeFailed,
    /// An optimistic write lost a concurrent race (e.g. execution already completed).
    VersionConflict,
    /// A workflow definition or automation config failed structural validation.
    ValidationError,
    /// A `$.path` expression did not resolve against the execution state.
    ReferenceError,
    /// A loop node re-entered itself past the safety cap without its loop
    /// edge ever resolving to `null`.
    LoopLimitExceeded,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownNode => "UNKNOWN_NODE",
            Self::NodeNoEdge => "NODE_NO_EDGE",
            Self::WorkflowNotFound => "WORKFLOW_NOT_FOUND",
            Self::CronInvalid => "CRON_INVALID",
            Self::Cancelled => "CANCELLED",
            Self::NodeFailed => "NODE_FAILED",
            Self::VersionConflict => "VERSION_CONFLICT",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ReferenceError => "REFERENCE_ERROR",
            Self::LoopLimitExceeded => "LOOP_LIMIT_EXCEEDED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every crate-local error enum so callers at a service
/// boundary (HTTP handler, execution record writer) can get a stable code
/// without matching on crate-specific variants.
pub trait Coded {
    fn code(&self) -> ErrorCode;
}

/// A type-erased error carrying a stable [`ErrorCode`], for boundaries that
/// need to report failures without depending on every crate's own error type.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct NebulaError {
    pub code: ErrorCode,
    pub message: String,
}

impl NebulaError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
