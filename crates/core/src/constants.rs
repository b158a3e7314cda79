//! Cross-crate limits and default values.

/// Maximum nodes a single [`crate::WorkflowId`] definition may contain before
/// the interpreter refuses to load it (unbounded recursion guard).
pub const MAX_WORKFLOW_NODES: usize = 10_000;

/// Maximum `list` page size accepted by the execution repository and the
/// HTTP API, regardless of the `limit` a caller requests.
pub const MAX_PAGE_SIZE: usize = 100;

/// Default `list` page size when a caller omits `limit`.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Minimum interval, in seconds, between two cron firings of the same
/// automation — guards against misconfigured sub-minute expressions
/// overwhelming the single-flight guard.
pub const MIN_CRON_INTERVAL_SECS: i64 = 60;
