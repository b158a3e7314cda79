#![forbid(unsafe_code)]

//! # Nebula Execution
//!
//! Execution-record and runtime-state types for the Nebula workflow engine.
//!
//! This crate models execution-time concepts; it does NOT contain the
//! interpreter itself (see `nebula-engine`). It defines:
//!
//! - [`ExecutionStatus`] — the 4-state execution status machine
//! - [`ExecutionRecord`] — the persisted row for one workflow run
//! - [`NodeLogEntry`] / [`NodeLogStatus`] — the per-node audit trail
//! - [`TriggeredBy`] — what started an execution
//! - [`ExecutionContext`] — the live, mutable state the interpreter walks with
//! - [`transition`] — status-transition validation

pub mod context;
pub mod error;
pub mod node_log;
pub mod record;
pub mod status;
pub mod transition;
pub mod triggered_by;

pub use context::ExecutionContext;
pub use error::ExecutionError;
pub use node_log::{NodeLogEntry, NodeLogStatus};
pub use record::ExecutionRecord;
pub use status::ExecutionStatus;
pub use triggered_by::TriggeredBy;
