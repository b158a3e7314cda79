//! # Nebula Action System
//!
//! The node contract for the Nebula workflow engine: what a node is and how
//! it talks to the interpreter, independent of how the interpreter walks
//! the workflow tree.
//!
//! ## Core Types
//!
//! - [`Action`] — the trait every node type implements
//! - [`EdgeMap`] — the edges an action fired, first-fired-wins
//! - [`ActionError`] — uniform node failure, mapped to `NODE_FAILED`
//! - [`ActionContext`] — per-invocation runtime context (ids, scope, cancellation)
//! - [`ActionMetadata`] — static descriptor (key, category, version, declared edges)
//! - [`ActionRegistry`] — node-key → implementation lookup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nebula_action::*;
//! use async_trait::async_trait;
//! use serde_json::Value;
//!
//! struct Log { meta: ActionMetadata }
//!
//! #[async_trait]
//! impl Action for Log {
//!     fn metadata(&self) -> &ActionMetadata { &self.meta }
//!
//!     async fn execute(&self, ctx: &ActionContext, config: &Value) -> Result<EdgeMap, ActionError> {
//!         ctx.check_cancelled().map_err(|_| ActionError::Cancelled)?;
//!         Ok(EdgeMap::single("success", config.clone()))
//!     }
//! }
//! ```

#![forbid(unsafe_code)]

/// Base action trait defining identity and execution.
pub mod action;
/// The bundled "universal" node set (`math`, `log`, `logic`, `editFields`).
pub mod builtin;
/// Runtime context provided to actions during execution.
pub mod context;
/// Error type for node execution failures.
pub mod error;
/// Static metadata describing a node type.
pub mod metadata;
/// The edge-map execution result.
pub mod result;
/// Node-key registry used by the interpreter.
pub mod registry;

/// Convenience re-exports for action authors.
pub mod prelude;

pub use action::Action;
pub use context::ActionContext;
pub use error::ActionError;
pub use metadata::ActionMetadata;
pub use registry::{ActionRegistry, RegistryError};
pub use result::EdgeMap;
