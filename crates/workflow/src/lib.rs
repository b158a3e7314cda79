//! Workflow definitions and the node-invocation tree they're built from.
//!
//! This crate owns parsing only — static shape, not execution. The
//! interpreter (`nebula-engine`) walks the parsed tree; `nebula-reflection`
//! walks it without running anything.

mod definition;
mod descriptor;
mod error;
mod invocation;

pub use definition::{WorkflowDefinition, MAX_WORKFLOW_NODES};
pub use descriptor::NodeDescriptor;
pub use error::WorkflowError;
pub use invocation::{EdgeTarget, NodeInvocation};
