#![forbid(unsafe_code)]

//! # Nebula Reflection
//!
//! Static queries over the node registry and workflow definitions. Nothing
//! in this crate ever calls [`nebula_action::Action::execute`] — it reasons
//! about a workflow without running it.

pub mod catalog;
pub mod explain;
pub mod graph;
pub mod pattern;
pub mod validate;

pub use catalog::{NodeCatalog, NodeCatalogEntry};
pub use explain::{StepSummary, WorkflowExplanation};
pub use graph::CompositionGraph;
pub use pattern::{PatternLibrary, PatternMatch, PatternTemplate};
pub use validate::{deep_validate, ValidationIssue};
