#![forbid(unsafe_code)]

//! # Nebula Engine
//!
//! The workflow interpreter: walks a [`nebula_workflow::WorkflowDefinition`],
//! resolves each node's config against the live execution state, dispatches
//! to the [`nebula_action::Action`] registered under its node type, follows
//! the taken edge, and implements loop and sub-flow semantics.
//!
//! This crate does not persist anything — see `nebula-repository` for the
//! execution record a caller builds from a [`RunOutcome`].

pub mod error;
mod interpreter;

pub use error::EngineError;
pub use interpreter::{Interpreter, RunOutcome, RunRequest};
