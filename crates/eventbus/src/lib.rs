#![forbid(unsafe_code)]

//! Generic event distribution for the Nebula workflow engine: the
//! interpreter's live events fan out to any number of subscribers
//! (websocket bridges, timeline writers, schedulers) with a configurable
//! backpressure policy.

mod bus;
mod event;

pub use bus::{BackpressurePolicy, EventBus};
pub use event::WorkflowEvent;
