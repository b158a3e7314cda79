//! Reference resolution and template rendering for workflow node config.
//!
//! Before a node executes, the interpreter passes its config object through
//! [`resolve_refs`], which replaces `$.path`-shaped strings with the value at
//! that path in the execution state (also evaluating the narrow `$.a + 1`
//! arithmetic shape `editFields` counters rely on), and through
//! [`render_template`] for any string containing `{{$.path}}` placeholders
//! mixed with literal text.

mod arithmetic;
mod path;
mod resolve;
mod template;

pub use path::{resolve, resolve_refs};
pub use resolve::resolve_config;
pub use template::render as render_template;
