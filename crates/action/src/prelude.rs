//! Convenience re-exports for action authors.
//!
//! ```rust,ignore
//! use nebula_action::prelude::*;
//! ```

pub use crate::action::Action;
pub use crate::context::{ActionContext, ActionLogger, ActionMetrics, CredentialProvider, SecureString};
pub use crate::error::ActionError;
pub use crate::metadata::ActionMetadata;
pub use crate::registry::{ActionRegistry, RegistryError};
pub use crate::result::EdgeMap;
