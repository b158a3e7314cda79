//! Shared error type for `nebula-core` itself.
//!
//! Downstream crates define their own error enums at their seams; this one
//! only covers failures intrinsic to core's own types (id/version parsing).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid version string: {0}")]
    InvalidVersion(String),

    #[error("invalid identifier: {0}")]
    InvalidId(#[from] domain_key::UuidParseError),

    #[error("invalid key: {0}")]
    InvalidKey(#[from] domain_key::KeyParseError),
}
