//! Common value types shared across Nebula crates.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A semantic version triple attached to workflow definitions and plugin
/// manifests.
///
/// Distinct from [`InterfaceVersion`]: `Version` identifies *content*
/// (a particular workflow definition, a particular plugin build);
/// `InterfaceVersion` identifies the *contract* an action implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new(0, 1, 0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl std::str::FromStr for Version {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '.');
        let mut next = || {
            parts
                .next()
                .and_then(|p| p.parse::<u32>().ok())
                .ok_or_else(|| crate::error::CoreError::InvalidVersion(s.to_string()))
        };
        let major = next()?;
        let minor = next()?;
        let patch = next()?;
        Ok(Self::new(major, minor, patch))
    }
}

/// The version of an action's *interface* (input/output contract), distinct
/// from the version of any particular workflow that calls it.
///
/// Two actions with the same `key` but different major `InterfaceVersion`
/// are considered incompatible by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InterfaceVersion {
    pub major: u16,
    pub minor: u16,
}

impl InterfaceVersion {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Whether a consumer built against `self` can call a provider built
    /// against `other` (same major, provider minor >= consumer minor).
    #[must_use]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.major == other.major && other.minor >= self.minor
    }
}

impl Default for InterfaceVersion {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl fmt::Display for InterfaceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Identity and access management role scope — the breadth a `RoleId`
/// grants over, independent of the scope-level hierarchy used for resource
/// lookups ([`crate::scope::ScopeLevel`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleScope {
    /// Grants across every tenant (platform operators).
    Global,
    /// Grants within a single organization.
    Organization,
    /// Grants within a single project.
    Project,
}

/// The kind of project a `ProjectId` identifies, used to select applicable
/// quotas and feature gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Personal,
    Team,
    Enterprise,
}
