//! Resource scoping: the hierarchy every tenant-owned resource is looked up
//! and authorized through.

use serde::{Deserialize, Serialize};

use crate::id::{ExecutionId, NodeId, OrganizationId, ProjectId, WorkflowId};

/// The level at which a resource lives, from broadest to narrowest.
///
/// Lookups walk from the most specific level down to [`ScopeLevel::Global`],
/// so a `Project`-scoped credential shadows an `Organization`-scoped one of
/// the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum ScopeLevel {
    /// Visible to every tenant. There is at most one global scope.
    Global,
    Organization(OrganizationId),
    Project(ProjectId),
    Workflow(WorkflowId),
    Execution(ExecutionId),
    Action(NodeId),
}

impl ScopeLevel {
    /// The scopes to check, in priority order (most specific first), when
    /// resolving a resource visible at `self` or any broader level.
    #[must_use]
    pub fn ancestors(&self) -> Vec<ScopeLevel> {
        match *self {
            ScopeLevel::Action(_) | ScopeLevel::Execution(_) => {
                vec![*self, ScopeLevel::Global]
            }
            ScopeLevel::Workflow(_) | ScopeLevel::Project(_) | ScopeLevel::Organization(_) => {
                vec![*self, ScopeLevel::Global]
            }
            ScopeLevel::Global => vec![ScopeLevel::Global],
        }
    }

    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(self, ScopeLevel::Global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_scope_ancestors_is_itself() {
        assert_eq!(ScopeLevel::Global.ancestors(), vec![ScopeLevel::Global]);
    }

    #[test]
    fn execution_scope_ancestors_include_global() {
        let exec = ScopeLevel::Execution(ExecutionId::v4());
        let ancestors = exec.ancestors();
        assert_eq!(ancestors.len(), 2);
        assert_eq!(ancestors[0], exec);
        assert_eq!(ancestors[1], ScopeLevel::Global);
    }

    #[test]
    fn is_global_detects_global_variant() {
        assert!(ScopeLevel::Global.is_global());
        assert!(!ScopeLevel::Project(ProjectId::v4()).is_global());
    }
}
