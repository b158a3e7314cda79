//! Base traits implemented by entities shared across Nebula crates.

use crate::id::TenantId;
use crate::scope::ScopeLevel;

/// Entities that can report the scope they live within, letting callers
/// check visibility without threading the scope separately.
pub trait Scoped {
    fn scope(&self) -> ScopeLevel;
}

/// Entities carrying a tenant identity, used by every multi-tenant lookup
/// and audit trail to partition state.
pub trait HasContext {
    fn tenant_id(&self) -> TenantId;
}

/// Entities with a stable, typed identifier.
pub trait Identifiable {
    type Id: Copy + Eq + std::hash::Hash;

    fn id(&self) -> Self::Id;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ExecutionId, OrganizationId};

    struct Widget {
        id: ExecutionId,
        tenant: TenantId,
    }

    impl Identifiable for Widget {
        type Id = ExecutionId;

        fn id(&self) -> Self::Id {
            self.id
        }
    }

    impl HasContext for Widget {
        fn tenant_id(&self) -> TenantId {
            self.tenant
        }
    }

    impl Scoped for Widget {
        fn scope(&self) -> ScopeLevel {
            ScopeLevel::Organization(OrganizationId::v4())
        }
    }

    #[test]
    fn widget_exposes_identity_context_and_scope() {
        let widget = Widget {
            id: ExecutionId::v4(),
            tenant: TenantId::v4(),
        };
        assert_eq!(widget.id(), widget.id);
        assert_eq!(widget.tenant_id(), widget.tenant);
        assert!(!widget.scope().is_global());
    }
}
