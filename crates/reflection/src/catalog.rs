//! Node catalog: everything the registry knows, filterable by category and
//! free-text search over name/description.

use nebula_action::{ActionRegistry, InterfaceVersion};
use serde::Serialize;

/// One catalog row, cloned out of an [`nebula_action::ActionMetadata`] so it
/// can outlive the registry borrow in an HTTP response.
#[derive(Debug, Clone, Serialize)]
pub struct NodeCatalogEntry {
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub version: InterfaceVersion,
    pub edges: Vec<String>,
}

/// A snapshot of the registry's metadata, queryable without holding a
/// reference back into it.
#[derive(Debug, Clone, Default)]
pub struct NodeCatalog {
    entries: Vec<NodeCatalogEntry>,
}

impl NodeCatalog {
    /// Snapshot every registered action's metadata.
    #[must_use]
    pub fn from_registry(registry: &ActionRegistry) -> Self {
        let entries = registry
            .list()
            .into_iter()
            .map(|meta| NodeCatalogEntry {
                key: meta.key.clone(),
                name: meta.name.clone(),
                description: meta.description.clone(),
                category: meta.category.clone(),
                version: meta.version,
                edges: meta.edges.clone(),
            })
            .collect();
        Self { entries }
    }

    /// All entries, unfiltered.
    #[must_use]
    pub fn entries(&self) -> &[NodeCatalogEntry] {
        &self.entries
    }

    /// Filter by category (exact match, case-sensitive) and/or a
    /// case-insensitive substring over name + description.
    #[must_use]
    pub fn filter(&self, category: Option<&str>, query: Option<&str>) -> Vec<&NodeCatalogEntry> {
        let query = query.map(str::to_lowercase);
        self.entries
            .iter()
            .filter(|entry| category.is_none_or(|c| entry.category == c))
            .filter(|entry| {
                query.as_deref().is_none_or(|q| {
                    entry.name.to_lowercase().contains(q) || entry.description.to_lowercase().contains(q)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use nebula_action::{Action, ActionContext, ActionError, ActionMetadata, EdgeMap};
    use serde_json::Value;
    use std::sync::Arc;

    use super::*;

    struct Stub(ActionMetadata);

    #[async_trait]
    impl Action for Stub {
        fn metadata(&self) -> &ActionMetadata {
            &self.0
        }
        async fn execute(&self, _ctx: &ActionContext, _config: &Value) -> Result<EdgeMap, ActionError> {
            Ok(EdgeMap::empty())
        }
    }

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        registry.register(Arc::new(Stub(
            ActionMetadata::new("http.request", "HTTP Request", "Make an HTTP call").with_category("network"),
        )));
        registry.register(Arc::new(Stub(
            ActionMetadata::new("math.add", "Add", "Sum two numbers").with_category("transform"),
        )));
        registry
    }

    #[test]
    fn catalog_snapshots_every_registered_entry() {
        let catalog = NodeCatalog::from_registry(&registry());
        assert_eq!(catalog.entries().len(), 2);
    }

    #[test]
    fn filter_by_category() {
        let catalog = NodeCatalog::from_registry(&registry());
        let network = catalog.filter(Some("network"), None);
        assert_eq!(network.len(), 1);
        assert_eq!(network[0].key, "http.request");
    }

    #[test]
    fn filter_by_text_search_is_case_insensitive() {
        let catalog = NodeCatalog::from_registry(&registry());
        let matches = catalog.filter(None, Some("HTTP"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].key, "http.request");
    }

    #[test]
    fn no_filters_returns_everything() {
        let catalog = NodeCatalog::from_registry(&registry());
        assert_eq!(catalog.filter(None, None).len(), 2);
    }
}
