use serde::{Deserialize, Serialize};

// Re-export from core so downstream code can continue using `nebula_action::InterfaceVersion`.
pub use nebula_core::InterfaceVersion;

/// Static metadata describing an action type.
///
/// Used by the node registry for discovery, by `nebula-reflection` for the
/// node catalog, and by the interpreter for interface-version checks.
#[derive(Debug, Clone)]
pub struct ActionMetadata {
    /// Unique key identifying this action type (e.g. `"http.request"`).
    pub key: String,
    /// Human-readable display name (e.g. `"HTTP Request"`).
    pub name: String,
    /// Short description of what this action does.
    pub description: String,
    /// Category for catalog grouping (e.g. `"network"`, `"transform"`, `"database"`).
    pub category: String,
    /// Interface version — changes only when input/output contract changes.
    pub version: InterfaceVersion,
    /// Names of the edges this action may take, in declaration order.
    /// A node instance's `edges` map in its workflow definition must be a
    /// subset of this list; the interpreter never invents an edge name the
    /// registry doesn't know about.
    pub edges: Vec<String>,
    /// JSON Schema for config validation (optional).
    pub config_schema: Option<serde_json::Value>,
}

impl ActionMetadata {
    /// Create metadata with the minimum required fields.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            category: String::new(),
            version: InterfaceVersion::new(1, 0),
            edges: Vec::new(),
            config_schema: None,
        }
    }

    /// Set the catalog category for this action.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the interface version (major, minor).
    #[must_use]
    pub fn with_version(mut self, major: u16, minor: u16) -> Self {
        self.version = InterfaceVersion::new(major, minor);
        self
    }

    /// Declare an edge this action may produce.
    #[must_use]
    pub fn with_edge(mut self, edge: impl Into<String>) -> Self {
        self.edges.push(edge.into());
        self
    }

    /// Set the JSON Schema used to validate a node's `config` before execution.
    #[must_use]
    pub fn with_config_schema(mut self, schema: serde_json::Value) -> Self {
        self.config_schema = Some(schema);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_builder() {
        let meta = ActionMetadata::new("http.request", "HTTP Request", "Make HTTP calls")
            .with_category("network")
            .with_version(2, 1)
            .with_edge("success")
            .with_edge("error");

        assert_eq!(meta.key, "http.request");
        assert_eq!(meta.name, "HTTP Request");
        assert_eq!(meta.category, "network");
        assert_eq!(meta.version, InterfaceVersion::new(2, 1));
        assert_eq!(meta.edges, vec!["success", "error"]);
    }

    #[test]
    fn default_metadata_values() {
        let meta = ActionMetadata::new("test", "Test", "A test action");
        assert_eq!(meta.version, InterfaceVersion::new(1, 0));
        assert!(meta.edges.is_empty());
        assert!(meta.config_schema.is_none());
    }

    #[test]
    fn config_schema_builder() {
        let meta = ActionMetadata::new("noop", "No-Op", "Does nothing")
            .with_config_schema(serde_json::json!({"type": "object"}));
        assert!(meta.config_schema.is_some());
    }
}
