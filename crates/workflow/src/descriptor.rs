//! Static, compile-time-ish node metadata consumed only by reflection —
//! distinct from [`nebula_action::ActionMetadata`], which the registry and
//! interpreter use to actually dispatch a node.

use serde_json::Value;

/// Catalog entry for one node type: everything `nebula-reflection` needs to
/// describe a node without constructing or running it.
#[derive(Debug, Clone)]
pub struct NodeDescriptor {
    pub key: String,
    pub category: String,
    pub description: String,
    pub input_schema: Option<Value>,
    pub declared_edges: Vec<String>,
    /// Node keys this node is typically preceded by, used to score
    /// composability suggestions. A hint, not an enforced constraint.
    pub typical_predecessors: Vec<String>,
    /// Node keys this node is typically followed by.
    pub typical_successors: Vec<String>,
    /// Free-form hints for AI-assisted workflow authoring (e.g. example
    /// configs, natural-language summaries). Opaque to the interpreter.
    pub ai_hints: Option<Value>,
}

impl NodeDescriptor {
    pub fn new(key: impl Into<String>, category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            category: category.into(),
            description: description.into(),
            input_schema: None,
            declared_edges: Vec::new(),
            typical_predecessors: Vec::new(),
            typical_successors: Vec::new(),
            ai_hints: None,
        }
    }

    #[must_use]
    pub fn with_edges(mut self, edges: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.declared_edges = edges.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_typical_predecessors(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.typical_predecessors = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_typical_successors(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.typical_successors = keys.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_hints() {
        let descriptor = NodeDescriptor::new("http.request", "network", "Make HTTP calls")
            .with_edges(["success", "error"])
            .with_typical_predecessors(["trigger.webhook"])
            .with_typical_successors(["log", "editFields"]);

        assert_eq!(descriptor.declared_edges, vec!["success", "error"]);
        assert_eq!(descriptor.typical_predecessors, vec!["trigger.webhook"]);
        assert_eq!(descriptor.typical_successors, vec!["log", "editFields"]);
    }
}
