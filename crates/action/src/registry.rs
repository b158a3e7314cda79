use std::collections::HashMap;
use std::sync::Arc;

use nebula_error::{Coded, ErrorCode};

use crate::action::Action;
use crate::metadata::ActionMetadata;

/// Type-erased registry mapping node keys to their implementations.
///
/// The interpreter populates this at startup and consults it once per node
/// invocation, via [`ActionRegistry::get`], to resolve a workflow's
/// `nodeType` string to something it can call. A miss here is the
/// `UNKNOWN_NODE` error the interpreter reports back to the caller.
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
}

/// Registry-level failure distinct from a single node's own `ActionError`.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// No action is registered under this key.
    #[error("unknown node type: {0}")]
    UnknownNode(String),

    /// Registration was attempted twice for the same key.
    #[error("node type already registered: {0}")]
    DuplicateRegistration(String),
}

impl Coded for RegistryError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownNode(_) => ErrorCode::UnknownNode,
            Self::DuplicateRegistration(_) => ErrorCode::ValidationError,
        }
    }
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. Duplicate keys are a programming error, not a
    /// runtime condition — panics, mirroring how the interpreter is wired up
    /// once at startup, not per-execution.
    pub fn register(&mut self, action: Arc<dyn Action>) {
        let key = action.metadata().key.clone();
        if self.actions.insert(key.clone(), action).is_some() {
            panic!("node type already registered: {key}");
        }
    }

    /// Register an action, returning an error instead of panicking on a
    /// duplicate key. Useful for dynamic/plugin-driven registration.
    pub fn try_register(&mut self, action: Arc<dyn Action>) -> Result<(), RegistryError> {
        let key = action.metadata().key.clone();
        if self.actions.contains_key(&key) {
            return Err(RegistryError::DuplicateRegistration(key));
        }
        self.actions.insert(key, action);
        Ok(())
    }

    /// Look up an action by its node key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Action>> {
        self.actions.get(key)
    }

    /// Look up an action, surfacing `UNKNOWN_NODE` on a miss.
    pub fn resolve(&self, key: &str) -> Result<&Arc<dyn Action>, RegistryError> {
        self.get(key)
            .ok_or_else(|| RegistryError::UnknownNode(key.to_owned()))
    }

    /// Check whether an action with the given key is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.actions.contains_key(key)
    }

    /// Return metadata for all registered actions, for catalog/reflection use.
    pub fn list(&self) -> Vec<&ActionMetadata> {
        self.actions.values().map(|a| a.metadata()).collect()
    }

    /// Number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over all registered `(key, action)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Action>)> {
        self.actions.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("count", &self.actions.len())
            .field("keys", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ActionContext;
    use crate::error::ActionError;
    use crate::result::EdgeMap;
    use async_trait::async_trait;
    use serde_json::Value;

    struct DummyAction(ActionMetadata);

    #[async_trait]
    impl Action for DummyAction {
        fn metadata(&self) -> &ActionMetadata {
            &self.0
        }
        async fn execute(&self, _ctx: &ActionContext, _config: &Value) -> Result<EdgeMap, ActionError> {
            Ok(EdgeMap::empty())
        }
    }

    fn make_action(key: &str, name: &str) -> Arc<dyn Action> {
        Arc::new(DummyAction(ActionMetadata::new(key, name, "test")))
    }

    #[test]
    fn empty_registry() {
        let reg = ActionRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
        assert!(reg.get("anything").is_none());
    }

    #[test]
    fn register_and_get() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("http.request", "HTTP Request"));

        assert_eq!(reg.len(), 1);
        assert!(!reg.is_empty());

        let action = reg.get("http.request").unwrap();
        assert_eq!(action.metadata().key, "http.request");
        assert_eq!(action.metadata().name, "HTTP Request");
    }

    #[test]
    fn resolve_missing_key_is_unknown_node() {
        let reg = ActionRegistry::new();
        let err = reg.resolve("ghost").unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownNode);
    }

    #[test]
    fn try_register_duplicate_errors() {
        let mut reg = ActionRegistry::new();
        reg.try_register(make_action("x", "X")).unwrap();
        let err = reg.try_register(make_action("x", "X2")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRegistration(_)));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn register_duplicate_panics() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("x", "X"));
        reg.register(make_action("x", "X2"));
    }

    #[test]
    fn contains() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("a", "A"));
        assert!(reg.contains("a"));
        assert!(!reg.contains("b"));
    }

    #[test]
    fn list_metadata() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("a", "Action A"));
        reg.register(make_action("b", "Action B"));

        let mut names: Vec<&str> = reg.list().iter().map(|m| m.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Action A", "Action B"]);
    }

    #[test]
    fn iter_actions() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("a", "A"));
        reg.register(make_action("b", "B"));

        let mut keys: Vec<&str> = reg.iter().map(|(k, _)| k).collect();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn debug_format() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("test", "Test"));
        let debug = format!("{reg:?}");
        assert!(debug.contains("ActionRegistry"));
        assert!(debug.contains("count: 1"));
    }
}
