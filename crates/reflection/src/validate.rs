//! Deep validation: semantic checks beyond JSON shape (spec §4.H).
//!
//! Unlike [`crate::explain`], this walk accumulates problems instead of a
//! narrative — unresolved `$.path` references, edges the registry doesn't
//! know the node declares, and sub-flows that never reach a terminal.
//! `VALIDATION_ERROR` here is non-fatal (spec §7): callers get the full
//! list back, nothing throws.

use nebula_action::ActionRegistry;
use nebula_workflow::{EdgeTarget, NodeInvocation, WorkflowDefinition};
use serde::Serialize;
use serde_json::Value;

/// One validation finding, anchored to the invocation-tree path the
/// interpreter would use for the same node (spec §4.D).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub code: &'static str,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
        }
    }
}

/// Walk `definition` against `registry` and collect every issue found.
/// Returns an empty vec when the definition is clean.
#[must_use]
pub fn deep_validate(definition: &WorkflowDefinition, registry: &ActionRegistry) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let known_keys = initial_state_keys(definition);
    walk_sequence(&definition.workflow, String::new(), registry, &known_keys, &mut issues);
    issues
}

fn initial_state_keys(definition: &WorkflowDefinition) -> Vec<String> {
    definition.initial_state.keys().cloned().collect()
}

fn path_for(prefix: &str, index: usize) -> String {
    if prefix.is_empty() {
        index.to_string()
    } else {
        format!("{prefix}.{index}")
    }
}

fn walk_sequence(
    nodes: &[NodeInvocation],
    prefix: String,
    registry: &ActionRegistry,
    known_keys: &[String],
    issues: &mut Vec<ValidationIssue>,
) {
    if nodes.is_empty() && !prefix.is_empty() {
        issues.push(ValidationIssue::new(
            prefix,
            "EMPTY_SUBFLOW",
            "sub-flow has no node invocations",
        ));
        return;
    }

    for (index, invocation) in nodes.iter().enumerate() {
        let path = path_for(&prefix, index);
        walk_node(invocation, path, registry, known_keys, issues);
    }
}

fn walk_node(
    invocation: &NodeInvocation,
    path: String,
    registry: &ActionRegistry,
    known_keys: &[String],
    issues: &mut Vec<ValidationIssue>,
) {
    if !registry.contains(&invocation.node_key) {
        issues.push(ValidationIssue::new(
            path.clone(),
            "UNKNOWN_NODE",
            format!("node type {:?} is not registered", invocation.node_key),
        ));
    } else if let Some(meta) = registry.get(&invocation.node_key).map(|a| a.metadata()) {
        for edge_name in invocation.edges.keys() {
            if !meta.edges.is_empty() && !meta.edges.iter().any(|e| e == edge_name) {
                issues.push(ValidationIssue::new(
                    path.clone(),
                    "UNREACHABLE_EDGE",
                    format!(
                        "node type {:?} never declares an edge named {edge_name:?}",
                        invocation.node_key
                    ),
                ));
            }
        }
    }

    for value in invocation.config.values() {
        check_references(value, &path, known_keys, issues);
    }

    if invocation.is_loop {
        let has_subflow_edge = invocation
            .edges
            .values()
            .any(|target| matches!(target, EdgeTarget::SubFlow(_)));
        let has_terminal_edge = invocation
            .edges
            .values()
            .any(|target| matches!(target, EdgeTarget::Terminal));
        if !invocation.edges.is_empty() && has_subflow_edge && !has_terminal_edge {
            issues.push(ValidationIssue::new(
                path.clone(),
                "LOOP_WITHOUT_EXIT",
                "loop node declares a sub-flow continuation but no terminal edge to exit on",
            ));
        }
    }

    for (edge_name, target) in &invocation.edges {
        let edge_path = format!("{path}.{edge_name}?");
        match target {
            EdgeTarget::Terminal => {}
            EdgeTarget::Next(next) => walk_node(next, edge_path, registry, known_keys, issues),
            EdgeTarget::SubFlow(steps) => walk_sequence(steps, edge_path, registry, known_keys, issues),
        }
    }
}

/// Recursively scan a config value for `$.path` references (bare or inside
/// `{{...}}` templates) whose root segment isn't a key the definition's
/// `initialState` seeds. This is a conservative signal, not a hard proof —
/// any prior node in the run may still populate the key; it exists to catch
/// the common authoring mistake of referencing a field that's misspelled or
/// was never produced anywhere upstream at all.
fn check_references(value: &Value, path: &str, known_keys: &[String], issues: &mut Vec<ValidationIssue>) {
    match value {
        Value::String(s) => {
            for reference in extract_references(s) {
                if let Some(root) = root_segment(&reference) {
                    if !known_keys.is_empty() && !known_keys.iter().any(|k| k == root) {
                        issues.push(ValidationIssue::new(
                            path.to_owned(),
                            "REFERENCE_ERROR",
                            format!("{reference:?} references {root:?}, which initialState never seeds"),
                        ));
                    }
                }
            }
        }
        Value::Object(map) => {
            for v in map.values() {
                check_references(v, path, known_keys, issues);
            }
        }
        Value::Array(arr) => {
            for v in arr {
                check_references(v, path, known_keys, issues);
            }
        }
        _ => {}
    }
}

/// Pull every `$.path` reference out of `s` — either the whole string (a
/// bare reference) or each `{{$.path}}` template placeholder inside it.
fn extract_references(s: &str) -> Vec<String> {
    if s.starts_with("$.") && !s.contains("{{") {
        return vec![s.to_owned()];
    }

    let mut found = Vec::new();
    let mut rest = s;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else { break };
        let inner = after[..end].trim();
        if inner.starts_with("$.") {
            found.push(inner.to_owned());
        }
        rest = &after[end + 2..];
    }
    found
}

fn root_segment(reference: &str) -> Option<&str> {
    reference.strip_prefix("$.")?.split('.').next().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use nebula_action::{Action, ActionContext, ActionError, ActionMetadata, EdgeMap};
    use serde_json::json;

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
            ActionMetadata::new("http", "HTTP", "call").with_edge("success").with_edge("error"),
        )));
        registry.register(Arc::new(Stub(ActionMetadata::new("log", "Log", "logs").with_edge("success"))));
        registry.register(Arc::new(Stub(
            ActionMetadata::new("logic", "Logic", "branch").with_edge("true").with_edge("false"),
        )));
        registry
    }

    fn definition(workflow_json: Value) -> WorkflowDefinition {
        definition_with_state(json!({}), workflow_json)
    }

    fn definition_with_state(state: Value, workflow_json: Value) -> WorkflowDefinition {
        WorkflowDefinition::parse(&json!({
            "id": nebula_core::WorkflowId::v4().to_string(),
            "name": "t",
            "version": "1.0.0",
            "initialState": state,
            "workflow": workflow_json,
        }))
        .unwrap()
    }

    #[test]
    fn clean_definition_has_no_issues() {
        let def = definition_with_state(json!({"a": 1}), json!([{"log": {"message": "{{$.a}}"}}]));
        assert!(deep_validate(&def, &registry()).is_empty());
    }

    #[test]
    fn unknown_node_is_flagged() {
        let def = definition(json!([{"ghost": {}}]));
        let issues = deep_validate(&def, &registry());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "UNKNOWN_NODE");
        assert_eq!(issues[0].path, "0");
    }

    #[test]
    fn undeclared_edge_is_unreachable() {
        let def = definition(json!([{"log": {"retry?": null}}]));
        let issues = deep_validate(&def, &registry());
        assert!(issues.iter().any(|i| i.code == "UNREACHABLE_EDGE"));
    }

    #[test]
    fn reference_to_a_key_initial_state_never_seeds_is_flagged() {
        let def = definition_with_state(json!({"a": 1}), json!([{"log": {"message": "$.b"}}]));
        let issues = deep_validate(&def, &registry());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "REFERENCE_ERROR");
    }

    #[test]
    fn template_reference_is_also_checked() {
        let def = definition_with_state(json!({"a": 1}), json!([{"log": {"message": "value: {{$.missing}}"}}]));
        let issues = deep_validate(&def, &registry());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "REFERENCE_ERROR");
    }

    #[test]
    fn empty_subflow_is_flagged() {
        let def = definition(json!([{"logic...": {"true?": [], "false?": null}}]));
        let issues = deep_validate(&def, &registry());
        assert!(issues.iter().any(|i| i.code == "EMPTY_SUBFLOW"));
    }

    #[test]
    fn loop_with_subflow_and_no_terminal_has_no_exit() {
        let def = definition(json!([
            {"logic...": {"true?": [{"log": {"message": "x"}}]}}
        ]));
        let issues = deep_validate(&def, &registry());
        assert!(issues.iter().any(|i| i.code == "LOOP_WITHOUT_EXIT"));
    }

    #[test]
    fn loop_with_terminal_exit_is_fine() {
        let def = definition(json!([
            {"logic...": {"true?": [{"log": {"message": "x"}}], "false?": null}}
        ]));
        let issues = deep_validate(&def, &registry());
        assert!(!issues.iter().any(|i| i.code == "LOOP_WITHOUT_EXIT"));
    }

    #[test]
    fn no_initial_state_keys_disables_reference_checking() {
        let def = definition(json!([{"log": {"message": "$.anything"}}]));
        assert!(deep_validate(&def, &registry()).is_empty());
    }
}
