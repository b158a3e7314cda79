//! Workflow explanation: walk a definition's node tree without running it
//! and emit a structured summary of its steps.

use nebula_workflow::{EdgeTarget, NodeInvocation, WorkflowDefinition};
use serde::Serialize;

/// One node in the walk, in the same `path` numbering the interpreter uses
/// for its own step/state-change events (`"0"`, `"0.1"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    pub path: String,
    pub node_key: String,
    pub alias: Option<String>,
    pub is_loop: bool,
    pub edges: Vec<String>,
    pub depth: usize,
}

/// A flattened, read-only account of a definition: every step it would
/// visit, in the order the interpreter would visit them, plus a couple of
/// coarse signals (loop count, max depth) a caller can use without
/// re-walking the tree themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExplanation {
    pub workflow_name: String,
    pub steps: Vec<StepSummary>,
    pub loop_count: usize,
    pub max_depth: usize,
}

impl WorkflowExplanation {
    /// Walk `definition.workflow` top to bottom, depth first — the same
    /// order the interpreter executes in, minus any actual dispatch.
    #[must_use]
    pub fn explain(definition: &WorkflowDefinition) -> Self {
        let mut steps = Vec::new();
        walk_sequence(&definition.workflow, String::new(), 0, &mut steps);

        let loop_count = steps.iter().filter(|s| s.is_loop).count();
        let max_depth = steps.iter().map(|s| s.depth).max().unwrap_or(0);

        Self {
            workflow_name: definition.name.clone(),
            steps,
            loop_count,
            max_depth,
        }
    }
}

fn path_for(prefix: &str, index: usize) -> String {
    if prefix.is_empty() {
        index.to_string()
    } else {
        format!("{prefix}.{index}")
    }
}

fn walk_sequence(nodes: &[NodeInvocation], prefix: String, depth: usize, steps: &mut Vec<StepSummary>) {
    for (index, invocation) in nodes.iter().enumerate() {
        let path = path_for(&prefix, index);
        walk_node(invocation, path, depth, steps);
    }
}

fn walk_node(invocation: &NodeInvocation, path: String, depth: usize, steps: &mut Vec<StepSummary>) {
    steps.push(StepSummary {
        path: path.clone(),
        node_key: invocation.node_key.clone(),
        alias: invocation.alias.clone(),
        is_loop: invocation.is_loop,
        edges: invocation.edges.keys().cloned().collect(),
        depth,
    });

    for target in invocation.edges.values() {
        match target {
            EdgeTarget::Terminal => {}
            EdgeTarget::Next(next) => walk_node(next, path.clone(), depth, steps),
            EdgeTarget::SubFlow(body) => walk_sequence(body, path.clone(), depth + 1, steps),
        }
    }
}
