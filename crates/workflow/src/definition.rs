//! The workflow definition: an immutable, versioned value object.

use nebula_core::{Version, WorkflowId};
use serde_json::{Map, Value};

use crate::error::WorkflowError;
use crate::invocation::NodeInvocation;

/// Guards against unbounded/cyclic recursion while parsing or walking a
/// definition.
pub const MAX_WORKFLOW_NODES: usize = nebula_core::MAX_WORKFLOW_NODES;

/// A workflow definition as stored by the repository: stable id, semantic
/// version, seed state, and the ordered top-level node sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDefinition {
    pub id: WorkflowId,
    pub name: String,
    pub version: Version,
    pub initial_state: Map<String, Value>,
    pub workflow: Vec<NodeInvocation>,
}

impl WorkflowDefinition {
    /// Parse a definition from its wire JSON form (§6: field names are
    /// stable and bit-exact — `id`, `name`, `version`, `initialState`, `workflow`).
    pub fn parse(value: &Value) -> Result<Self, WorkflowError> {
        let obj = value.as_object().ok_or(WorkflowError::MissingField("id"))?;

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| WorkflowId::parse(s).ok())
            .ok_or(WorkflowError::MissingField("id"))?;

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or(WorkflowError::MissingField("name"))?
            .to_owned();

        let version = obj
            .get("version")
            .and_then(Value::as_str)
            .ok_or(WorkflowError::MissingField("version"))?
            .parse::<Version>()
            .map_err(|_| WorkflowError::MissingField("version"))?;

        let initial_state = obj
            .get("initialState")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let workflow_value = obj
            .get("workflow")
            .ok_or(WorkflowError::MissingField("workflow"))?;
        let workflow = NodeInvocation::parse_sequence(workflow_value)?;

        let definition = Self {
            id,
            name,
            version,
            initial_state,
            workflow,
        };

        let count = definition.node_count();
        if count > MAX_WORKFLOW_NODES {
            return Err(WorkflowError::TooManyNodes(
                definition.name.clone(),
                MAX_WORKFLOW_NODES,
            ));
        }

        Ok(definition)
    }

    /// Total node count across the whole tree, including loop bodies and sub-flows.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.workflow.iter().map(count_subtree).sum()
    }
}

fn count_subtree(invocation: &NodeInvocation) -> usize {
    use crate::invocation::EdgeTarget;

    1 + invocation
        .edges
        .values()
        .map(|target| match target {
            EdgeTarget::Terminal => 0,
            EdgeTarget::Next(next) => count_subtree(next),
            EdgeTarget::SubFlow(steps) => steps.iter().map(count_subtree).sum(),
        })
        .sum::<usize>()
}
