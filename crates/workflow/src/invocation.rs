//! The node-invocation tree: the single-entry object form
//! `{ "<nodeType>[...]": { …config…, "<edge>?": <target> } }`.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::WorkflowError;

/// One node invocation: the registry key to dispatch, its resolved config,
/// and its declared edges in the order the source JSON listed them —
/// ordering matters, since the interpreter takes the first edge whose
/// thunk yields a value.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInvocation {
    /// The node type key, with any trailing `...` loop marker and
    /// disambiguating alias suffix stripped (e.g. `"math"` from `"math2"`).
    pub node_key: String,
    /// The alias suffix, if the key carried one (e.g. `"2"` from `"math2"`),
    /// used only for human-readable log/catalog disambiguation.
    pub alias: Option<String>,
    /// Whether the key carried a trailing `...` loop marker.
    pub is_loop: bool,
    /// Non-edge fields of the invocation body — passed to the node as config.
    pub config: Map<String, Value>,
    /// Edge name (without the trailing `?`) to its target, in declaration order.
    pub edges: IndexMap<String, EdgeTarget>,
}

/// What following a given edge leads to.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeTarget {
    /// `null` — stop this branch, continue the enclosing sequence.
    Terminal,
    /// A single nested node invocation.
    Next(Box<NodeInvocation>),
    /// An ordered sub-flow of node invocations.
    SubFlow(Vec<NodeInvocation>),
}

impl NodeInvocation {
    /// Parse a single node invocation from its single-entry JSON object form.
    pub fn parse(value: &Value) -> Result<Self, WorkflowError> {
        let obj = value
            .as_object()
            .ok_or_else(|| WorkflowError::MalformedInvocation(value.to_string()))?;
        if obj.len() != 1 {
            return Err(WorkflowError::MalformedInvocation(value.to_string()));
        }
        let (raw_key, body) = obj.iter().next().expect("len checked above");
        let body = body.as_object().ok_or(WorkflowError::MalformedBody)?;

        let (node_key, alias, is_loop) = parse_key(raw_key);

        let mut config = Map::new();
        let mut edges = IndexMap::new();
        for (key, val) in body {
            if let Some(edge_name) = key.strip_suffix('?') {
                edges.insert(edge_name.to_owned(), EdgeTarget::parse(val)?);
            } else {
                config.insert(key.clone(), val.clone());
            }
        }

        Ok(Self {
            node_key,
            alias,
            is_loop,
            config,
            edges,
        })
    }

    /// Parse an ordered sequence of node invocations (a `workflow` array or a sub-flow).
    pub fn parse_sequence(value: &Value) -> Result<Vec<Self>, WorkflowError> {
        let arr = value
            .as_array()
            .ok_or_else(|| WorkflowError::MalformedInvocation(value.to_string()))?;
        arr.iter().map(Self::parse).collect()
    }
}

impl EdgeTarget {
    fn parse(value: &Value) -> Result<Self, WorkflowError> {
        match value {
            Value::Null => Ok(Self::Terminal),
            Value::Object(_) => Ok(Self::Next(Box::new(NodeInvocation::parse(value)?))),
            Value::Array(_) => Ok(Self::SubFlow(NodeInvocation::parse_sequence(value)?)),
            other => Err(WorkflowError::MalformedEdge(other.to_string())),
        }
    }
}

/// Split a raw invocation key into `(node_key, alias, is_loop)`.
///
/// `"math..."` → `("math", None, true)`; `"math2"` → `("math", Some("2"), false)`;
/// `"math"` → `("math", None, false)`.
fn parse_key(raw: &str) -> (String, Option<String>, bool) {
    let (base, is_loop) = match raw.strip_suffix("...") {
        Some(stripped) => (stripped, true),
        None => (raw, false),
    };

    let digit_start = base
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    match digit_start {
        Some(idx) if idx > 0 => (base[..idx].to_owned(), Some(base[idx..].to_owned()), is_loop),
        _ => (base.to_owned(), None, is_loop),
    }
}
