//! The composability graph: for every node type, which node types have
//! actually been observed as its predecessor/successor across a corpus of
//! workflow definitions, with a frequency-based confidence score.
//!
//! There is no declared "this node pairs with that node" metadata on
//! [`nebula_action::ActionMetadata`] — edges are just names. So rather than
//! invent a separate declaration surface, the graph is learned from real
//! definitions: walking their node trees and counting which `(nodeType,
//! edge) -> nextNodeType` transitions occur.

use std::collections::HashMap;

use nebula_workflow::{EdgeTarget, NodeInvocation, WorkflowDefinition};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

/// A suggested next node type for a given `(current node type, edge)` pair,
/// with a confidence in `[0, 1]` — its observed share of all transitions out
/// of that edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub node_key: String,
    pub confidence: f64,
}

/// Learned predecessor/successor relationships between node types.
pub struct CompositionGraph {
    graph: DiGraph<String, (String, u32)>,
    index_of: HashMap<String, NodeIndex>,
}

impl CompositionGraph {
    /// Walk every definition's node tree and accumulate transition counts.
    #[must_use]
    pub fn from_definitions(definitions: &[WorkflowDefinition]) -> Self {
        let mut graph = DiGraph::new();
        let mut index_of: HashMap<String, NodeIndex> = HashMap::new();

        for definition in definitions {
            walk_sequence(&definition.workflow, &mut graph, &mut index_of);
        }

        Self { graph, index_of }
    }

    /// Declared predecessors of `node_key`: every node type observed firing
    /// an edge that led here.
    #[must_use]
    pub fn predecessors(&self, node_key: &str) -> Vec<&str> {
        let Some(&idx) = self.index_of.get(node_key) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// Declared successors of `node_key`, across all edges.
    #[must_use]
    pub fn successors(&self, node_key: &str) -> Vec<&str> {
        let Some(&idx) = self.index_of.get(node_key) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// Rank what typically follows `node_key` when it fires `edge`, by
    /// observed frequency.
    #[must_use]
    pub fn suggest(&self, node_key: &str, edge: &str) -> Vec<Suggestion> {
        let Some(&idx) = self.index_of.get(node_key) else {
            return Vec::new();
        };

        let counts: Vec<(String, u32)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|e| e.weight().0 == edge)
            .map(|e| (self.graph[e.target()].clone(), e.weight().1))
            .collect();

        let total: u32 = counts.iter().map(|(_, count)| count).sum();
        if total == 0 {
            return Vec::new();
        }

        let mut suggestions: Vec<Suggestion> = counts
            .into_iter()
            .map(|(node_key, count)| Suggestion {
                node_key,
                confidence: f64::from(count) / f64::from(total),
            })
            .collect();
        suggestions.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal));
        suggestions
    }
}

fn node_index(graph: &mut DiGraph<String, (String, u32)>, index_of: &mut HashMap<String, NodeIndex>, key: &str) -> NodeIndex {
    if let Some(&idx) = index_of.get(key) {
        return idx;
    }
    let idx = graph.add_node(key.to_owned());
    index_of.insert(key.to_owned(), idx);
    idx
}

fn record_edge(graph: &mut DiGraph<String, (String, u32)>, from: NodeIndex, to: NodeIndex, edge_name: &str) {
    if let Some(existing) = graph.find_edge(from, to).and_then(|e| graph.edge_weight_mut(e)).filter(|w| w.0 == edge_name) {
        existing.1 += 1;
    } else {
        graph.add_edge(from, to, (edge_name.to_owned(), 1));
    }
}

fn walk_sequence(nodes: &[NodeInvocation], graph: &mut DiGraph<String, (String, u32)>, index_of: &mut HashMap<String, NodeIndex>) {
    for invocation in nodes {
        walk_node(invocation, graph, index_of);
    }
}

fn walk_node(invocation: &NodeInvocation, graph: &mut DiGraph<String, (String, u32)>, index_of: &mut HashMap<String, NodeIndex>) {
    let from = node_index(graph, index_of, &invocation.node_key);

    for (edge_name, target) in &invocation.edges {
        match target {
            EdgeTarget::Terminal => {}
            EdgeTarget::Next(next) => {
                let to = node_index(graph, index_of, &next.node_key);
                record_edge(graph, from, to, edge_name);
                walk_node(next, graph, index_of);
            }
            EdgeTarget::SubFlow(steps) => {
                if let Some(first) = steps.first() {
                    let to = node_index(graph, index_of, &first.node_key);
                    record_edge(graph, from, to, edge_name);
                }
                walk_sequence(steps, graph, index_of);
            }
        }
    }
}
