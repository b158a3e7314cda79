use indexmap::IndexMap;
use serde_json::Value;

/// The edges an action fired, in the order it wants them considered.
///
/// An action builds this by inserting every edge it *might* fire, in
/// priority order, mapped to the payload it produced (or `None` if that
/// edge didn't trigger this call). The interpreter resolves it with
/// [`EdgeMap::first_fired`], which walks insertion order and returns the
/// first edge carrying `Some` payload — first-fired-wins, not last.
///
/// Most actions fire exactly one edge (`EdgeMap::single("success", value)`),
/// but branching nodes (`if`, `switch`) insert several candidate edges and
/// let only the chosen one carry data.
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    edges: IndexMap<String, Option<Value>>,
}

impl EdgeMap {
    /// An empty edge map — no edge fired. The interpreter treats this the
    /// same as every edge being `None`: the node terminates the branch.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Convenience for the common case: one edge, one payload.
    pub fn single(edge: impl Into<String>, payload: Value) -> Self {
        let mut map = Self::default();
        map.fire(edge, payload);
        map
    }

    /// Register that `edge` fired, carrying `payload`.
    pub fn fire(&mut self, edge: impl Into<String>, payload: Value) -> &mut Self {
        self.edges.insert(edge.into(), Some(payload));
        self
    }

    /// Register `edge` as a candidate that did not fire this call. Useful
    /// for declaring the full edge set up front before deciding which one
    /// actually carries data.
    pub fn skip(&mut self, edge: impl Into<String>) -> &mut Self {
        self.edges.insert(edge.into(), None);
        self
    }

    /// Walk edges in insertion order, returning the first one with a payload.
    #[must_use]
    pub fn first_fired(&self) -> Option<(&str, &Value)> {
        self.edges
            .iter()
            .find_map(|(name, payload)| payload.as_ref().map(|v| (name.as_str(), v)))
    }

    /// `true` if no edge carries a payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_fired().is_none()
    }

    /// Names of every edge this action knows about, fired or not.
    pub fn edge_names(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }
}
