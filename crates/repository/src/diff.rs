//! Per-log-entry state diffing (spec §4.E "State-diff").
//!
//! The interpreter only ever merges edge payloads as a shallow top-level
//! overlay ([`nebula_execution::ExecutionContext::merge`]), so a diff only
//! ever needs to compare top-level keys — no recursive JSON-patch machinery.

use serde_json::{Map, Value};

/// One top-level field's change between a node's `stateBefore` and `stateAfter`.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOp {
    Added { key: String, value: Value },
    Removed { key: String, old_value: Value },
    Replaced { key: String, old_value: Value, new_value: Value },
}

/// Diff two top-level state snapshots, in key-sorted order for determinism.
#[must_use]
pub fn state_diff(before: &Map<String, Value>, after: &Map<String, Value>) -> Vec<DiffOp> {
    let mut keys: Vec<&String> = before.keys().chain(after.keys()).collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .filter_map(|key| match (before.get(key), after.get(key)) {
            (None, Some(value)) => Some(DiffOp::Added {
                key: key.clone(),
                value: value.clone(),
            }),
            (Some(old_value), None) => Some(DiffOp::Removed {
                key: key.clone(),
                old_value: old_value.clone(),
            }),
            (Some(old_value), Some(new_value)) if old_value != new_value => Some(DiffOp::Replaced {
                key: key.clone(),
                old_value: old_value.clone(),
                new_value: new_value.clone(),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect()
    }

    #[test]
    fn identical_states_produce_no_ops() {
        let before = map(&[("a", json!(1))]);
        assert!(state_diff(&before, &before).is_empty());
    }

    #[test]
    fn detects_additions_removals_and_replacements() {
        let before = map(&[("kept", json!(1)), ("removed", json!("gone"))]);
        let after = map(&[("kept", json!(2)), ("added", json!(true))]);

        let ops = state_diff(&before, &after);
        assert_eq!(
            ops,
            vec![
                DiffOp::Added {
                    key: "added".into(),
                    value: json!(true)
                },
                DiffOp::Replaced {
                    key: "kept".into(),
                    old_value: json!(1),
                    new_value: json!(2)
                },
                DiffOp::Removed {
                    key: "removed".into(),
                    old_value: json!("gone")
                },
            ]
        );
    }
}
