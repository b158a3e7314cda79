//! The combined per-node resolution pass: `$.path` substitution followed by
//! `{{$.path}}` template rendering, applied recursively over a node's config
//! immediately before `execute`.

use serde_json::Value;

use crate::path::resolve_refs;
use crate::template::render;

/// Resolve a node's config against `state`: first replace any whole-string
/// `$.path` reference with its resolved value (which may itself be an
/// object, array, or scalar), then render `{{$.path}}` placeholders inside
/// whatever strings remain. Numeric and boolean leaves pass through
/// unchanged; the recursion walks objects and arrays in place.
#[must_use]
pub fn resolve_config(config: &Value, state: &Value) -> Value {
    render_templates(&resolve_refs(config, state), state)
}

fn render_templates(value: &Value, state: &Value) -> Value {
    match value {
        Value::String(s) if s.contains("{{") => Value::String(render(s, state)),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), render_templates(v, state)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| render_templates(v, state)).collect()),
        other => other.clone(),
    }
}
