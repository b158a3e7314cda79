//! `{{$.path}}` template interpolation over strings.

use serde_json::Value;

use crate::path::resolve;

/// Render every `{{$.path}}` occurrence in `input` by substituting the
/// resolved path's string form. An unresolved path (missing from `state`)
/// keeps its literal `{{$.path}}` placeholder rather than silently becoming
/// empty — the hole in the output is meant to be visible.
#[must_use]
pub fn render(input: &str, state: &Value) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        let Some(end) = rest[start..].find("}}") else {
            out.push_str(rest);
            return out;
        };
        let end = start + end;

        out.push_str(&rest[..start]);
        let placeholder = rest[start + 2..end].trim();

        if let Some(path) = placeholder.strip_prefix('$') {
            let full = format!("${path}");
            let resolved = resolve(&full, state);
            if resolved.is_null() && !path_exists(&full, state) {
                out.push_str(&rest[start..end + 2]);
            } else {
                out.push_str(&value_to_display(&resolved));
            }
        } else {
            out.push_str(&rest[start..end + 2]);
        }

        rest = &rest[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Whether a `$.path` reference resolves to a real (possibly-null) value
/// versus simply being absent — distinguishes a state field explicitly set
/// to `null` from a field that was never set.
fn path_exists(path: &str, state: &Value) -> bool {
    let Some(rest) = path.strip_prefix("$.") else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    let mut current = state;
    for segment in rest.split('.').filter(|s| !s.is_empty()) {
        match current {
            Value::Object(map) => match map.get(segment) {
                Some(v) => current = v,
                None => return false,
            },
            Value::Array(arr) => match segment.parse::<usize>().ok().and_then(|i| arr.get(i)) {
                Some(v) => current = v,
                None => return false,
            },
            _ => return false,
        }
    }
    true
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
