//! `$.path` reference resolution against the execution state map.

use serde_json::Value;

/// Split a `$.a.b.2.c` reference into its dot-separated segments.
///
/// The leading `$.` is required; callers check for it before calling this.
/// Numeric segments are left as strings here — [`resolve`] decides at each
/// step whether the current value is an array (numeric index) or object
/// (string key).
fn segments(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// Whether `s` is, in its entirety, a `$.path` reference — spec §4.C(1)
/// scopes reference resolution to a config value that *equals* `$.<path>`,
/// not one that merely contains a reference somewhere inside a larger
/// string (that's [`crate::template::render`]'s job, or in the case of an
/// arithmetic shape like `"$.a + 1"`, [`crate::arithmetic::try_eval`]'s).
///
/// A bare `"$."` (whole-state reference) counts as pure. Anything else
/// requires every dot-separated segment to be non-empty and made up of
/// ASCII alphanumerics/underscores — no spaces, operators, or stray dots.
#[must_use]
pub(crate) fn is_pure_path(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("$.") else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    rest.split('.')
        .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
}

/// Resolve a `$.`-prefixed path against `state`, returning `Value::Null` if
/// any segment is missing — per the reference design, a missing path is a
/// value, never an error.
#[must_use]
pub fn resolve(path: &str, state: &Value) -> Value {
    let Some(rest) = path.strip_prefix("$.") else {
        return Value::Null;
    };
    if rest.is_empty() {
        return state.clone();
    }

    let mut current = state;
    for segment in segments(rest) {
        current = match current {
            Value::Object(map) => match map.get(segment) {
                Some(v) => v,
                None => return Value::Null,
            },
            Value::Array(arr) => match segment.parse::<usize>().ok().and_then(|i| arr.get(i)) {
                Some(v) => v,
                None => return Value::Null,
            },
            _ => return Value::Null,
        };
    }
    current.clone()
}

/// Replace every string value of the shape `"$.path"` inside `config` with
/// the path's resolved value, recursing through objects and arrays. A
/// string that is a `$.a + 1`-shaped arithmetic expression over one or two
/// such paths is evaluated the same way (see [`crate::arithmetic`]).
/// Strings that merely contain a `$.` reference alongside other text are
/// left for [`crate::template::render`] instead.
#[must_use]
pub fn resolve_refs(config: &Value, state: &Value) -> Value {
    match config {
        Value::String(s) if is_pure_path(s) => resolve(s, state),
        Value::String(s) => match crate::arithmetic::try_eval(s, state) {
            Some(value) => value,
            None => Value::String(s.clone()),
        },
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve_refs(v, state)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| resolve_refs(v, state)).collect()),
        other => other.clone(),
    }
}
