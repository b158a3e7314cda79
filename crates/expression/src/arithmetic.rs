//! A narrow arithmetic extension of reference resolution: `"$.a + 1"`-shaped
//! strings, as used by `editFields` to increment a counter (spec §8 S2).
//!
//! This is deliberately not a general expression language — just the one
//! binary-operator shape the bundled nodes need. A string that isn't
//! exactly `<operand> <op> <operand>` is left alone for [`crate::template`]
//! or a literal pass-through.

use serde_json::Value;

use crate::path::{is_pure_path, resolve};

/// Evaluate `s` as `<operand> <op> <operand>` against `state`, where each
/// operand is either a pure `$.path` reference or a numeric literal and
/// `<op>` is one of `+ - * /`. Returns `None` if `s` doesn't match that
/// shape or either operand fails to resolve to a number.
#[must_use]
pub fn try_eval(s: &str, state: &Value) -> Option<Value> {
    let tokens: Vec<&str> = s.trim().split_whitespace().collect();
    let [lhs, op, rhs] = tokens[..] else {
        return None;
    };

    let lhs = operand(lhs, state)?;
    let rhs = operand(rhs, state)?;
    apply(op, &lhs, &rhs)
}

fn operand(token: &str, state: &Value) -> Option<Value> {
    if is_pure_path(token) {
        return Some(resolve(token, state));
    }
    if let Ok(i) = token.parse::<i64>() {
        return Some(Value::from(i));
    }
    token.parse::<f64>().ok().map(|f| serde_json::json!(f))
}

/// Integer arithmetic when both operands are whole numbers (so `index + 1`
/// stays `3`, not `3.0`), falling back to floats otherwise.
fn apply(op: &str, lhs: &Value, rhs: &Value) -> Option<Value> {
    if let (Some(l), Some(r)) = (lhs.as_i64(), rhs.as_i64()) {
        let result = match op {
            "+" => l.checked_add(r),
            "-" => l.checked_sub(r),
            "*" => l.checked_mul(r),
            "/" if r != 0 => Some(l / r),
            _ => None,
        };
        if let Some(result) = result {
            return Some(Value::from(result));
        }
    }

    let l = lhs.as_f64()?;
    let r = rhs.as_f64()?;
    let result = match op {
        "+" => l + r,
        "-" => l - r,
        "*" => l * r,
        "/" if r != 0.0 => l / r,
        _ => return None,
    };
    Some(serde_json::json!(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> Value {
        json!({"index": 2, "ratio": 2.5})
    }

    #[test]
    fn increments_an_integer_path_by_a_literal() {
        assert_eq!(try_eval("$.index + 1", &state()), Some(json!(3)));
    }

    #[test]
    fn subtracts_and_multiplies() {
        assert_eq!(try_eval("$.index - 1", &state()), Some(json!(1)));
        assert_eq!(try_eval("$.index * 2", &state()), Some(json!(4)));
    }

    #[test]
    fn falls_back_to_floats_when_an_operand_is_fractional() {
        assert_eq!(try_eval("$.ratio + 1", &state()), Some(json!(3.5)));
    }

    #[test]
    fn division_by_zero_resolves_to_none() {
        assert_eq!(try_eval("$.index / 0", &state()), None);
    }

    #[test]
    fn missing_path_operand_resolves_to_none() {
        assert_eq!(try_eval("$.missing + 1", &state()), None);
    }

    #[test]
    fn non_arithmetic_shapes_are_rejected() {
        assert_eq!(try_eval("$.a and more", &state()), None);
        assert_eq!(try_eval("$.index", &state()), None);
        assert_eq!(try_eval("hello $.index", &state()), None);
    }
}
