//! The "universal" node set: bundled actions available in every registry,
//! independent of whatever process-local ("server") actions a deployment
//! adds on top. Covers the arithmetic, branching, field-editing, and
//! logging primitives workflow definitions lean on most.
//!
//! Callers wire these in once at startup:
//!
//! ```rust,ignore
//! let mut registry = ActionRegistry::new();
//! nebula_action::builtin::register_all(&mut registry);
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::action::Action;
use crate::context::ActionContext;
use crate::error::ActionError;
use crate::metadata::ActionMetadata;
use crate::registry::ActionRegistry;
use crate::result::EdgeMap;

/// Register every bundled action into `registry`.
pub fn register_all(registry: &mut ActionRegistry) {
    registry.register(Arc::new(Math));
    registry.register(Arc::new(Log));
    registry.register(Arc::new(Logic));
    registry.register(Arc::new(EditFields));
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Default for MathOp {
    fn default() -> Self {
        Self::Add
    }
}

/// Folds `values` left to right through a single arithmetic operator and
/// fires `success` with the result under `mathResult`.
///
/// Non-numeric entries are skipped rather than rejected — a `$.path`
/// reference to a missing key resolves to `null`, and treating that as
/// "not a term" keeps a loosely-typed workflow running instead of failing
/// a node over one absent field.
pub struct Math;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MathConfig {
    #[serde(default)]
    operation: MathOp,
    #[serde(default)]
    values: Vec<Value>,
}

#[async_trait]
impl Action for Math {
    fn metadata(&self) -> &ActionMetadata {
        static META: std::sync::OnceLock<ActionMetadata> = std::sync::OnceLock::new();
        META.get_or_init(|| {
            ActionMetadata::new("math", "Math", "Arithmetic over a list of resolved values")
                .with_category("transform")
                .with_edge("success")
                .with_config_schema(serde_json::json!({
                    "type": "object",
                    "required": ["values"],
                    "properties": {
                        "operation": {"enum": ["add", "subtract", "multiply", "divide"]},
                        "values": {"type": "array"},
                    },
                }))
        })
    }

    async fn execute(&self, ctx: &ActionContext, config: &Value) -> Result<EdgeMap, ActionError> {
        ctx.check_cancelled()?;
        let config: MathConfig = serde_json::from_value(config.clone())
            .map_err(|e| ActionError::validation(format!("invalid math config: {e}")))?;

        let mut terms = config.values.iter().filter_map(Value::as_f64);
        let result = match config.operation {
            MathOp::Add => terms.sum(),
            MathOp::Subtract => {
                let first = terms.next().unwrap_or(0.0);
                terms.fold(first, |acc, v| acc - v)
            }
            MathOp::Multiply => terms.product(),
            MathOp::Divide => {
                let first = terms.next().unwrap_or(0.0);
                terms.try_fold(first, |acc, v| if v == 0.0 { None } else { Some(acc / v) })
                    .ok_or_else(|| ActionError::failed("division by zero"))?
            }
        };

        Ok(EdgeMap::single("success", serde_json::json!({"mathResult": result})))
    }
}

/// Renders its `message` (already template-resolved by the interpreter) to
/// the action logger and fires `success` with the same text under
/// `lastMessage`, so a later node can reference what was logged.
pub struct Log;

#[async_trait]
impl Action for Log {
    fn metadata(&self) -> &ActionMetadata {
        static META: std::sync::OnceLock<ActionMetadata> = std::sync::OnceLock::new();
        META.get_or_init(|| {
            ActionMetadata::new("log", "Log", "Writes a message to the execution log")
                .with_category("observability")
                .with_edge("success")
                .with_config_schema(serde_json::json!({
                    "type": "object",
                    "required": ["message"],
                    "properties": {"message": {"type": "string"}},
                }))
        })
    }

    async fn execute(&self, ctx: &ActionContext, config: &Value) -> Result<EdgeMap, ActionError> {
        ctx.check_cancelled()?;
        let message = config["message"].as_str().unwrap_or_default().to_owned();
        ctx.log_info(&message);
        Ok(EdgeMap::single("success", serde_json::json!({"lastMessage": message})))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
enum LogicOp {
    Less,
    Greater,
    Equal,
    LessOrEqual,
    GreaterOrEqual,
    NotEqual,
}

impl Default for LogicOp {
    fn default() -> Self {
        Self::Equal
    }
}

/// Compares `values[0]` against `values[1]` and fires exactly one of
/// `true`/`false`. `Equal`/`NotEqual` compare the raw JSON values; the
/// ordering operators compare as numbers, defaulting absent/non-numeric
/// terms to `0.0`.
pub struct Logic;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogicConfig {
    #[serde(default)]
    operation: LogicOp,
    #[serde(default)]
    values: Vec<Value>,
}

#[async_trait]
impl Action for Logic {
    fn metadata(&self) -> &ActionMetadata {
        static META: std::sync::OnceLock<ActionMetadata> = std::sync::OnceLock::new();
        META.get_or_init(|| {
            ActionMetadata::new("logic", "Logic", "Branches on a comparison between two values")
                .with_category("control-flow")
                .with_edge("true")
                .with_edge("false")
                .with_config_schema(serde_json::json!({
                    "type": "object",
                    "required": ["values"],
                    "properties": {
                        "operation": {"enum": ["less", "greater", "equal", "lessOrEqual", "greaterOrEqual", "notEqual"]},
                        "values": {"type": "array", "minItems": 2, "maxItems": 2},
                    },
                }))
        })
    }

    async fn execute(&self, ctx: &ActionContext, config: &Value) -> Result<EdgeMap, ActionError> {
        ctx.check_cancelled()?;
        let config: LogicConfig = serde_json::from_value(config.clone())
            .map_err(|e| ActionError::validation(format!("invalid logic config: {e}")))?;

        let lhs = config.values.first().cloned().unwrap_or(Value::Null);
        let rhs = config.values.get(1).cloned().unwrap_or(Value::Null);
        let outcome = match config.operation {
            LogicOp::Equal => lhs == rhs,
            LogicOp::NotEqual => lhs != rhs,
            LogicOp::Less => lhs.as_f64().unwrap_or(0.0) < rhs.as_f64().unwrap_or(0.0),
            LogicOp::Greater => lhs.as_f64().unwrap_or(0.0) > rhs.as_f64().unwrap_or(0.0),
            LogicOp::LessOrEqual => lhs.as_f64().unwrap_or(0.0) <= rhs.as_f64().unwrap_or(0.0),
            LogicOp::GreaterOrEqual => lhs.as_f64().unwrap_or(0.0) >= rhs.as_f64().unwrap_or(0.0),
        };

        let mut edges = EdgeMap::default();
        if outcome {
            edges.fire("true", Value::Object(Map::new()));
        } else {
            edges.fire("false", Value::Object(Map::new()));
        }
        Ok(edges)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
enum FieldType {
    String,
    Number,
    Boolean,
    Json,
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Json
    }
}

#[derive(Deserialize)]
struct FieldAssignment {
    name: String,
    value: Value,
    #[serde(default)]
    r#type: FieldType,
}

/// Applies an ordered list of `{name, value, type}` assignments and fires
/// `success` with the assigned fields as its payload, to be shallow-merged
/// into state by the interpreter.
///
/// `type` coerces `value` (already `$.path`/template resolved) before
/// assignment: `string` stringifies non-string JSON via `to_string`,
/// `number`/`boolean` parse a string value, `json` passes the value
/// through unchanged. A coercion that cannot succeed (e.g. `number` on
/// `"not a number"`) fails the node rather than silently writing `null`.
pub struct EditFields;

#[async_trait]
impl Action for EditFields {
    fn metadata(&self) -> &ActionMetadata {
        static META: std::sync::OnceLock<ActionMetadata> = std::sync::OnceLock::new();
        META.get_or_init(|| {
            ActionMetadata::new("editFields", "Edit Fields", "Sets named state fields, optionally type-coerced")
                .with_category("transform")
                .with_edge("success")
                .with_config_schema(serde_json::json!({
                    "type": "object",
                    "required": ["fieldsToSet"],
                    "properties": {
                        "fieldsToSet": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["name", "value"],
                                "properties": {
                                    "name": {"type": "string"},
                                    "type": {"enum": ["string", "number", "boolean", "json"]},
                                },
                            },
                        },
                    },
                }))
        })
    }

    async fn execute(&self, ctx: &ActionContext, config: &Value) -> Result<EdgeMap, ActionError> {
        ctx.check_cancelled()?;
        let fields: Vec<FieldAssignment> = serde_json::from_value(config["fieldsToSet"].clone())
            .map_err(|e| ActionError::validation(format!("invalid fieldsToSet: {e}")))?;

        let mut out = Map::new();
        for field in fields {
            let coerced = coerce(field.value, field.r#type)
                .map_err(|e| ActionError::failed(format!("field {:?}: {e}", field.name)))?;
            out.insert(field.name, coerced);
        }
        Ok(EdgeMap::single("success", Value::Object(out)))
    }
}

fn coerce(value: Value, kind: FieldType) -> Result<Value, String> {
    match kind {
        FieldType::Json => Ok(value),
        FieldType::String => Ok(Value::String(match value {
            Value::String(s) => s,
            other => other.to_string(),
        })),
        FieldType::Number => match &value {
            Value::Number(_) => Ok(value),
            Value::String(s) => s
                .parse::<f64>()
                .map(|n| serde_json::json!(n))
                .map_err(|_| format!("{s:?} is not a number")),
            other => Err(format!("{other} is not coercible to a number")),
        },
        FieldType::Boolean => match &value {
            Value::Bool(_) => Ok(value),
            Value::String(s) => match s.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(format!("{s:?} is not a boolean")),
            },
            other => Err(format!("{other} is not coercible to a boolean")),
        },
    }
}

#[cfg(test)]
mod tests {
    use nebula_core::id::{ExecutionId, NodeId, WorkflowId};
    use nebula_core::scope::ScopeLevel;
    use serde_json::json;

    use super::*;

    fn ctx() -> ActionContext {
        ActionContext::new(ExecutionId::v4(), NodeId::v4(), WorkflowId::v4(), ScopeLevel::Global)
    }

    #[tokio::test]
    async fn math_adds_by_default() {
        let out = Math.execute(&ctx(), &json!({"values": [10, 20]})).await.unwrap();
        assert_eq!(out.first_fired(), Some(("success", &json!({"mathResult": 30.0}))));
    }

    #[tokio::test]
    async fn math_divide_by_zero_fails() {
        let err = Math
            .execute(&ctx(), &json!({"operation": "divide", "values": [10, 0]}))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Failed { .. }));
    }

    #[tokio::test]
    async fn math_skips_non_numeric_terms() {
        let out = Math
            .execute(&ctx(), &json!({"values": [5, Value::Null, "not a number"]}))
            .await
            .unwrap();
        assert_eq!(out.first_fired(), Some(("success", &json!({"mathResult": 5.0}))));
    }

    #[tokio::test]
    async fn log_fires_success_with_the_message() {
        let out = Log.execute(&ctx(), &json!({"message": "hello"})).await.unwrap();
        assert_eq!(out.first_fired(), Some(("success", &json!({"lastMessage": "hello"}))));
    }

    #[tokio::test]
    async fn logic_less_fires_true_edge() {
        let out = Logic
            .execute(&ctx(), &json!({"operation": "less", "values": [1, 3]}))
            .await
            .unwrap();
        assert_eq!(out.first_fired().map(|(edge, _)| edge), Some("true"));
    }

    #[tokio::test]
    async fn logic_equal_compares_raw_values() {
        let out = Logic
            .execute(&ctx(), &json!({"operation": "equal", "values": ["a", "a"]}))
            .await
            .unwrap();
        assert_eq!(out.first_fired().map(|(edge, _)| edge), Some("true"));
    }

    #[tokio::test]
    async fn logic_defaults_missing_second_operand_to_false_edge() {
        let out = Logic
            .execute(&ctx(), &json!({"operation": "greater", "values": [1]}))
            .await
            .unwrap();
        assert_eq!(out.first_fired().map(|(edge, _)| edge), Some("false"));
    }

    #[tokio::test]
    async fn edit_fields_sets_each_named_field() {
        let out = EditFields
            .execute(
                &ctx(),
                &json!({"fieldsToSet": [{"name": "index", "value": 3}, {"name": "label", "value": "x"}]}),
            )
            .await
            .unwrap();
        assert_eq!(
            out.first_fired(),
            Some(("success", &json!({"index": 3, "label": "x"})))
        );
    }

    #[tokio::test]
    async fn edit_fields_coerces_string_to_number() {
        let out = EditFields
            .execute(&ctx(), &json!({"fieldsToSet": [{"name": "n", "value": "42", "type": "number"}]}))
            .await
            .unwrap();
        assert_eq!(out.first_fired(), Some(("success", &json!({"n": 42.0}))));
    }

    #[tokio::test]
    async fn edit_fields_rejects_bad_number_coercion() {
        let err = EditFields
            .execute(&ctx(), &json!({"fieldsToSet": [{"name": "n", "value": "oops", "type": "number"}]}))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Failed { .. }));
    }

    #[test]
    fn register_all_registers_the_four_universal_nodes() {
        let mut registry = ActionRegistry::new();
        register_all(&mut registry);
        for key in ["math", "log", "logic", "editFields"] {
            assert!(registry.contains(key), "missing builtin node: {key}");
        }
        assert_eq!(registry.len(), 4);
    }
}
