//! Named workflow patterns: detect which shapes a definition resembles,
//! and generate a runnable definition from a template by substituting
//! `{{placeholder}}` tokens.

use std::collections::HashMap;

use nebula_workflow::{EdgeTarget, NodeInvocation, WorkflowDefinition};
use serde_json::Value;

/// A named, reusable workflow shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTemplate {
    pub name: String,
    pub description: String,
    /// Node types a definition is expected to contain, in order of
    /// importance, for detection to consider this pattern present.
    signature: Vec<&'static str>,
    /// The template body, as JSON with `{{placeholder}}` tokens in string
    /// positions. Substitution is a plain string replace, so a placeholder
    /// may appear anywhere a JSON string is valid.
    body: Value,
}

/// A detected pattern and how confident the match is.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub pattern_name: String,
    pub confidence: f64,
}

/// The fixed set of named patterns recognized and generated.
pub struct PatternLibrary {
    templates: Vec<PatternTemplate>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternLibrary {
    /// The built-in library: ETL pipeline, conditional branching, counter
    /// loop, AI pipeline, error handling, parallel split/aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: vec![
                PatternTemplate {
                    name: "etl-pipeline".to_owned(),
                    description: "Extract via HTTP, transform fields, load via HTTP".to_owned(),
                    signature: vec!["http", "editFields", "http"],
                    body: serde_json::json!([
                        {"http": {
                            "url": "{{sourceUrl}}",
                            "method": "GET",
                            "success?": {"editFields": {
                                "fieldsToSet": "{{transform}}",
                                "success?": {"http": {
                                    "url": "{{destinationUrl}}",
                                    "method": "POST",
                                    "success?": null
                                }}
                            }}
                        }}
                    ]),
                },
                PatternTemplate {
                    name: "conditional-branching".to_owned(),
                    description: "A single decision with two distinct branches".to_owned(),
                    signature: vec!["logic"],
                    body: serde_json::json!([
                        {"logic": {
                            "operation": "{{comparison}}",
                            "values": ["{{left}}", "{{right}}"],
                            "true?": "{{thenBranch}}",
                            "false?": "{{elseBranch}}"
                        }}
                    ]),
                },
                PatternTemplate {
                    name: "counter-loop".to_owned(),
                    description: "A `...` loop node re-entering itself until a terminal edge fires".to_owned(),
                    signature: vec!["logic"],
                    body: serde_json::json!([
                        {"logic...": {
                            "operation": "less",
                            "values": ["$.counter", "{{limit}}"],
                            "true?": "{{loopBody}}",
                            "false?": null
                        }}
                    ]),
                },
                PatternTemplate {
                    name: "ai-pipeline".to_owned(),
                    description: "A model call feeding a downstream transform".to_owned(),
                    signature: vec!["ai", "editFields"],
                    body: serde_json::json!([
                        {"ai": {
                            "prompt": "{{prompt}}",
                            "model": "{{model}}",
                            "success?": {"editFields": {
                                "fieldsToSet": "{{transform}}",
                                "success?": null
                            }}
                        }}
                    ]),
                },
                PatternTemplate {
                    name: "error-handling".to_owned(),
                    description: "A fallible node whose error edge is explicitly handled rather than left terminal".to_owned(),
                    signature: vec!["http"],
                    body: serde_json::json!([
                        {"http": {
                            "url": "{{url}}",
                            "success?": null,
                            "error?": {"log": {"message": "{{errorMessage}}"}}
                        }}
                    ]),
                },
                PatternTemplate {
                    name: "parallel-split-aggregate".to_owned(),
                    description: "Independent branches off one edge, rejoining at a shared aggregation step".to_owned(),
                    signature: vec!["http", "http", "editFields"],
                    body: serde_json::json!([
                        {"http": {"url": "{{branchAUrl}}", "success?": null}},
                        {"http": {"url": "{{branchBUrl}}", "success?": null}},
                        {"editFields": {"fieldsToSet": "{{aggregate}}"}}
                    ]),
                },
            ],
        }
    }

    /// All registered templates.
    #[must_use]
    pub fn templates(&self) -> &[PatternTemplate] {
        &self.templates
    }

    /// Match every template against `definition`'s node-type multiset and
    /// return each with its confidence, highest first. Confidence is the
    /// fraction of the template's signature node types actually present,
    /// in any order — this is a coarse shape match, not a subgraph
    /// isomorphism check.
    #[must_use]
    pub fn detect(&self, definition: &WorkflowDefinition) -> Vec<PatternMatch> {
        let mut present: HashMap<&str, usize> = HashMap::new();
        collect_node_keys(&definition.workflow, &mut present);

        let mut matches: Vec<PatternMatch> = self
            .templates
            .iter()
            .filter_map(|template| {
                let mut remaining = present.clone();
                let hits = template
                    .signature
                    .iter()
                    .filter(|key| {
                        if let Some(count) = remaining.get_mut(*key) {
                            if *count > 0 {
                                *count -= 1;
                                return true;
                            }
                        }
                        false
                    })
                    .count();
                if hits == 0 {
                    return None;
                }
                Some(PatternMatch {
                    pattern_name: template.name.clone(),
                    confidence: hits as f64 / template.signature.len() as f64,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal));
        matches
    }

    /// Substitute `{{placeholder}}` tokens in the named template's body with
    /// `params` and return the resulting JSON. Placeholders with no entry in
    /// `params` are left untouched.
    #[must_use]
    pub fn generate(&self, pattern_name: &str, params: &HashMap<String, String>) -> Option<Value> {
        let template = self.templates.iter().find(|t| t.name == pattern_name)?;
        Some(substitute(&template.body, params))
    }
}

fn collect_node_keys<'a>(nodes: &'a [NodeInvocation], out: &mut HashMap<&'a str, usize>) {
    for invocation in nodes {
        *out.entry(invocation.node_key.as_str()).or_insert(0) += 1;
        for target in invocation.edges.values() {
            match target {
                EdgeTarget::Terminal => {}
                EdgeTarget::Next(next) => collect_node_keys(std::slice::from_ref(next), out),
                EdgeTarget::SubFlow(steps) => collect_node_keys(steps, out),
            }
        }
    }
}

fn substitute(value: &Value, params: &HashMap<String, String>) -> Value {
    match value {
        Value::String(s) => {
            let mut replaced = s.clone();
            for (key, val) in params {
                replaced = replaced.replace(&format!("{{{{{key}}}}}"), val);
            }
            Value::String(replaced)
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute(v, params)).collect()),
        Value::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), substitute(v, params))).collect()),
        other => other.clone(),
    }
}
