//! The interpreter: spec §4.D's algorithm, node by node.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::Utc;
use nebula_action::{ActionContext, ActionError, ActionRegistry};
use nebula_core::{ExecutionId, NodeId, ScopeLevel, WorkflowId};
use nebula_eventbus::{EventBus, WorkflowEvent};
use nebula_execution::{ExecutionContext, NodeLogEntry, NodeLogStatus};
use nebula_expression::resolve_config;
use nebula_workflow::{EdgeTarget, NodeInvocation, WorkflowDefinition, MAX_WORKFLOW_NODES};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info_span, Instrument};

use crate::error::EngineError;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Everything the interpreter needs to start a run that isn't already on
/// the [`WorkflowDefinition`] itself.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Execution id this run is recorded under (the correlation id threaded
    /// through every emitted event and log entry).
    pub execution_id: Option<ExecutionId>,
    /// Overrides merged on top of `definition.initial_state`; override wins
    /// key-for-key (spec §4.D step 1).
    pub initial_state_override: Option<Map<String, Value>>,
    /// The authenticated caller's identity token, injected into state as
    /// `JWT_token` before the first node runs (spec §4.D "Auth injection").
    pub jwt_token: Option<String>,
    /// External cancellation signal; if absent a fresh, never-cancelled
    /// token is used.
    pub cancellation: Option<CancellationToken>,
}

/// The result of running a workflow definition to completion or failure.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// `completed` if the top-level sequence was exhausted without
    /// failure; `failed` on an unknown node, no-edge, cancellation, or an
    /// unhandled node error.
    pub status: nebula_execution::ExecutionStatus,
    /// The state as of the end of the run (or the point of failure).
    pub final_state: Map<String, Value>,
    /// Final edge payload of the last node that fired one, if any.
    pub result: Option<Value>,
    /// Every node log entry appended while the run was in progress.
    pub node_logs: Vec<NodeLogEntry>,
    /// Invocation-tree index path of the node that failed, e.g. `"0.success?.1"`.
    pub failed_node_id: Option<String>,
    /// Error message, present only when `status == Failed`.
    pub error: Option<String>,
}

/// Outcome of walking one node or one sequence: either the branch may
/// continue, or the whole run must stop (the failure detail already lives
/// on [`Walk::failed_node_id`] / [`Walk::error`]).
enum Signal {
    Continue,
    Fail,
}

/// Mutable state threaded through the recursive walk.
struct Walk<'a> {
    registry: &'a ActionRegistry,
    ctx: &'a ExecutionContext,
    events: Option<&'a EventBus<WorkflowEvent>>,
    workflow_id: WorkflowId,
    execution_id: ExecutionId,
    logs: Vec<NodeLogEntry>,
    failed_node_id: Option<String>,
    error: Option<String>,
    last_result: Option<Value>,
}

/// The workflow interpreter. Stateless across runs — everything run-specific
/// lives in [`RunRequest`] / the per-run [`Walk`].
#[derive(Clone)]
pub struct Interpreter {
    registry: Arc<ActionRegistry>,
    events: Option<Arc<EventBus<WorkflowEvent>>>,
}

impl Interpreter {
    /// Build an interpreter around a populated [`ActionRegistry`].
    #[must_use]
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self {
            registry,
            events: None,
        }
    }

    /// Attach a live-event bus; every `workflow:*` / `node:*` event (spec §6)
    /// is published to it as the run progresses.
    #[must_use]
    pub fn with_events(mut self, bus: Arc<EventBus<WorkflowEvent>>) -> Self {
        self.events = Some(bus);
        self
    }

    /// Run `definition` to completion or failure.
    pub async fn run(&self, definition: &WorkflowDefinition, request: RunRequest) -> RunOutcome {
        let execution_id = request.execution_id.unwrap_or_else(ExecutionId::v4);
        let cancellation = request.cancellation.unwrap_or_default();

        let mut initial_state = definition.initial_state.clone();
        if let Some(overrides) = request.initial_state_override {
            for (key, value) in overrides {
                initial_state.insert(key, value);
            }
        }

        let ctx = ExecutionContext::new(execution_id, definition.id, initial_state)
            .with_cancellation(cancellation);

        if let Some(token) = &request.jwt_token {
            ctx.set("JWT_token", Value::String(token.clone()));
        }

        let mut walk = Walk {
            registry: &self.registry,
            ctx: &ctx,
            events: self.events.as_deref(),
            workflow_id: definition.id,
            execution_id,
            logs: Vec::new(),
            failed_node_id: None,
            error: None,
            last_result: None,
        };

        walk.publish(WorkflowEvent::WorkflowStarted {
            workflow_id: walk.workflow_id,
            execution_id: walk.execution_id,
            timestamp: Utc::now(),
        })
        .await;

        let span = info_span!("workflow_run", workflow_id = %definition.id, execution_id = %execution_id);
        let outcome = async {
            execute_sequence(&mut walk, &definition.workflow, String::new()).await
        }
        .instrument(span)
        .await;

        let status = match outcome {
            Signal::Continue => nebula_execution::ExecutionStatus::Completed,
            Signal::Fail => nebula_execution::ExecutionStatus::Failed,
        };

        match status {
            nebula_execution::ExecutionStatus::Completed => {
                walk.publish(WorkflowEvent::WorkflowCompleted {
                    workflow_id: walk.workflow_id,
                    execution_id: walk.execution_id,
                    timestamp: Utc::now(),
                })
                .await;
            }
            _ => {
                walk.publish(WorkflowEvent::WorkflowFailed {
                    workflow_id: walk.workflow_id,
                    execution_id: walk.execution_id,
                    error: walk.error.clone().unwrap_or_default(),
                    timestamp: Utc::now(),
                })
                .await;
            }
        }

        RunOutcome {
            status,
            final_state: ctx.snapshot(),
            result: walk.last_result,
            node_logs: walk.logs,
            failed_node_id: walk.failed_node_id,
            error: walk.error,
        }
    }
}

impl Walk<'_> {
    async fn publish(&self, event: WorkflowEvent) {
        if let Some(bus) = self.events {
            bus.publish(event).await;
        }
    }

    fn fail(&mut self, node_id: String, message: String) -> Signal {
        self.failed_node_id = Some(node_id);
        self.error = Some(message);
        Signal::Fail
    }
}

/// Walk a sequence of sibling invocations left to right (spec §4.D step 2).
/// `prefix` is the invocation-tree path of the sequence's parent scope
/// (empty for the workflow's top level).
fn execute_sequence<'a>(
    walk: &'a mut Walk<'_>,
    nodes: &'a [NodeInvocation],
    prefix: String,
) -> BoxFuture<'a, Signal> {
    Box::pin(async move {
        for (index, invocation) in nodes.iter().enumerate() {
            if walk.ctx.check_cancelled().is_err() {
                return walk.fail(
                    path_for(&prefix, index),
                    EngineError::Cancelled.to_string(),
                );
            }

            let path = path_for(&prefix, index);
            match execute_node(walk, invocation, path).await {
                Signal::Continue => {}
                Signal::Fail => return Signal::Fail,
            }
        }
        Signal::Continue
    })
}

fn path_for(prefix: &str, index: usize) -> String {
    if prefix.is_empty() {
        index.to_string()
    } else {
        format!("{prefix}.{index}")
    }
}

/// Execute a single invocation — a loop node re-enters itself per spec
/// §4.D step 2h; anything else dispatches once and follows its edge.
fn execute_node<'a>(
    walk: &'a mut Walk<'_>,
    invocation: &'a NodeInvocation,
    path: String,
) -> BoxFuture<'a, Signal> {
    Box::pin(async move {
        if invocation.is_loop {
            execute_loop(walk, invocation, path).await
        } else {
            match invoke_once(walk, invocation, &path).await {
                Ok(Some((edge_name, target))) => {
                    follow_edge(walk, &edge_name, target, &path).await
                }
                Ok(None) => Signal::Continue,
                Err(()) => Signal::Fail,
            }
        }
    })
}

/// Re-invoke `invocation` until its fired edge is no longer a sub-flow
/// (spec §4.D step 2h / §9 open question (b): an exception inside the loop
/// body propagates to the enclosing loop node, terminating the run).
fn execute_loop<'a>(
    walk: &'a mut Walk<'_>,
    invocation: &'a NodeInvocation,
    path: String,
) -> BoxFuture<'a, Signal> {
    Box::pin(async move {
        let mut iterations: usize = 0;
        loop {
            if walk.ctx.check_cancelled().is_err() {
                return walk.fail(path.clone(), EngineError::Cancelled.to_string());
            }

            iterations += 1;
            if iterations > MAX_WORKFLOW_NODES {
                return walk.fail(path.clone(), EngineError::LoopLimitExceeded(path.clone()).to_string());
            }

            let (edge_name, target) = match invoke_once(walk, invocation, &path).await {
                Ok(Some(pair)) => pair,
                Ok(None) => return Signal::Continue,
                Err(()) => return Signal::Fail,
            };

            match target {
                EdgeTarget::SubFlow(steps) => {
                    let body_prefix = format!("{path}.{edge_name}?");
                    match execute_sequence(walk, &steps, body_prefix).await {
                        Signal::Continue => {} // loop again
                        Signal::Fail => return Signal::Fail,
                    }
                }
                other => return follow_edge(walk, &edge_name, other, &path).await,
            }
        }
    })
}

/// Apply the outcome of a non-looping edge: stop the branch, recurse into a
/// single continuation, or run a sub-flow once.
fn follow_edge<'a>(
    walk: &'a mut Walk<'_>,
    edge_name: &'a str,
    target: EdgeTarget,
    path: &'a str,
) -> BoxFuture<'a, Signal> {
    Box::pin(async move {
        match target {
            EdgeTarget::Terminal => Signal::Continue,
            EdgeTarget::Next(next) => {
                let next_path = format!("{path}.{edge_name}?");
                execute_node(walk, &next, next_path).await
            }
            EdgeTarget::SubFlow(steps) => {
                let sub_prefix = format!("{path}.{edge_name}?");
                execute_sequence(walk, &steps, sub_prefix).await
            }
        }
    })
}

/// Resolve config, dispatch to the registered action, merge its payload,
/// and append a node log entry. Returns the fired `(edge_name, target)` to
/// follow, `Ok(None)` if the edge's target is unreachable bookkeeping (never
/// actually produced by today's parser, kept for forward compatibility), or
/// `Err(())` once `walk.failed_node_id`/`walk.error` record the failure.
async fn invoke_once(
    walk: &mut Walk<'_>,
    invocation: &NodeInvocation,
    path: &str,
) -> Result<Option<(String, EdgeTarget)>, ()> {
    let state_before = walk.ctx.snapshot();

    let action = match walk.registry.resolve(&invocation.node_key) {
        Ok(action) => action.clone(),
        Err(_) => {
            let message = EngineError::UnknownNode(invocation.node_key.clone()).to_string();
            walk.logs.push(NodeLogEntry {
                node_id: path.to_owned(),
                node_type: invocation.node_key.clone(),
                status: NodeLogStatus::Failed,
                duration_ms: 0,
                config: Value::Object(invocation.config.clone()),
                output: None,
                error: Some(message.clone()),
                state_before: state_before.clone(),
                state_after: state_before,
            });
            walk.publish(WorkflowEvent::NodeFailed {
                execution_id: walk.execution_id,
                node_id: path.to_owned(),
                node_type: invocation.node_key.clone(),
                error: message.clone(),
                timestamp: Utc::now(),
            })
            .await;
            walk.fail(path.to_owned(), message);
            return Err(());
        }
    };

    let resolved_config = resolve_config(&Value::Object(invocation.config.clone()), &Value::Object(state_before.clone()));

    let action_ctx = ActionContext::new(
        walk.execution_id,
        NodeId::v4(),
        walk.workflow_id,
        ScopeLevel::Global,
    )
    .with_cancellation(walk.ctx.cancellation.clone());

    walk.publish(WorkflowEvent::NodeStarted {
        execution_id: walk.execution_id,
        node_id: path.to_owned(),
        node_type: invocation.node_key.clone(),
        timestamp: Utc::now(),
    })
    .await;

    let started = std::time::Instant::now();
    let outcome = action.execute(&action_ctx, &resolved_config).await;
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(edge_map) => match edge_map.first_fired() {
            Some((edge_name, payload)) => {
                walk.ctx.merge(payload);
                let state_after = walk.ctx.snapshot();
                walk.logs.push(NodeLogEntry {
                    node_id: path.to_owned(),
                    node_type: invocation.node_key.clone(),
                    status: NodeLogStatus::Completed,
                    duration_ms,
                    config: resolved_config,
                    output: Some(payload.clone()),
                    error: None,
                    state_before,
                    state_after,
                });
                walk.last_result = Some(payload.clone());
                walk.publish(WorkflowEvent::NodeCompleted {
                    execution_id: walk.execution_id,
                    node_id: path.to_owned(),
                    node_type: invocation.node_key.clone(),
                    duration_ms,
                    result: Some(payload.clone()),
                    timestamp: Utc::now(),
                })
                .await;

                match invocation.edges.get(edge_name) {
                    Some(target) => Ok(Some((edge_name.to_owned(), target.clone()))),
                    // The node fired an edge it never declared in the
                    // workflow definition — nothing to follow; treat the
                    // branch as terminated rather than failing the run.
                    None => Ok(None),
                }
            }
            None => {
                let message = EngineError::NodeNoEdge(path.to_owned()).to_string();
                walk.logs.push(NodeLogEntry {
                    node_id: path.to_owned(),
                    node_type: invocation.node_key.clone(),
                    status: NodeLogStatus::Failed,
                    duration_ms,
                    config: resolved_config,
                    output: None,
                    error: Some(message.clone()),
                    state_before: state_before.clone(),
                    state_after: state_before,
                });
                walk.publish(WorkflowEvent::NodeFailed {
                    execution_id: walk.execution_id,
                    node_id: path.to_owned(),
                    node_type: invocation.node_key.clone(),
                    error: message.clone(),
                    timestamp: Utc::now(),
                })
                .await;
                walk.fail(path.to_owned(), message);
                Err(())
            }
        },
        Err(action_err) => {
            let message = action_err.to_string();
            walk.logs.push(NodeLogEntry {
                node_id: path.to_owned(),
                node_type: invocation.node_key.clone(),
                status: NodeLogStatus::Failed,
                duration_ms,
                config: resolved_config,
                output: None,
                error: Some(message.clone()),
                state_before: state_before.clone(),
                state_after: state_before,
            });
            walk.publish(WorkflowEvent::NodeFailed {
                execution_id: walk.execution_id,
                node_id: path.to_owned(),
                node_type: invocation.node_key.clone(),
                error: message.clone(),
                timestamp: Utc::now(),
            })
            .await;
            let engine_message = match action_err {
                ActionError::Cancelled => EngineError::Cancelled.to_string(),
                other => EngineError::NodeFailed {
                    node_id: path.to_owned(),
                    message: other.to_string(),
                }
                .to_string(),
            };
            walk.fail(path.to_owned(), engine_message);
            Err(())
        }
    }
}
