//! Webhook dispatch (spec §4.G). Public by design: no authentication, no
//! internal queue — refusal to scale is upstream's problem.

use axum::extract::{Path, State};
use axum::Json;
use nebula_engine::RunRequest;
use nebula_execution::{ExecutionRecord, TriggeredBy};
use nebula_repository::{AutomationRepository, ExecutionRepository, TriggerConfig};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn dispatch(Path(path): Path<String>, State(state): State<AppState>, Json(body): Json<Value>) -> Result<Json<Value>, ApiError> {
    let path = format!("/{path}");

    let automation = state
        .automation_repo
        .list_all()
        .await?
        .into_iter()
        .find(|a| matches!(&a.trigger_config, TriggerConfig::Webhook { webhook_url } if *webhook_url == path))
        .ok_or_else(|| ApiError::UnknownWebhookPath(path.clone()))?;

    if !automation.enabled {
        return Err(ApiError::AutomationDisabled(automation.id.to_string()));
    }

    let definition = state
        .workflows
        .read()
        .get(&automation.workflow_id)
        .cloned()
        .ok_or_else(|| ApiError::UnknownWorkflow(automation.workflow_id.to_string()))?;

    let initial_state = body.as_object().cloned().unwrap_or_default();

    let record = ExecutionRecord::start(
        nebula_core::ExecutionId::v4(),
        automation.workflow_id,
        TriggeredBy::Webhook,
        initial_state.clone(),
    );
    let execution_id = record.id;
    state.execution_repo.create_execution(record).await?;

    let outcome = state
        .interpreter
        .run(
            &definition,
            RunRequest {
                execution_id: Some(execution_id),
                initial_state_override: Some(initial_state),
                ..Default::default()
            },
        )
        .await;

    state
        .execution_repo
        .complete_execution(execution_id, outcome.status, outcome.result, outcome.error, Some(outcome.final_state))
        .await?;

    Ok(Json(json!({
        "message": "accepted",
        "executionId": execution_id,
        "automationId": automation.id,
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use nebula_action::ActionRegistry;
    use nebula_core::{AutomationId, PluginId, WorkflowId};
    use nebula_engine::Interpreter;
    use nebula_repository::{Automation, InMemoryAutomationRepository, InMemoryExecutionRepository};
    use nebula_workflow::WorkflowDefinition;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::state::AppState;

    fn workflow(id: WorkflowId) -> WorkflowDefinition {
        WorkflowDefinition::parse(&json!({
            "id": id.to_string(),
            "name": "noop",
            "version": "1.0.0",
            "workflow": [],
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn unmatched_webhook_path_is_not_found() {
        let state = AppState::new(
            Arc::new(Interpreter::new(Arc::new(ActionRegistry::new()))),
            Arc::new(InMemoryExecutionRepository::new()),
            Arc::new(InMemoryAutomationRepository::new()),
        );
        let app = crate::router(state);

        let response = app
            .oneshot(Request::builder().method("POST").uri("/automations/webhook/ghost").body(Body::from("{}")).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn matching_webhook_runs_the_workflow_and_reports_ids() {
        let workflow_id = WorkflowId::v4();
        let execution_repo = Arc::new(InMemoryExecutionRepository::new());
        let automation_repo = Arc::new(InMemoryAutomationRepository::new());
        let state = AppState::new(
            Arc::new(Interpreter::new(Arc::new(ActionRegistry::new()))),
            execution_repo,
            automation_repo.clone(),
        );
        state.add_workflow(workflow(workflow_id));

        let mut automation = Automation::new(
            AutomationId::v4(),
            PluginId::v4(),
            workflow_id,
            TriggerConfig::Webhook {
                webhook_url: "/hooks/deploy".into(),
            },
        );
        automation.set_enabled(true);
        automation_repo.create(automation).await.unwrap();

        let app = crate::router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/automations/webhook/hooks/deploy")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn disabled_automation_reports_conflict() {
        let workflow_id = WorkflowId::v4();
        let automation_repo = Arc::new(InMemoryAutomationRepository::new());
        let state = AppState::new(
            Arc::new(Interpreter::new(Arc::new(ActionRegistry::new()))),
            Arc::new(InMemoryExecutionRepository::new()),
            automation_repo.clone(),
        );
        state.add_workflow(workflow(workflow_id));

        let automation = Automation::new(
            AutomationId::v4(),
            PluginId::v4(),
            workflow_id,
            TriggerConfig::Webhook {
                webhook_url: "/hooks/paused".into(),
            },
        );
        automation_repo.create(automation).await.unwrap();

        let app = crate::router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/automations/webhook/hooks/paused")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
