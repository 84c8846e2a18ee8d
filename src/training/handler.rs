//! HTTP handlers for the training API
//!
//! Responses use the platform envelope `{code, message, data}`:
//! - POST /api/training/start
//! - POST /api/training/stop/:task_id
//! - GET  /api/training/status/:task_id
//! - GET  /api/training/health

use super::{TaskId, TrainingOrchestrator, TrainingRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

/// Create the training router
pub fn training_router(orchestrator: TrainingOrchestrator) -> Router {
    Router::new()
        .route("/api/training/start", post(start_training))
        .route("/api/training/stop/:task_id", post(stop_training))
        .route("/api/training/status/:task_id", get(training_status))
        .route("/api/training/health", get(health))
        .with_state(orchestrator)
}

/// Response envelope shared by the training endpoints
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

fn reply(
    status: StatusCode,
    message: impl Into<String>,
    data: Option<serde_json::Value>,
) -> (StatusCode, Json<Envelope>) {
    (
        status,
        Json(Envelope {
            code: status.as_u16(),
            message: message.into(),
            data,
        }),
    )
}

async fn start_training(
    State(orchestrator): State<TrainingOrchestrator>,
    Json(request): Json<TrainingRequest>,
) -> impl IntoResponse {
    let task_id = request.task_id;
    match orchestrator.start(request).await {
        Ok(_) => reply(StatusCode::OK, "训练任务已启动", Some(json!({ "taskId": task_id }))),
        Err(e) => {
            tracing::error!(task_id, error = %e, "Failed to start training task");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("启动训练失败: {}", e),
                None,
            )
        }
    }
}

async fn stop_training(
    State(orchestrator): State<TrainingOrchestrator>,
    Path(task_id): Path<TaskId>,
) -> impl IntoResponse {
    match orchestrator.stop(task_id).await {
        Ok(()) => reply(StatusCode::OK, "训练任务已停止", Some(json!({ "taskId": task_id }))),
        Err(e) => {
            tracing::warn!(task_id, error = %e, "Failed to stop training task");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("停止训练失败: {}", e),
                None,
            )
        }
    }
}

async fn training_status(
    State(orchestrator): State<TrainingOrchestrator>,
    Path(task_id): Path<TaskId>,
) -> impl IntoResponse {
    match orchestrator.status(task_id).await {
        Some(snapshot) => reply(StatusCode::OK, "获取状态成功", serde_json::to_value(snapshot).ok()),
        None => reply(StatusCode::NOT_FOUND, "任务不存在", None),
    }
}

async fn health(State(orchestrator): State<TrainingOrchestrator>) -> impl IntoResponse {
    let active_tasks = orchestrator.active_count().await;
    reply(
        StatusCode::OK,
        "训练服务运行正常",
        Some(json!({
            "service": "training",
            "status": "healthy",
            "active_tasks": active_tasks,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{PacedTrainer, ProgressNotifier};
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn make_app() -> (Router, TrainingOrchestrator) {
        let orchestrator = TrainingOrchestrator::new(
            Arc::new(PacedTrainer::new(Duration::from_millis(200))),
            ProgressNotifier::new(Duration::from_secs(1)),
        );
        (training_router(orchestrator.clone()), orchestrator)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn start_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/training/start")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_start_and_status() {
        let (app, orchestrator) = make_app();

        let resp = app
            .clone()
            .oneshot(start_request(
                r#"{"taskId":42,"modelType":"TEXT_CLASSIFIER","modelConfig":{"epochs":5}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["code"], 200);
        assert_eq!(json["data"]["taskId"], 42);

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/training/status/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["taskId"], 42);
        assert_eq!(json["data"]["status"], "RUNNING");

        orchestrator.stop(42).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_start_is_error() {
        let (app, orchestrator) = make_app();
        let body = r#"{"taskId":7,"modelType":"SENTIMENT_ANALYZER","modelConfig":{"epochs":5}}"#;

        let first = app.clone().oneshot(start_request(body)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(start_request(body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(second).await;
        assert_eq!(json["code"], 500);
        assert!(json["message"].as_str().unwrap().starts_with("启动训练失败"));
        assert!(json.get("data").is_none());

        orchestrator.stop(7).await.unwrap();
    }

    #[tokio::test]
    async fn test_status_unknown_task() {
        let (app, _) = make_app();
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/training/status/1000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "任务不存在");
    }

    #[tokio::test]
    async fn test_stop_unknown_task() {
        let (app, _) = make_app();
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/training/stop/5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = make_app();
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/training/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["service"], "training");
        assert_eq!(json["data"]["active_tasks"], 0);
    }
}
