//! HTTP handlers for compliance checks and PII scans
//!
//! - POST /api/compliance/check: single compliance check
//! - POST /api/compliance/batch: batch compliance check
//! - POST /api/scaninfo: ID-card and phone number scan

use super::service::ScreeningService;
use super::types::{BatchComplianceResult, ComplianceMode, ComplianceResult, ScanMode, ScanResult};
use crate::config::LlmOverride;
use crate::error::{Error, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

/// Create the screening router
pub fn screening_router(service: ScreeningService) -> Router {
    Router::new()
        .route("/api/compliance/check", post(check))
        .route("/api/compliance/batch", post(check_batch))
        .route("/api/scaninfo", post(scan_info))
        .with_state(service)
}

// =============================================================================
// Request types
// =============================================================================

/// Request body for `POST /api/compliance/check`
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mode: Option<ComplianceMode>,
    #[serde(default)]
    pub llm_config: Option<LlmOverride>,
}

/// Request body for `POST /api/compliance/batch`
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub contents: Vec<String>,
    #[serde(default)]
    pub mode: Option<ComplianceMode>,
    #[serde(default)]
    pub llm_config: Option<LlmOverride>,
}

/// Request body for `POST /api/scaninfo`
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub scan_mode: Option<ScanMode>,
    #[serde(default)]
    pub llm_config: Option<LlmOverride>,
}

// =============================================================================
// Handlers
// =============================================================================

async fn check(
    State(service): State<ScreeningService>,
    payload: std::result::Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<ComplianceResult>> {
    let Json(request) = payload?;
    let result = service
        .check_compliance(
            &request.content,
            request.mode.unwrap_or_default(),
            request.llm_config.as_ref(),
        )
        .await?;
    Ok(Json(result))
}

async fn check_batch(
    State(service): State<ScreeningService>,
    payload: std::result::Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchComplianceResult>> {
    let Json(request) = payload?;
    if request.contents.is_empty() {
        return Err(Error::Validation("内容列表不能为空".to_string()));
    }

    let report = service
        .check_batch(
            &request.contents,
            request.mode.unwrap_or_default(),
            request.llm_config.as_ref(),
        )
        .await;
    Ok(Json(report))
}

async fn scan_info(
    State(service): State<ScreeningService>,
    payload: std::result::Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ScanResult>> {
    let Json(request) = payload?;
    let result = service
        .scan_personal_info(
            &request.content,
            request.scan_mode.unwrap_or_default(),
            request.llm_config.as_ref(),
        )
        .await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::service::tests::{remote_fail, service_with, FakeClassifier};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn make_app() -> (Router, Arc<FakeClassifier>) {
        let fake = Arc::new(FakeClassifier::with_verdict(remote_fail()));
        (screening_router(service_with(fake.clone())), fake)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_check_loose_hit() {
        let (app, fake) = make_app();
        let resp = app
            .oneshot(post_json(
                "/api/compliance/check",
                r#"{"content":"这是敏感词测试","mode":"loose"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["result"], "FAIL");
        assert_eq!(json["risk_level"], "HIGH");
        assert_eq!(json["risk_categories"], "敏感词汇");
        assert_eq!(json["detail"], "内容包含敏感词: 敏感词");
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_check_defaults_to_moderate() {
        let (app, fake) = make_app();
        let resp = app
            .oneshot(post_json("/api/compliance/check", r#"{"content":"赌博"}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["detail"], "模型判定违规");
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_check_empty_content() {
        let (app, _) = make_app();
        let resp = app
            .oneshot(post_json("/api/compliance/check", r#"{"mode":"strict"}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "内容不能为空");
    }

    #[tokio::test]
    async fn test_batch() {
        let (app, _) = make_app();
        let resp = app
            .oneshot(post_json(
                "/api/compliance/batch",
                r#"{"contents":["正常内容","","涉及赌博"],"mode":"loose"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["total"], 3);
        assert_eq!(json["passed_count"], 1);
        assert_eq!(json["failed_count"], 1);
        assert_eq!(json["unchecked_count"], 1);
        assert_eq!(json["items"][1]["error"], "内容不能为空");
    }

    #[tokio::test]
    async fn test_malformed_body_gets_json_error() {
        let (app, fake) = make_app();
        let resp = app
            .oneshot(post_json("/api/compliance/check", r#"{"content":"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(!json["error"].as_str().unwrap().is_empty());
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_batch_empty_list() {
        let (app, _) = make_app();
        let resp = app
            .oneshot(post_json("/api/compliance/batch", r#"{"contents":[]}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_scaninfo_rules() {
        let (app, _) = make_app();
        let resp = app
            .oneshot(post_json(
                "/api/scaninfo",
                r#"{"content":"身份证11010519491231002X 手机13800138000"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["id_cards_found"], 1);
        assert_eq!(json["phones_found"], 1);
        assert_eq!(json["has_sensitive_info"], true);
        assert_eq!(json["id_cards"][0], "11010519491231002X");
        assert_eq!(json["scan_methods"][0], "rules");
    }

    #[tokio::test]
    async fn test_scaninfo_empty_content() {
        let (app, _) = make_app();
        let resp = app
            .oneshot(post_json("/api/scaninfo", r#"{"content":"","scan_mode":"both"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
