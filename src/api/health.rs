//! Health, readiness and liveness probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use crate::api::types::Json;
use crate::domain::KnowledgeBaseStatus;

use super::state::AppState;

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of probing one dependency
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

impl HealthResponse {
    fn new(status: HealthStatus, checks: Option<Vec<HealthCheck>>) -> Self {
        Self {
            status,
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::new(HealthStatus::Healthy, None)))
}

/// GET /ready
/// Fails with 503 while the knowledge base store cannot be queried
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let check = check_knowledge_base_store(&state).await;
    let status = check.status;

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(HealthResponse::new(status, Some(vec![check]))))
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_knowledge_base_store(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let result = state
        .knowledge_base_service
        .list(Some(KnowledgeBaseStatus::Active))
        .await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheck {
            name: "knowledge_base_store",
            status: HealthStatus::Healthy,
            message: None,
            latency_ms,
        },
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            HealthCheck {
                name: "knowledge_base_store",
                status: HealthStatus::Unhealthy,
                message: Some("Knowledge base store unavailable".to_string()),
                latency_ms,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::knowledge::UploadPolicy;
    use crate::api::state::{MockDocumentServiceTrait, MockKnowledgeBaseServiceTrait};
    use crate::domain::DomainError;
    use crate::infrastructure::identity::StaticOwnerResolver;

    fn state_with(kb_service: MockKnowledgeBaseServiceTrait) -> AppState {
        AppState::new(
            Arc::new(kb_service),
            Arc::new(MockDocumentServiceTrait::new()),
            Arc::new(StaticOwnerResolver::new("admin")),
            UploadPolicy::new([".txt"], 1024),
        )
    }

    #[test]
    fn test_health_response_serialization() {
        let json = serde_json::to_string(&HealthResponse::new(HealthStatus::Healthy, None)).unwrap();

        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"service\":\"kb-manager\""));
        assert!(!json.contains("checks"));
    }

    #[tokio::test]
    async fn test_ready_when_store_answers() {
        let mut kb_service = MockKnowledgeBaseServiceTrait::new();
        kb_service
            .expect_list()
            .withf(|status| *status == Some(KnowledgeBaseStatus::Active))
            .returning(|_| Ok(vec![]));

        let response = ready_check(State(state_with(kb_service))).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_when_store_fails() {
        let mut kb_service = MockKnowledgeBaseServiceTrait::new();
        kb_service
            .expect_list()
            .returning(|_| Err(DomainError::persistence("connection refused")));

        let response = ready_check(State(state_with(kb_service))).await.into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
