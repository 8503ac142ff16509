use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::health;
use super::knowledge;
use super::state::AppState;
use super::types::{Json, MessageResponse};

/// GET /
async fn banner() -> Json<MessageResponse> {
    Json(MessageResponse::new("Knowledge base service is running"))
}

/// Build the CORS layer. An empty origin list allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState, allowed_origins: &[String]) -> Router {
    let upload_body_limit = state.upload_policy.body_limit();

    Router::new()
        .route("/", get(banner))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest(
            "/api/knowledge",
            knowledge::create_knowledge_router(upload_body_limit),
        )
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
