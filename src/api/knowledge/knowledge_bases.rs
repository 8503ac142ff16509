//! Knowledge base endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CreateKnowledgeBaseBody, DeleteKnowledgeBaseQuery, Json, KnowledgeBaseResponse,
    ListKnowledgeBasesQuery, MessageResponse, SetKnowledgeBaseStatusBody, UpdateKnowledgeBaseBody,
    ValidatedJson,
};
use crate::infrastructure::services::{CreateKnowledgeBaseRequest, UpdateKnowledgeBaseRequest};

fn kb_not_found(kb_id: &str) -> ApiError {
    ApiError::not_found(format!("Knowledge base '{}' not found", kb_id))
}

/// POST /api/knowledge/bases
pub async fn create_knowledge_base(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateKnowledgeBaseBody>,
) -> Result<(StatusCode, Json<KnowledgeBaseResponse>), ApiError> {
    debug!(name = %body.name, "Creating knowledge base");

    let request = CreateKnowledgeBaseRequest {
        name: body.name,
        description: body.description,
        owner_id: state.owner_resolver.owner_id(),
    };

    let kb = state.knowledge_base_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(KnowledgeBaseResponse::from(&kb))))
}

/// GET /api/knowledge/bases
/// Archived knowledge bases are only listed when asked for by status
pub async fn list_knowledge_bases(
    State(state): State<AppState>,
    Query(query): Query<ListKnowledgeBasesQuery>,
) -> Result<Json<Vec<KnowledgeBaseResponse>>, ApiError> {
    debug!(status = ?query.status, "Listing knowledge bases");

    let kbs = state.knowledge_base_service.list(query.status).await?;

    Ok(Json(kbs.iter().map(KnowledgeBaseResponse::from).collect()))
}

/// GET /api/knowledge/bases/{kb_id}
pub async fn get_knowledge_base(
    State(state): State<AppState>,
    Path(kb_id): Path<String>,
) -> Result<Json<KnowledgeBaseResponse>, ApiError> {
    debug!(kb_id = %kb_id, "Getting knowledge base");

    let kb = state
        .knowledge_base_service
        .get(&kb_id)
        .await?
        .ok_or_else(|| kb_not_found(&kb_id))?;

    Ok(Json(KnowledgeBaseResponse::from(&kb)))
}

/// PUT /api/knowledge/bases/{kb_id}
pub async fn update_knowledge_base(
    State(state): State<AppState>,
    Path(kb_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateKnowledgeBaseBody>,
) -> Result<Json<KnowledgeBaseResponse>, ApiError> {
    debug!(kb_id = %kb_id, "Updating knowledge base");

    let request = UpdateKnowledgeBaseRequest {
        name: body.name,
        description: body.description,
    };

    let kb = state
        .knowledge_base_service
        .update(&kb_id, request)
        .await?
        .ok_or_else(|| kb_not_found(&kb_id))?;

    Ok(Json(KnowledgeBaseResponse::from(&kb)))
}

/// PUT /api/knowledge/bases/{kb_id}/status
pub async fn set_knowledge_base_status(
    State(state): State<AppState>,
    Path(kb_id): Path<String>,
    Json(body): Json<SetKnowledgeBaseStatusBody>,
) -> Result<Json<KnowledgeBaseResponse>, ApiError> {
    debug!(kb_id = %kb_id, status = %body.status, "Setting knowledge base status");

    let kb = state
        .knowledge_base_service
        .set_status(&kb_id, body.status)
        .await?
        .ok_or_else(|| kb_not_found(&kb_id))?;

    Ok(Json(KnowledgeBaseResponse::from(&kb)))
}

/// DELETE /api/knowledge/bases/{kb_id}?hard_delete=bool
pub async fn delete_knowledge_base(
    State(state): State<AppState>,
    Path(kb_id): Path<String>,
    Query(query): Query<DeleteKnowledgeBaseQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(kb_id = %kb_id, hard = query.hard_delete, "Deleting knowledge base");

    if !state
        .knowledge_base_service
        .delete(&kb_id, query.hard_delete)
        .await?
    {
        return Err(kb_not_found(&kb_id));
    }

    let message = if query.hard_delete {
        "Knowledge base deleted"
    } else {
        "Knowledge base archived"
    };

    Ok(Json(MessageResponse::new(message)))
}
