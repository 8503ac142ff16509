//! Document endpoints

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use bytes::Bytes;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, ChunkResponse, DocumentResponse, Json, MessageResponse, UpdateDocumentStatusBody,
};
use crate::infrastructure::services::UploadDocumentRequest;

use super::upload_policy::multipart_error;

fn document_not_found(doc_id: &str) -> ApiError {
    ApiError::not_found(format!("Document '{}' not found", doc_id))
}

/// Fields collected from the upload form
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(Option<String>, Option<String>, Bytes)>,
    title: Option<String>,
    description: Option<String>,
}

/// POST /api/knowledge/bases/{kb_id}/documents/upload
///
/// Multipart fields: `file` (required), `title`, `description`.
/// The extension and size checks run here; the service stores whatever it is given.
pub async fn upload_document(
    State(state): State<AppState>,
    Path(kb_id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>), ApiError> {
    debug!(kb_id = %kb_id, "Uploading document");

    if !state.knowledge_base_service.exists(&kb_id).await? {
        return Err(ApiError::not_found(format!(
            "Knowledge base '{}' not found",
            kb_id
        )));
    }

    let policy = &state.upload_policy;
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some("file") => {
                if form.file.is_some() {
                    return Err(ApiError::bad_request("Only one file may be uploaded per request")
                        .with_param("file")
                        .with_code("multiple_files"));
                }

                let filename = field.file_name().map(str::to_string);
                policy.check_filename(filename.as_deref())?;

                let content_type = field.content_type().map(str::to_string);
                let content = policy.read_field(field).await?;
                form.file = Some((filename, content_type, content));
            }
            Some("title") => {
                form.title = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("description") => {
                form.description = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let Some((filename, content_type, content)) = form.file else {
        return Err(ApiError::bad_request("No file provided").with_param("file"));
    };

    let request = UploadDocumentRequest {
        kb_id,
        filename,
        content_type,
        title: form.title.filter(|title| !title.trim().is_empty()),
        description: form.description,
        content,
    };

    let document = state.document_service.upload(request).await?;

    Ok((StatusCode::CREATED, Json(DocumentResponse::from(&document))))
}

/// GET /api/knowledge/bases/{kb_id}/documents
pub async fn list_documents(
    State(state): State<AppState>,
    Path(kb_id): Path<String>,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    debug!(kb_id = %kb_id, "Listing documents");

    let documents = state.document_service.list_by_knowledge_base(&kb_id).await?;

    Ok(Json(documents.iter().map(DocumentResponse::from).collect()))
}

/// GET /api/knowledge/documents/{doc_id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    debug!(doc_id = %doc_id, "Getting document");

    let document = state
        .document_service
        .get(&doc_id)
        .await?
        .ok_or_else(|| document_not_found(&doc_id))?;

    Ok(Json(DocumentResponse::from(&document)))
}

/// DELETE /api/knowledge/documents/{doc_id}
pub async fn delete_document(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(doc_id = %doc_id, "Deleting document");

    if !state.document_service.delete(&doc_id).await? {
        return Err(document_not_found(&doc_id));
    }

    Ok(Json(MessageResponse::new("Document deleted")))
}

/// POST /api/knowledge/documents/{doc_id}/process
pub async fn process_document(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    debug!(doc_id = %doc_id, "Starting document processing");

    if state.document_service.process(&doc_id).await? {
        return Ok((
            StatusCode::ACCEPTED,
            Json(MessageResponse::new("Document processing started")),
        ));
    }

    // Tell a missing document apart from one that already left `uploaded`
    match state.document_service.get(&doc_id).await? {
        None => Err(document_not_found(&doc_id)),
        Some(document) => Err(ApiError::conflict(format!(
            "Document '{}' is {}, only uploaded documents can be processed",
            doc_id,
            document.status()
        ))
        .with_code("invalid_document_status")),
    }
}

/// PUT /api/knowledge/documents/{doc_id}/status
pub async fn update_document_status(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    Json(body): Json<UpdateDocumentStatusBody>,
) -> Result<Json<DocumentResponse>, ApiError> {
    debug!(doc_id = %doc_id, status = %body.status, "Updating document status");

    let document = state
        .document_service
        .update_status(&doc_id, body.status, body.error_message)
        .await?
        .ok_or_else(|| document_not_found(&doc_id))?;

    Ok(Json(DocumentResponse::from(&document)))
}

/// GET /api/knowledge/documents/{doc_id}/chunks
pub async fn list_chunks(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<Vec<ChunkResponse>>, ApiError> {
    debug!(doc_id = %doc_id, "Listing document chunks");

    let chunks = state
        .document_service
        .chunks(&doc_id)
        .await?
        .ok_or_else(|| document_not_found(&doc_id))?;

    Ok(Json(chunks.iter().map(ChunkResponse::from).collect()))
}
