//! Knowledge base and document HTTP API

pub mod documents;
pub mod knowledge_bases;
pub mod upload_policy;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use super::state::AppState;

pub use upload_policy::UploadPolicy;

/// Routes nested under `/api/knowledge`
pub fn create_knowledge_router(upload_body_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/bases",
            get(knowledge_bases::list_knowledge_bases).post(knowledge_bases::create_knowledge_base),
        )
        .route(
            "/bases/{kb_id}",
            get(knowledge_bases::get_knowledge_base)
                .put(knowledge_bases::update_knowledge_base)
                .delete(knowledge_bases::delete_knowledge_base),
        )
        .route(
            "/bases/{kb_id}/status",
            put(knowledge_bases::set_knowledge_base_status),
        )
        .route(
            "/bases/{kb_id}/documents/upload",
            post(documents::upload_document).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/bases/{kb_id}/documents", get(documents::list_documents))
        .route(
            "/documents/{doc_id}",
            get(documents::get_document).delete(documents::delete_document),
        )
        .route(
            "/documents/{doc_id}/process",
            post(documents::process_document),
        )
        .route(
            "/documents/{doc_id}/status",
            put(documents::update_document_status),
        )
        .route("/documents/{doc_id}/chunks", get(documents::list_chunks))
}
