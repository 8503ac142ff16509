//! HTTP request and response types

pub mod error;
pub mod json;
pub mod knowledge;

pub use error::{ApiError, ApiErrorResponse};
pub use json::{Json, ValidatedJson};
pub use knowledge::{
    ChunkResponse, CreateKnowledgeBaseBody, DeleteKnowledgeBaseQuery, DocumentResponse,
    KnowledgeBaseResponse, ListKnowledgeBasesQuery, MessageResponse, SetKnowledgeBaseStatusBody,
    UpdateDocumentStatusBody, UpdateKnowledgeBaseBody,
};
