//! Infrastructure services

mod document_service;
mod kb_locks;
mod knowledge_base_service;
mod processing;

pub use document_service::{
    DocumentService, DocumentServiceDeps, UploadDocumentRequest, MAX_DOCUMENT_TITLE_LENGTH,
};
pub use kb_locks::KnowledgeBaseLocks;
pub use knowledge_base_service::{
    CreateKnowledgeBaseRequest, KnowledgeBaseService, UpdateKnowledgeBaseRequest,
};
pub use processing::LoggingProcessingDispatcher;
