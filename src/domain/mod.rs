//! Domain layer - Core business logic and entities

pub mod chunk;
pub mod document;
pub mod error;
pub mod identity;
pub mod knowledge_base;

pub use chunk::{ChunkRepository, ChunkType, DocumentChunk};
pub use document::{
    validate_transition, Document, DocumentId, DocumentRepository, DocumentStatus,
    ProcessingDispatcher,
};
pub use error::DomainError;
pub use identity::OwnerResolver;
pub use knowledge_base::{
    validate_knowledge_base_name, KnowledgeBase, KnowledgeBaseDetails, KnowledgeBaseId,
    KnowledgeBaseRepository, KnowledgeBaseStatus, KnowledgeBaseValidationError, MAX_KB_NAME_LENGTH,
};

#[cfg(test)]
pub use chunk::MockChunkRepository;
#[cfg(test)]
pub use document::{MockDocumentRepository, MockProcessingDispatcher};
#[cfg(test)]
pub use knowledge_base::MockKnowledgeBaseRepository;
