//! Chunk repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::DocumentChunk;
use crate::domain::document::DocumentId;
use crate::domain::DomainError;

/// Repository for document chunks
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChunkRepository: Send + Sync {
    /// Insert a chunk. `(document_id, chunk_index)` is unique; a duplicate
    /// yields `Conflict` and a missing document yields `NotFound`.
    async fn create(&self, chunk: DocumentChunk) -> Result<DocumentChunk, DomainError>;

    /// Chunks of a document ordered by `chunk_index`
    async fn list_by_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<Vec<DocumentChunk>, DomainError>;
}
