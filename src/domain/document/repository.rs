//! Document repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{Document, DocumentId};
use super::status::DocumentStatus;
use crate::domain::knowledge_base::KnowledgeBaseId;
use crate::domain::DomainError;

/// Repository for document records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Get a document by ID
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, DomainError>;

    /// List the documents of a knowledge base, oldest first
    async fn list_by_knowledge_base(
        &self,
        kb_id: &KnowledgeBaseId,
    ) -> Result<Vec<Document>, DomainError>;

    /// Insert a document and add it to its knowledge base's counters in one
    /// transaction. Fails with `NotFound` if the knowledge base is gone.
    async fn create(&self, document: Document) -> Result<Document, DomainError>;

    /// Persist the processing state of `document` only if the stored status
    /// still equals `expected`. Returns `false` if the document is missing
    /// or its status has moved on.
    async fn update_status(
        &self,
        document: &Document,
        expected: DocumentStatus,
    ) -> Result<bool, DomainError>;

    /// Delete a document and subtract it from its knowledge base's counters.
    /// Chunks cascade.
    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError>;
}
