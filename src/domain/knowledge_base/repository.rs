//! Knowledge base repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{KnowledgeBase, KnowledgeBaseId, KnowledgeBaseStatus};
use crate::domain::DomainError;

/// Name and description changes; `None` leaves a field as stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBaseDetails {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Repository for knowledge base records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnowledgeBaseRepository: Send + Sync {
    /// Get a knowledge base by ID
    async fn get(&self, id: &KnowledgeBaseId) -> Result<Option<KnowledgeBase>, DomainError>;

    /// List knowledge bases, newest first. `None` returns every status.
    async fn list(
        &self,
        status: Option<KnowledgeBaseStatus>,
    ) -> Result<Vec<KnowledgeBase>, DomainError>;

    /// Insert a new knowledge base
    async fn create(&self, kb: KnowledgeBase) -> Result<KnowledgeBase, DomainError>;

    /// Write only the given details and refresh `updated_at`; status and
    /// counters are left as stored. Returns `None` if the record does not exist.
    async fn update_details(
        &self,
        id: &KnowledgeBaseId,
        details: KnowledgeBaseDetails,
    ) -> Result<Option<KnowledgeBase>, DomainError>;

    /// Write only the status and refresh `updated_at`.
    /// Returns `None` if the record does not exist.
    async fn set_status(
        &self,
        id: &KnowledgeBaseId,
        status: KnowledgeBaseStatus,
    ) -> Result<Option<KnowledgeBase>, DomainError>;

    /// Delete the record; documents and chunks cascade. Returns `false` if absent.
    async fn delete(&self, id: &KnowledgeBaseId) -> Result<bool, DomainError>;
}
