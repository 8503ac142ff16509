//! Knowledge Base service - lifecycle of knowledge bases and their directories

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::{
    validate_knowledge_base_name, DomainError, KnowledgeBase, KnowledgeBaseDetails,
    KnowledgeBaseId, KnowledgeBaseRepository, KnowledgeBaseStatus,
};
use crate::infrastructure::filesystem::StoragePathManager;

use super::kb_locks::KnowledgeBaseLocks;

/// Request to create a new knowledge base
#[derive(Debug, Clone)]
pub struct CreateKnowledgeBaseRequest {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateKnowledgeBaseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Knowledge Base service
pub struct KnowledgeBaseService {
    repository: Arc<dyn KnowledgeBaseRepository>,
    paths: StoragePathManager,
    locks: KnowledgeBaseLocks,
}

impl std::fmt::Debug for KnowledgeBaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBaseService")
            .field("paths", &self.paths)
            .finish()
    }
}

impl KnowledgeBaseService {
    pub fn new(
        repository: Arc<dyn KnowledgeBaseRepository>,
        paths: StoragePathManager,
        locks: KnowledgeBaseLocks,
    ) -> Self {
        Self {
            repository,
            paths,
            locks,
        }
    }

    /// Create a knowledge base. Its directory tree is created before the
    /// record is inserted; if that fails nothing is persisted.
    pub async fn create(
        &self,
        request: CreateKnowledgeBaseRequest,
    ) -> Result<KnowledgeBase, DomainError> {
        validate_knowledge_base_name(&request.name)?;

        let kb = KnowledgeBase::new(request.name.trim(), request.owner_id)
            .with_description(request.description);
        let kb_id = kb.id();

        if let Err(e) = self.paths.ensure_knowledge_base_directory(&kb_id).await {
            error!(kb_id = %kb_id, error = %e, "Aborting knowledge base creation");
            return Err(e);
        }

        let kb = match self.repository.create(kb).await {
            Ok(kb) => kb,
            Err(e) => {
                error!(kb_id = %kb_id, error = %e, "Failed to persist knowledge base");
                self.remove_directory_best_effort(&kb_id).await;
                return Err(e);
            }
        };

        info!(kb_id = %kb_id, name = %kb.name(), owner_id = %kb.owner_id(), "Knowledge base created");

        Ok(kb)
    }

    /// List knowledge bases, newest first. Without a filter archived ones are hidden.
    pub async fn list(
        &self,
        status: Option<KnowledgeBaseStatus>,
    ) -> Result<Vec<KnowledgeBase>, DomainError> {
        let kbs = self.repository.list(status).await?;

        Ok(match status {
            Some(_) => kbs,
            None => kbs
                .into_iter()
                .filter(|kb| kb.status().is_listed_by_default())
                .collect(),
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<KnowledgeBase>, DomainError> {
        let kb_id = KnowledgeBaseId::parse(id)?;
        self.repository.get(&kb_id).await
    }

    pub async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }

    /// Apply a partial update of name and description. `updated_at` is
    /// refreshed even when nothing changed; status is never written.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateKnowledgeBaseRequest,
    ) -> Result<Option<KnowledgeBase>, DomainError> {
        let kb_id = KnowledgeBaseId::parse(id)?;

        if let Some(name) = &request.name {
            validate_knowledge_base_name(name)?;
        }

        let details = KnowledgeBaseDetails {
            name: request.name.map(|name| name.trim().to_string()),
            description: request.description,
        };

        let updated = self.repository.update_details(&kb_id, details).await?;

        if updated.is_some() {
            info!(kb_id = %kb_id, "Knowledge base updated");
        }

        Ok(updated)
    }

    /// Switch a knowledge base between active, inactive and archived
    pub async fn set_status(
        &self,
        id: &str,
        status: KnowledgeBaseStatus,
    ) -> Result<Option<KnowledgeBase>, DomainError> {
        let kb_id = KnowledgeBaseId::parse(id)?;

        let updated = self.repository.set_status(&kb_id, status).await?;

        if updated.is_some() {
            info!(kb_id = %kb_id, status = %status, "Knowledge base status changed");
        }

        Ok(updated)
    }

    /// Soft delete archives the record. Hard delete removes the directory tree
    /// (best effort) and then the record, which cascades to documents and chunks.
    ///
    /// Returns `false` if the knowledge base does not exist.
    pub async fn delete(&self, id: &str, hard: bool) -> Result<bool, DomainError> {
        let kb_id = KnowledgeBaseId::parse(id)?;

        if !hard {
            let archived = self
                .repository
                .set_status(&kb_id, KnowledgeBaseStatus::Archived)
                .await?
                .is_some();

            if archived {
                info!(kb_id = %kb_id, "Knowledge base archived");
            }

            return Ok(archived);
        }

        let _guard = self.locks.write(&kb_id).await;

        if self.repository.get(&kb_id).await?.is_none() {
            return Ok(false);
        }

        self.remove_directory_best_effort(&kb_id).await;

        let deleted = self.repository.delete(&kb_id).await.inspect_err(|e| {
            error!(kb_id = %kb_id, error = %e, "Failed to delete knowledge base record");
        })?;

        if deleted {
            info!(kb_id = %kb_id, "Knowledge base purged");
        }

        Ok(deleted)
    }

    async fn remove_directory_best_effort(&self, kb_id: &KnowledgeBaseId) {
        if let Err(e) = self.paths.remove_knowledge_base_directory(kb_id).await {
            warn!(kb_id = %kb_id, error = %e, "Failed to remove knowledge base directory");
        }
    }
}
