//! In-memory knowledge base repository

use async_trait::async_trait;

use crate::domain::{
    DomainError, KnowledgeBase, KnowledgeBaseDetails, KnowledgeBaseId, KnowledgeBaseRepository,
    KnowledgeBaseStatus,
};
use crate::infrastructure::storage::InMemoryDatabase;

/// In-memory implementation of KnowledgeBaseRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeBaseRepository {
    db: InMemoryDatabase,
}

impl InMemoryKnowledgeBaseRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KnowledgeBaseRepository for InMemoryKnowledgeBaseRepository {
    async fn get(&self, id: &KnowledgeBaseId) -> Result<Option<KnowledgeBase>, DomainError> {
        Ok(self.db.read().await.knowledge_bases.get(id).cloned())
    }

    async fn list(
        &self,
        status: Option<KnowledgeBaseStatus>,
    ) -> Result<Vec<KnowledgeBase>, DomainError> {
        let tables = self.db.read().await;

        let mut kbs: Vec<KnowledgeBase> = tables
            .knowledge_bases
            .values()
            .filter(|kb| status.is_none_or(|s| kb.status() == s))
            .cloned()
            .collect();

        kbs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(kbs)
    }

    async fn create(&self, kb: KnowledgeBase) -> Result<KnowledgeBase, DomainError> {
        let mut tables = self.db.write().await;

        if tables.knowledge_bases.contains_key(&kb.id()) {
            return Err(DomainError::conflict(format!(
                "Knowledge base '{}' already exists",
                kb.id()
            )));
        }

        tables.knowledge_bases.insert(kb.id(), kb.clone());
        Ok(kb)
    }

    async fn update_details(
        &self,
        id: &KnowledgeBaseId,
        details: KnowledgeBaseDetails,
    ) -> Result<Option<KnowledgeBase>, DomainError> {
        let mut tables = self.db.write().await;

        let Some(stored) = tables.knowledge_bases.get_mut(id) else {
            return Ok(None);
        };

        if let Some(name) = details.name {
            stored.set_name(name);
        }

        if let Some(description) = details.description {
            stored.set_description(Some(description));
        }

        stored.touch();

        Ok(Some(stored.clone()))
    }

    async fn set_status(
        &self,
        id: &KnowledgeBaseId,
        status: KnowledgeBaseStatus,
    ) -> Result<Option<KnowledgeBase>, DomainError> {
        let mut tables = self.db.write().await;

        Ok(tables.knowledge_bases.get_mut(id).map(|stored| {
            stored.set_status(status);
            stored.clone()
        }))
    }

    async fn delete(&self, id: &KnowledgeBaseId) -> Result<bool, DomainError> {
        Ok(self.db.write().await.delete_knowledge_base_cascade(id))
    }
}
