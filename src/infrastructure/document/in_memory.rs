//! In-memory document repository

use async_trait::async_trait;

use crate::domain::{
    Document, DocumentId, DocumentRepository, DocumentStatus, DomainError, KnowledgeBaseId,
};
use crate::infrastructure::storage::InMemoryDatabase;

/// In-memory implementation of DocumentRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    db: InMemoryDatabase,
}

impl InMemoryDocumentRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        Ok(self.db.read().await.documents.get(id).cloned())
    }

    async fn list_by_knowledge_base(
        &self,
        kb_id: &KnowledgeBaseId,
    ) -> Result<Vec<Document>, DomainError> {
        let tables = self.db.read().await;

        let mut documents: Vec<Document> = tables
            .documents
            .values()
            .filter(|doc| doc.knowledge_base_id() == *kb_id)
            .cloned()
            .collect();

        documents.sort_by_key(|doc| doc.created_at());

        Ok(documents)
    }

    async fn create(&self, document: Document) -> Result<Document, DomainError> {
        let mut tables = self.db.write().await;

        if tables.documents.contains_key(&document.id()) {
            return Err(DomainError::conflict(format!(
                "Document '{}' already exists",
                document.id()
            )));
        }

        let Some(kb) = tables.knowledge_bases.get_mut(&document.knowledge_base_id()) else {
            return Err(DomainError::not_found(format!(
                "Knowledge base '{}' not found",
                document.knowledge_base_id()
            )));
        };

        kb.record_document_added(document.file_size());
        kb.touch();

        tables.documents.insert(document.id(), document.clone());

        Ok(document)
    }

    async fn update_status(
        &self,
        document: &Document,
        expected: DocumentStatus,
    ) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;

        match tables.documents.get_mut(&document.id()) {
            Some(stored) if stored.status() == expected => {
                *stored = document.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;

        let Some(document) = tables.delete_document_cascade(id) else {
            return Ok(false);
        };

        if let Some(kb) = tables.knowledge_bases.get_mut(&document.knowledge_base_id()) {
            kb.record_document_removed(document.file_size());
            kb.touch();
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentChunk, KnowledgeBase};

    async fn setup() -> (InMemoryDatabase, InMemoryDocumentRepository, KnowledgeBaseId) {
        let db = InMemoryDatabase::new();
        let kb = KnowledgeBase::new("Docs", "admin");
        let kb_id = kb.id();
        db.write().await.knowledge_bases.insert(kb_id, kb);
        (db.clone(), InMemoryDocumentRepository::new(db), kb_id)
    }

    fn document(kb_id: KnowledgeBaseId, size: i64) -> Document {
        let id = DocumentId::generate();
        Document::new(id, kb_id, "notes.md", format!("{}.md", id), size, ".md")
    }

    #[tokio::test]
    async fn test_create_bumps_counters() {
        let (db, repo, kb_id) = setup().await;

        repo.create(document(kb_id, 5)).await.unwrap();
        repo.create(document(kb_id, 7)).await.unwrap();

        let tables = db.read().await;
        let kb = tables.knowledge_bases.get(&kb_id).unwrap();
        assert_eq!(kb.document_count(), 2);
        assert_eq!(kb.total_size(), 12);
    }

    #[tokio::test]
    async fn test_create_into_missing_knowledge_base() {
        let (db, repo, _) = setup().await;

        let result = repo.create(document(KnowledgeBaseId::generate(), 5)).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(db.read().await.documents.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_knowledge_base() {
        let (db, repo, kb_id) = setup().await;
        let other = KnowledgeBase::new("Other", "admin");
        let other_id = other.id();
        db.write().await.knowledge_bases.insert(other_id, other);

        let first = repo.create(document(kb_id, 1)).await.unwrap();
        repo.create(document(other_id, 1)).await.unwrap();

        let listed = repo.list_by_knowledge_base(&kb_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), first.id());
    }

    #[tokio::test]
    async fn test_update_status_compare_and_set() {
        let (_, repo, kb_id) = setup().await;
        let doc = repo.create(document(kb_id, 1)).await.unwrap();

        let mut parsing = doc.clone();
        parsing.transition_to(DocumentStatus::Parsing, None).unwrap();
        assert!(repo.update_status(&parsing, DocumentStatus::Uploaded).await.unwrap());

        // A second writer that still believes the document is uploaded loses
        let mut failed = doc.clone();
        failed.transition_to(DocumentStatus::Failed, None).unwrap();
        assert!(!repo.update_status(&failed, DocumentStatus::Uploaded).await.unwrap());

        let stored = repo.get(&doc.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::Parsing);
    }

    #[tokio::test]
    async fn test_update_status_missing_document() {
        let (_, repo, kb_id) = setup().await;
        let doc = document(kb_id, 1);
        assert!(!repo.update_status(&doc, DocumentStatus::Uploaded).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_decrements_counters_and_cascades_chunks() {
        let (db, repo, kb_id) = setup().await;
        let doc = repo.create(document(kb_id, 5)).await.unwrap();
        let chunk = DocumentChunk::new(doc.id(), 0, "hello");
        db.write().await.chunks.insert(chunk.id, chunk);

        assert!(repo.delete(&doc.id()).await.unwrap());
        assert!(!repo.delete(&doc.id()).await.unwrap());

        let tables = db.read().await;
        let kb = tables.knowledge_bases.get(&kb_id).unwrap();
        assert_eq!(kb.document_count(), 0);
        assert_eq!(kb.total_size(), 0);
        assert!(tables.chunks.is_empty());
    }
}
