//! In-memory chunk repository

use async_trait::async_trait;

use crate::domain::{ChunkRepository, DocumentChunk, DocumentId, DomainError};
use crate::infrastructure::storage::InMemoryDatabase;

/// In-memory implementation of ChunkRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryChunkRepository {
    db: InMemoryDatabase,
}

impl InMemoryChunkRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChunkRepository for InMemoryChunkRepository {
    async fn create(&self, chunk: DocumentChunk) -> Result<DocumentChunk, DomainError> {
        let mut tables = self.db.write().await;

        if !tables.documents.contains_key(&chunk.document_id) {
            return Err(DomainError::not_found(format!(
                "Document '{}' not found",
                chunk.document_id
            )));
        }

        let duplicate = tables.chunks.values().any(|existing| {
            existing.id == chunk.id
                || (existing.document_id == chunk.document_id
                    && existing.chunk_index == chunk.chunk_index)
        });

        if duplicate {
            return Err(DomainError::conflict(format!(
                "Chunk {} of document '{}' already exists",
                chunk.chunk_index, chunk.document_id
            )));
        }

        tables.chunks.insert(chunk.id, chunk.clone());
        Ok(chunk)
    }

    async fn list_by_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<Vec<DocumentChunk>, DomainError> {
        let tables = self.db.read().await;

        let mut chunks: Vec<DocumentChunk> = tables
            .chunks
            .values()
            .filter(|chunk| chunk.document_id == *document_id)
            .cloned()
            .collect();

        chunks.sort_by_key(|chunk| chunk.chunk_index);

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChunkType, Document, KnowledgeBase};

    async fn setup() -> (InMemoryChunkRepository, DocumentId) {
        let db = InMemoryDatabase::new();
        let kb = KnowledgeBase::new("Docs", "admin");
        let doc_id = DocumentId::generate();
        let doc = Document::new(doc_id, kb.id(), "a.txt", "a.txt", 1, ".txt");

        {
            let mut tables = db.write().await;
            tables.knowledge_bases.insert(kb.id(), kb);
            tables.documents.insert(doc_id, doc);
        }

        (InMemoryChunkRepository::new(db), doc_id)
    }

    #[tokio::test]
    async fn test_list_ordered_by_index() {
        let (repo, doc_id) = setup().await;

        for index in [2, 0, 1] {
            repo.create(DocumentChunk::new(doc_id, index, format!("part {}", index)))
                .await
                .unwrap();
        }

        let chunks = repo.list_by_document(&doc_id).await.unwrap();
        let indexes: Vec<i32> = chunks.iter().map(|c| c.chunk_index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_duplicate_index_rejected() {
        let (repo, doc_id) = setup().await;
        repo.create(DocumentChunk::new(doc_id, 0, "first")).await.unwrap();

        let result = repo
            .create(DocumentChunk::new(doc_id, 0, "again").with_type(ChunkType::Table))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_chunk_for_missing_document() {
        let (repo, _) = setup().await;
        let result = repo
            .create(DocumentChunk::new(DocumentId::generate(), 0, "orphan"))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
