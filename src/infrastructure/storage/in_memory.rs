//! In-memory relational tables shared by the in-memory repositories
//!
//! One lock guards all three tables so that multi-table writes (document insert
//! plus counter update, cascading deletes) are atomic, the way a transaction
//! makes them atomic in PostgreSQL.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::domain::{Document, DocumentChunk, DocumentId, KnowledgeBase, KnowledgeBaseId};

/// Rows of the three tables
#[derive(Debug, Default)]
pub struct Tables {
    pub knowledge_bases: HashMap<KnowledgeBaseId, KnowledgeBase>,
    pub documents: HashMap<DocumentId, Document>,
    pub chunks: HashMap<Uuid, DocumentChunk>,
}

impl Tables {
    /// Remove a document and its chunks, returning the removed row
    pub fn delete_document_cascade(&mut self, id: &DocumentId) -> Option<Document> {
        let document = self.documents.remove(id)?;
        self.chunks.retain(|_, chunk| chunk.document_id != *id);
        Some(document)
    }

    /// Remove a knowledge base with its documents and their chunks
    pub fn delete_knowledge_base_cascade(&mut self, id: &KnowledgeBaseId) -> bool {
        if self.knowledge_bases.remove(id).is_none() {
            return false;
        }

        let document_ids: Vec<DocumentId> = self
            .documents
            .values()
            .filter(|doc| doc.knowledge_base_id() == *id)
            .map(|doc| doc.id())
            .collect();

        for document_id in document_ids {
            self.delete_document_cascade(&document_id);
        }

        true
    }
}

/// Handle to the shared tables; clones see the same data
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}
