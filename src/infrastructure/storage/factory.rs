//! Runtime selection of the persistence backend

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::domain::{ChunkRepository, DocumentRepository, DomainError, KnowledgeBaseRepository};
use crate::infrastructure::chunk::{InMemoryChunkRepository, PostgresChunkRepository};
use crate::infrastructure::document::{InMemoryDocumentRepository, PostgresDocumentRepository};
use crate::infrastructure::knowledge_base::{
    InMemoryKnowledgeBaseRepository, PostgresKnowledgeBaseRepository,
};

use super::in_memory::InMemoryDatabase;
use super::migrations::run_migrations;
use super::postgres::{connect_pool, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// The three repositories, viewing the same backend
#[derive(Clone)]
pub struct Repositories {
    pub knowledge_bases: Arc<dyn KnowledgeBaseRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub chunks: Arc<dyn ChunkRepository>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

impl Repositories {
    /// Repositories over a fresh in-memory table set
    pub fn in_memory() -> Self {
        Self::over_in_memory(InMemoryDatabase::new())
    }

    /// Repositories over an existing in-memory table set
    pub fn over_in_memory(db: InMemoryDatabase) -> Self {
        Self {
            knowledge_bases: Arc::new(InMemoryKnowledgeBaseRepository::new(db.clone())),
            documents: Arc::new(InMemoryDocumentRepository::new(db.clone())),
            chunks: Arc::new(InMemoryChunkRepository::new(db)),
        }
    }

    /// Repositories over a PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            knowledge_bases: Arc::new(PostgresKnowledgeBaseRepository::new(pool.clone())),
            documents: Arc::new(PostgresDocumentRepository::new(pool.clone())),
            chunks: Arc::new(PostgresChunkRepository::new(pool)),
        }
    }
}

/// Factory for creating repositories
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Build the repositories for `config`. PostgreSQL schemas are migrated first.
    pub async fn create(config: &StorageConfig) -> Result<Repositories, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Repositories::in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = connect_pool(pg_config).await?;
                let applied = run_migrations(&pool).await?;
                info!(applied, "Using PostgreSQL storage");
                Ok(Repositories::postgres(pool))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KnowledgeBase;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("sqlite"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);
        assert_eq!(
            StorageConfig::postgres(PostgresConfig::new("postgres://localhost/test")).storage_type(),
            StorageType::Postgres
        );
    }

    #[tokio::test]
    async fn test_in_memory_repositories_share_tables() {
        let repos = StorageFactory::create(&StorageConfig::in_memory()).await.unwrap();
        let kb = KnowledgeBase::new("Docs", "admin");
        repos.knowledge_bases.create(kb.clone()).await.unwrap();

        let doc_id = crate::domain::DocumentId::generate();
        let doc = crate::domain::Document::new(doc_id, kb.id(), "a.txt", "a.txt", 3, ".txt");
        repos.documents.create(doc).await.unwrap();

        let kb = repos.knowledge_bases.get(&kb.id()).await.unwrap().unwrap();
        assert_eq!(kb.document_count(), 1);
        assert_eq!(kb.total_size(), 3);
    }
}
