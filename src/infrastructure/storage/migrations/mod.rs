//! Database schema migrations

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// Applies and reverts the schema
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations, returning how many were applied
    async fn run(&self) -> Result<usize, DomainError>;

    /// Reverts the latest applied migration, returning its version
    async fn revert(&self) -> Result<Option<i64>, DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// PostgreSQL migrator recording applied versions in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    migrations: Vec<Migration>,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            migrations: schema_migrations(),
        }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                success BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::persistence(format!("Failed to create migrations table: {}", e))
        })?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::persistence(format!("Failed to check migration status: {}", e))
            })
    }

    /// Applies one migration and records it, atomically. Returns `false` if
    /// it was already applied.
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::persistence(format!("Failed to begin transaction: {}", e))
        })?;

        sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(&migration.up))
            .await
            .map_err(|e| {
                DomainError::persistence(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::persistence(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit().await.map_err(|e| {
            DomainError::persistence(format!(
                "Failed to commit migration {}: {}",
                migration.version, e
            ))
        })?;

        info!(version = migration.version, description = %migration.description, "Applied migration");

        Ok(true)
    }

    /// Reverts one migration. Returns `false` if it was not applied.
    pub async fn revert_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if !self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::persistence(format!("Failed to begin transaction: {}", e))
        })?;

        sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(&migration.down))
            .await
            .map_err(|e| {
                DomainError::persistence(format!(
                    "Failed to revert migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::persistence(format!(
                    "Failed to remove migration record {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit().await.map_err(|e| {
            DomainError::persistence(format!(
                "Failed to commit revert of migration {}: {}",
                migration.version, e
            ))
        })?;

        info!(version = migration.version, "Reverted migration");

        Ok(true)
    }
}

#[async_trait]
impl Migrator for PostgresMigrator {
    async fn run(&self) -> Result<usize, DomainError> {
        let mut applied = 0;

        for migration in &self.migrations {
            if self.run_migration(migration).await? {
                applied += 1;
            }
        }

        Ok(applied)
    }

    async fn revert(&self) -> Result<Option<i64>, DomainError> {
        let Some(current) = self.version().await? else {
            return Ok(None);
        };

        let Some(migration) = self.migrations.iter().find(|m| m.version == current) else {
            return Err(DomainError::persistence(format!(
                "Applied migration {} is unknown to this build",
                current
            )));
        };

        self.revert_migration(migration).await?;

        Ok(Some(current))
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations WHERE success = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::persistence(format!("Failed to get migration version: {}", e))
            })
    }
}

/// A versioned schema change
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// Knowledge base schema, oldest first
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create knowledge_bases table",
            r#"
            CREATE TABLE IF NOT EXISTS knowledge_bases (
                id UUID PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                description TEXT,
                owner_id VARCHAR(36) NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'active'
                    CHECK (status IN ('active', 'inactive', 'archived')),
                document_count INTEGER NOT NULL DEFAULT 0 CHECK (document_count >= 0),
                total_size BIGINT NOT NULL DEFAULT 0 CHECK (total_size >= 0),
                settings JSONB NOT NULL DEFAULT '{}'::jsonb,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_knowledge_bases_status ON knowledge_bases(status);
            CREATE INDEX IF NOT EXISTS idx_knowledge_bases_created_at ON knowledge_bases(created_at DESC);
            "#,
            r#"
            DROP TABLE IF EXISTS knowledge_bases;
            "#,
        ),
        Migration::new(
            2,
            "Create documents table",
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id UUID PRIMARY KEY,
                knowledge_base_id UUID NOT NULL
                    REFERENCES knowledge_bases(id) ON DELETE CASCADE,
                title VARCHAR(200) NOT NULL,
                description TEXT,
                file_path TEXT NOT NULL,
                file_size BIGINT NOT NULL CHECK (file_size >= 0),
                doc_type VARCHAR(20) NOT NULL,
                mime_type VARCHAR(100),
                status VARCHAR(20) NOT NULL DEFAULT 'uploaded'
                    CHECK (status IN ('uploaded', 'parsing', 'vectorizing', 'indexing', 'completed', 'failed')),
                error_message TEXT,
                doc_metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                processed_at TIMESTAMPTZ
            );
            CREATE INDEX IF NOT EXISTS idx_documents_knowledge_base_id ON documents(knowledge_base_id);
            CREATE INDEX IF NOT EXISTS idx_documents_status ON documents(status);
            "#,
            r#"
            DROP TABLE IF EXISTS documents;
            "#,
        ),
        Migration::new(
            3,
            "Create document_chunks table",
            r#"
            CREATE TABLE IF NOT EXISTS document_chunks (
                id UUID PRIMARY KEY,
                document_id UUID NOT NULL
                    REFERENCES documents(id) ON DELETE CASCADE,
                content TEXT NOT NULL,
                chunk_index INTEGER NOT NULL CHECK (chunk_index >= 0),
                chunk_type VARCHAR(20) NOT NULL DEFAULT 'text'
                    CHECK (chunk_type IN ('text', 'table', 'image', 'code')),
                token_count INTEGER,
                vector_id VARCHAR(100),
                chunk_metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                UNIQUE (document_id, chunk_index)
            );
            "#,
            r#"
            DROP TABLE IF EXISTS document_chunks;
            "#,
        ),
    ]
}

/// Runs all pending schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    PostgresMigrator::new(pool.clone()).run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creation() {
        let migration = Migration::new(1, "Test migration", "CREATE TABLE test", "DROP TABLE test");

        assert_eq!(migration.version, 1);
        assert_eq!(migration.description, "Test migration");
        assert_eq!(migration.up, "CREATE TABLE test");
        assert_eq!(migration.down, "DROP TABLE test");
    }

    #[test]
    fn test_schema_migrations_order() {
        let migrations = schema_migrations();

        assert_eq!(migrations.len(), 3);

        for i in 1..migrations.len() {
            assert!(
                migrations[i].version > migrations[i - 1].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_child_tables_cascade() {
        let migrations = schema_migrations();

        assert!(migrations[1].up.contains("REFERENCES knowledge_bases(id) ON DELETE CASCADE"));
        assert!(migrations[2].up.contains("REFERENCES documents(id) ON DELETE CASCADE"));
        assert!(migrations[2].up.contains("UNIQUE (document_id, chunk_index)"));
    }
}
