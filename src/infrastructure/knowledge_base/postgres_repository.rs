//! PostgreSQL knowledge base repository

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{
    DomainError, KnowledgeBase, KnowledgeBaseDetails, KnowledgeBaseId, KnowledgeBaseRepository,
    KnowledgeBaseStatus,
};

const SELECT_COLUMNS: &str = "id, name, description, owner_id, status, document_count, \
     total_size, settings, created_at, updated_at";

/// PostgreSQL implementation of KnowledgeBaseRepository
#[derive(Debug, Clone)]
pub struct PostgresKnowledgeBaseRepository {
    pool: PgPool,
}

impl PostgresKnowledgeBaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KnowledgeBaseRepository for PostgresKnowledgeBaseRepository {
    async fn get(&self, id: &KnowledgeBaseId) -> Result<Option<KnowledgeBase>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM knowledge_bases WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to get knowledge base: {}", e)))?;

        row.as_ref().map(row_to_knowledge_base).transpose()
    }

    async fn list(
        &self,
        status: Option<KnowledgeBaseStatus>,
    ) -> Result<Vec<KnowledgeBase>, DomainError> {
        let rows = match status {
            Some(s) => {
                sqlx::query(&format!(
                    "SELECT {} FROM knowledge_bases WHERE status = $1 ORDER BY created_at DESC",
                    SELECT_COLUMNS
                ))
                .bind(s.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM knowledge_bases ORDER BY created_at DESC",
                    SELECT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::persistence(format!("Failed to list knowledge bases: {}", e)))?;

        rows.iter().map(row_to_knowledge_base).collect()
    }

    async fn create(&self, kb: KnowledgeBase) -> Result<KnowledgeBase, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO knowledge_bases (id, name, description, owner_id, status,
                                         document_count, total_size, settings,
                                         created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(kb.id().as_uuid())
        .bind(kb.name())
        .bind(kb.description())
        .bind(kb.owner_id())
        .bind(kb.status().as_str())
        .bind(kb.document_count())
        .bind(kb.total_size())
        .bind(kb.settings())
        .bind(kb.created_at())
        .bind(kb.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Knowledge base '{}' already exists", kb.id()))
            } else {
                DomainError::persistence(format!("Failed to create knowledge base: {}", e))
            }
        })?;

        Ok(kb)
    }

    async fn update_details(
        &self,
        id: &KnowledgeBaseId,
        details: KnowledgeBaseDetails,
    ) -> Result<Option<KnowledgeBase>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE knowledge_bases
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = $4
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(details.name.as_deref())
        .bind(details.description.as_deref())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to update knowledge base: {}", e)))?;

        row.as_ref().map(row_to_knowledge_base).transpose()
    }

    async fn set_status(
        &self,
        id: &KnowledgeBaseId,
        status: KnowledgeBaseStatus,
    ) -> Result<Option<KnowledgeBase>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE knowledge_bases
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::persistence(format!("Failed to set knowledge base status: {}", e))
        })?;

        row.as_ref().map(row_to_knowledge_base).transpose()
    }

    async fn delete(&self, id: &KnowledgeBaseId) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to begin transaction: {}", e)))?;

        // Documents and chunks go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM knowledge_bases WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::persistence(format!("Failed to delete knowledge base: {}", e))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to commit delete: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_knowledge_base(row: &PgRow) -> Result<KnowledgeBase, DomainError> {
    let id: Uuid = row.get("id");
    let name: String = row.get("name");
    let description: Option<String> = row.get("description");
    let owner_id: String = row.get("owner_id");
    let status: String = row.get("status");
    let document_count: i32 = row.get("document_count");
    let total_size: i64 = row.get("total_size");
    let settings: serde_json::Value = row.get("settings");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    let status = KnowledgeBaseStatus::from_str(&status).map_err(|e| {
        DomainError::persistence(format!("Invalid knowledge base status in database: {}", e))
    })?;

    Ok(KnowledgeBase::new(name, owner_id)
        .with_id(KnowledgeBaseId::from(id))
        .with_description(description)
        .with_status(status)
        .with_counters(document_count, total_size)
        .with_settings(settings)
        .with_timestamps(created_at, updated_at))
}
