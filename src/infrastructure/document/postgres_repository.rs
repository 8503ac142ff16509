//! PostgreSQL document repository

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{
    Document, DocumentId, DocumentRepository, DocumentStatus, DomainError, KnowledgeBaseId,
};

const SELECT_COLUMNS: &str = "id, knowledge_base_id, title, description, file_path, file_size, \
     doc_type, mime_type, status, error_message, doc_metadata, created_at, updated_at, processed_at";

/// PostgreSQL implementation of DocumentRepository
#[derive(Debug, Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM documents WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to get document: {}", e)))?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn list_by_knowledge_base(
        &self,
        kb_id: &KnowledgeBaseId,
    ) -> Result<Vec<Document>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM documents WHERE knowledge_base_id = $1 ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(kb_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to list documents: {}", e)))?;

        rows.iter().map(row_to_document).collect()
    }

    async fn create(&self, document: Document) -> Result<Document, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to begin transaction: {}", e)))?;

        let updated = sqlx::query(
            r#"
            UPDATE knowledge_bases
            SET document_count = document_count + 1,
                total_size = total_size + $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(document.knowledge_base_id().as_uuid())
        .bind(document.file_size())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::persistence(format!("Failed to update knowledge base counters: {}", e))
        })?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Knowledge base '{}' not found",
                document.knowledge_base_id()
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO documents (id, knowledge_base_id, title, description, file_path,
                                   file_size, doc_type, mime_type, status, error_message,
                                   doc_metadata, created_at, updated_at, processed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.knowledge_base_id().as_uuid())
        .bind(document.title())
        .bind(document.description())
        .bind(document.file_path())
        .bind(document.file_size())
        .bind(document.doc_type())
        .bind(document.mime_type())
        .bind(document.status().as_str())
        .bind(document.error_message())
        .bind(document.doc_metadata())
        .bind(document.created_at())
        .bind(document.updated_at())
        .bind(document.processed_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Document '{}' already exists", document.id()))
            } else {
                DomainError::persistence(format!("Failed to create document: {}", e))
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to commit document: {}", e)))?;

        Ok(document)
    }

    async fn update_status(
        &self,
        document: &Document,
        expected: DocumentStatus,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET status = $2, error_message = $3, processed_at = $4, updated_at = $5
            WHERE id = $1 AND status = $6
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.status().as_str())
        .bind(document.error_message())
        .bind(document.processed_at())
        .bind(document.updated_at())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to update document status: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to begin transaction: {}", e)))?;

        let removed = sqlx::query(
            "DELETE FROM documents WHERE id = $1 RETURNING knowledge_base_id, file_size",
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to delete document: {}", e)))?;

        let Some(row) = removed else {
            return Ok(false);
        };

        let kb_id: Uuid = row.get("knowledge_base_id");
        let file_size: i64 = row.get("file_size");

        sqlx::query(
            r#"
            UPDATE knowledge_bases
            SET document_count = GREATEST(document_count - 1, 0),
                total_size = GREATEST(total_size - $2, 0),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(kb_id)
        .bind(file_size)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::persistence(format!("Failed to update knowledge base counters: {}", e))
        })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to commit delete: {}", e)))?;

        Ok(true)
    }
}

fn row_to_document(row: &PgRow) -> Result<Document, DomainError> {
    let id: Uuid = row.get("id");
    let kb_id: Uuid = row.get("knowledge_base_id");
    let title: String = row.get("title");
    let description: Option<String> = row.get("description");
    let file_path: String = row.get("file_path");
    let file_size: i64 = row.get("file_size");
    let doc_type: String = row.get("doc_type");
    let mime_type: Option<String> = row.get("mime_type");
    let status: String = row.get("status");
    let error_message: Option<String> = row.get("error_message");
    let doc_metadata: serde_json::Value = row.get("doc_metadata");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");
    let processed_at: Option<DateTime<Utc>> = row.get("processed_at");

    let status = DocumentStatus::from_str(&status).map_err(|e| {
        DomainError::persistence(format!("Invalid document status in database: {}", e))
    })?;

    Ok(Document::new(
        DocumentId::from(id),
        KnowledgeBaseId::from(kb_id),
        title,
        file_path,
        file_size,
        doc_type,
    )
    .with_description(description)
    .with_mime_type(mime_type)
    .with_metadata(doc_metadata)
    .with_processing_state(status, error_message, processed_at)
    .with_timestamps(created_at, updated_at))
}
