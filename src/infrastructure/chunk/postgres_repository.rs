//! PostgreSQL chunk repository

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{ChunkRepository, ChunkType, DocumentChunk, DocumentId, DomainError};

/// PostgreSQL implementation of ChunkRepository
#[derive(Debug, Clone)]
pub struct PostgresChunkRepository {
    pool: PgPool,
}

impl PostgresChunkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChunkRepository for PostgresChunkRepository {
    async fn create(&self, chunk: DocumentChunk) -> Result<DocumentChunk, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO document_chunks (id, document_id, content, chunk_index, chunk_type,
                                         token_count, vector_id, chunk_metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(chunk.id)
        .bind(chunk.document_id.as_uuid())
        .bind(&chunk.content)
        .bind(chunk.chunk_index)
        .bind(chunk.chunk_type.as_str())
        .bind(chunk.token_count)
        .bind(&chunk.vector_id)
        .bind(&chunk.chunk_metadata)
        .bind(chunk.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "Chunk {} of document '{}' already exists",
                    chunk.chunk_index, chunk.document_id
                ))
            } else if msg.contains("foreign key") {
                DomainError::not_found(format!("Document '{}' not found", chunk.document_id))
            } else {
                DomainError::persistence(format!("Failed to create chunk: {}", e))
            }
        })?;

        Ok(chunk)
    }

    async fn list_by_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<Vec<DocumentChunk>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, document_id, content, chunk_index, chunk_type, token_count,
                   vector_id, chunk_metadata, created_at
            FROM document_chunks
            WHERE document_id = $1
            ORDER BY chunk_index
            "#,
        )
        .bind(document_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to list chunks: {}", e)))?;

        rows.iter().map(row_to_chunk).collect()
    }
}

fn row_to_chunk(row: &PgRow) -> Result<DocumentChunk, DomainError> {
    let id: Uuid = row.get("id");
    let document_id: Uuid = row.get("document_id");
    let chunk_type: String = row.get("chunk_type");
    let created_at: DateTime<Utc> = row.get("created_at");

    let chunk_type = ChunkType::from_str(&chunk_type)
        .map_err(|e| DomainError::persistence(format!("Invalid chunk type in database: {}", e)))?;

    Ok(DocumentChunk {
        id,
        document_id: DocumentId::from(document_id),
        content: row.get("content"),
        chunk_index: row.get("chunk_index"),
        chunk_type,
        token_count: row.get("token_count"),
        vector_id: row.get("vector_id"),
        chunk_metadata: row.get("chunk_metadata"),
        created_at,
    })
}
