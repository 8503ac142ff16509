//! Document chunk entity

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::document::DocumentId;
use crate::domain::DomainError;

/// Kind of content carried by a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    #[default]
    Text,
    Table,
    Image,
    Code,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Table => "table",
            Self::Image => "image",
            Self::Code => "code",
        }
    }
}

impl FromStr for ChunkType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "table" => Ok(Self::Table),
            "image" => Ok(Self::Image),
            "code" => Ok(Self::Code),
            other => Err(DomainError::validation(format!(
                "Unknown chunk type '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A processed fragment of a document, positioned by `chunk_index`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub document_id: DocumentId,
    pub content: String,
    pub chunk_index: i32,
    pub chunk_type: ChunkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_count: Option<i32>,
    /// Identifier of the embedding in the external vector store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_id: Option<String>,
    pub chunk_metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl DocumentChunk {
    pub fn new(document_id: DocumentId, chunk_index: i32, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content: content.into(),
            chunk_index,
            chunk_type: ChunkType::Text,
            token_count: None,
            vector_id: None,
            chunk_metadata: serde_json::json!({}),
            created_at: Utc::now(),
        }
    }

    pub fn with_type(mut self, chunk_type: ChunkType) -> Self {
        self.chunk_type = chunk_type;
        self
    }

    pub fn with_token_count(mut self, token_count: i32) -> Self {
        self.token_count = Some(token_count);
        self
    }

    pub fn with_vector_id(mut self, vector_id: impl Into<String>) -> Self {
        self.vector_id = Some(vector_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.chunk_metadata = metadata;
        self
    }
}
