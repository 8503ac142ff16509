//! Request and response bodies for the knowledge base API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::{
    validate_knowledge_base_name, ChunkType, Document, DocumentChunk, DocumentStatus,
    KnowledgeBase, KnowledgeBaseStatus,
};

/// Same rules as the service applies: non-blank, at most 100 chars once trimmed
fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_knowledge_base_name(name).map_err(|e| {
        let mut error = ValidationError::new("name");
        error.message = Some(e.to_string().into());
        error
    })
}

/// Request to create a knowledge base
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateKnowledgeBaseBody {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub description: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateKnowledgeBaseBody {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetKnowledgeBaseStatusBody {
    pub status: KnowledgeBaseStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListKnowledgeBasesQuery {
    pub status: Option<KnowledgeBaseStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteKnowledgeBaseQuery {
    #[serde(default)]
    pub hard_delete: bool,
}

/// Status update sent by the processing pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocumentStatusBody {
    pub status: DocumentStatus,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub status: KnowledgeBaseStatus,
    pub document_count: i32,
    pub total_size: i64,
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&KnowledgeBase> for KnowledgeBaseResponse {
    fn from(kb: &KnowledgeBase) -> Self {
        Self {
            id: kb.id().to_string(),
            name: kb.name().to_string(),
            description: kb.description().map(str::to_string),
            owner_id: kb.owner_id().to_string(),
            status: kb.status(),
            document_count: kb.document_count(),
            total_size: kb.total_size(),
            settings: kb.settings().clone(),
            created_at: kb.created_at(),
            updated_at: kb.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub knowledge_base_id: String,
    pub file_path: String,
    pub file_size: i64,
    pub doc_type: String,
    pub mime_type: Option<String>,
    pub status: DocumentStatus,
    pub error_message: Option<String>,
    pub doc_metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<&Document> for DocumentResponse {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id().to_string(),
            title: doc.title().to_string(),
            description: doc.description().map(str::to_string),
            knowledge_base_id: doc.knowledge_base_id().to_string(),
            file_path: doc.file_path().to_string(),
            file_size: doc.file_size(),
            doc_type: doc.doc_type().to_string(),
            mime_type: doc.mime_type().map(str::to_string),
            status: doc.status(),
            error_message: doc.error_message().map(str::to_string),
            doc_metadata: doc.doc_metadata().clone(),
            created_at: doc.created_at(),
            updated_at: doc.updated_at(),
            processed_at: doc.processed_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkResponse {
    pub id: String,
    pub document_id: String,
    pub content: String,
    pub chunk_index: i32,
    pub chunk_type: ChunkType,
    pub token_count: Option<i32>,
    pub vector_id: Option<String>,
    pub chunk_metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<&DocumentChunk> for ChunkResponse {
    fn from(chunk: &DocumentChunk) -> Self {
        Self {
            id: chunk.id.to_string(),
            document_id: chunk.document_id.to_string(),
            content: chunk.content.clone(),
            chunk_index: chunk.chunk_index,
            chunk_type: chunk.chunk_type,
            token_count: chunk.token_count,
            vector_id: chunk.vector_id.clone(),
            chunk_metadata: chunk.chunk_metadata.clone(),
            created_at: chunk.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_name_length() {
        let ok = CreateKnowledgeBaseBody {
            name: "Docs".to_string(),
            description: None,
        };
        assert!(ok.validate().is_ok());

        let empty = CreateKnowledgeBaseBody {
            name: String::new(),
            description: None,
        };
        assert!(empty.validate().is_err());

        let long = CreateKnowledgeBaseBody {
            name: "x".repeat(101),
            description: None,
        };
        assert!(long.validate().is_err());

        let padded = CreateKnowledgeBaseBody {
            name: format!(" {} ", "x".repeat(100)),
            description: None,
        };
        assert!(padded.validate().is_ok());

        let blank = UpdateKnowledgeBaseBody {
            name: Some("   ".to_string()),
            description: None,
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_update_body_skips_absent_name() {
        let body = UpdateKnowledgeBaseBody::default();
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_delete_query_defaults_to_soft() {
        let query: DeleteKnowledgeBaseQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.hard_delete);
    }

    #[test]
    fn test_document_response_serializes_status_lowercase() {
        let doc = Document::new(
            crate::domain::DocumentId::generate(),
            crate::domain::KnowledgeBaseId::generate(),
            "readme.txt",
            "/tmp/x.txt",
            5,
            ".txt",
        );

        let json = serde_json::to_value(DocumentResponse::from(&doc)).unwrap();
        assert_eq!(json["status"], "uploaded");
        assert_eq!(json["file_size"], 5);
        assert!(json["processed_at"].is_null());
    }
}
