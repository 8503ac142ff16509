//! Document entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{validate_transition, DocumentStatus};
use crate::domain::knowledge_base::KnowledgeBaseId;
use crate::domain::DomainError;

/// Document identifier - a v4 UUID, also used as the stored filename stem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(id: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("Invalid document ID '{}': must be a UUID", id)))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for DocumentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single uploaded file belonging to exactly one knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    knowledge_base_id: KnowledgeBaseId,
    /// On-disk location under the knowledge base's documents directory
    file_path: String,
    /// Bytes actually written
    file_size: i64,
    /// Lowercased extension including the dot, e.g. ".txt"
    doc_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    doc_metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processed_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Create a freshly uploaded document
    pub fn new(
        id: DocumentId,
        knowledge_base_id: KnowledgeBaseId,
        title: impl Into<String>,
        file_path: impl Into<String>,
        file_size: i64,
        doc_type: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            title: title.into(),
            description: None,
            knowledge_base_id,
            file_path: file_path.into(),
            file_size,
            doc_type: doc_type.into(),
            mime_type: None,
            status: DocumentStatus::Uploaded,
            error_message: None,
            doc_metadata: serde_json::json!({}),
            created_at: now,
            updated_at: now,
            processed_at: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_mime_type(mut self, mime_type: Option<String>) -> Self {
        self.mime_type = mime_type;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.doc_metadata = metadata;
        self
    }

    /// Restore persisted processing state (for loading from the store)
    pub fn with_processing_state(
        mut self,
        status: DocumentStatus,
        error_message: Option<String>,
        processed_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.status = status;
        self.error_message = error_message;
        self.processed_at = processed_at;
        self
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // Getters

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn knowledge_base_id(&self) -> KnowledgeBaseId {
        self.knowledge_base_id
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn doc_metadata(&self) -> &serde_json::Value {
        &self.doc_metadata
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    /// Move to `status` if the state machine allows it.
    ///
    /// `updated_at` is always refreshed, `processed_at` is set only on
    /// completion, and an existing error message is kept unless a new one
    /// is provided.
    pub fn transition_to(
        &mut self,
        status: DocumentStatus,
        error_message: Option<String>,
    ) -> Result<(), DomainError> {
        validate_transition(self.status, status)?;

        let now = Utc::now();
        self.status = status;
        self.updated_at = now;

        if status == DocumentStatus::Completed {
            self.processed_at = Some(now);
        }

        if let Some(message) = error_message {
            self.error_message = Some(message);
        }

        Ok(())
    }
}
