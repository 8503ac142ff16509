//! Knowledge base entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::KnowledgeBaseValidationError;

/// Knowledge base identifier - a v4 UUID generated at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeBaseId(Uuid);

impl KnowledgeBaseId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(id: &str) -> Result<Self, KnowledgeBaseValidationError> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| KnowledgeBaseValidationError::InvalidIdFormat { id: id.to_string() })
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for KnowledgeBaseId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for KnowledgeBaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a knowledge base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeBaseStatus {
    #[default]
    Active,
    Inactive,
    /// Soft-deleted; data and files are preserved
    Archived,
}

impl KnowledgeBaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
        }
    }

    /// Whether knowledge bases in this status appear in an unfiltered listing
    pub fn is_listed_by_default(&self) -> bool {
        !matches!(self, Self::Archived)
    }
}

impl FromStr for KnowledgeBaseStatus {
    type Err = KnowledgeBaseValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "archived" => Ok(Self::Archived),
            other => Err(KnowledgeBaseValidationError::UnknownStatus {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for KnowledgeBaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Knowledge base entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Unique identifier, immutable
    id: KnowledgeBaseId,
    /// Display name
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Owning principal as supplied by the identity source
    owner_id: String,
    status: KnowledgeBaseStatus,
    /// Number of documents currently stored
    document_count: i32,
    /// Sum of stored document sizes in bytes
    total_size: i64,
    /// Opaque configuration blob
    settings: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl KnowledgeBase {
    /// Create a new, active knowledge base with a generated ID
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: KnowledgeBaseId::generate(),
            name: name.into(),
            description: None,
            owner_id: owner_id.into(),
            status: KnowledgeBaseStatus::Active,
            document_count: 0,
            total_size: 0,
            settings: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set a specific ID (for loading from the store)
    pub fn with_id(mut self, id: KnowledgeBaseId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_status(mut self, status: KnowledgeBaseStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_counters(mut self, document_count: i32, total_size: i64) -> Self {
        self.document_count = document_count;
        self.total_size = total_size;
        self
    }

    pub fn with_settings(mut self, settings: serde_json::Value) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // Getters

    pub fn id(&self) -> KnowledgeBaseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn status(&self) -> KnowledgeBaseStatus {
        self.status
    }

    pub fn document_count(&self) -> i32 {
        self.document_count
    }

    pub fn total_size(&self) -> i64 {
        self.total_size
    }

    pub fn settings(&self) -> &serde_json::Value {
        &self.settings
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_archived(&self) -> bool {
        self.status == KnowledgeBaseStatus::Archived
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    pub fn set_status(&mut self, status: KnowledgeBaseStatus) {
        self.status = status;
        self.touch();
    }

    /// Account for a newly stored document
    pub fn record_document_added(&mut self, size: i64) {
        self.document_count += 1;
        self.total_size += size;
    }

    /// Account for a removed document; counters never go negative
    pub fn record_document_removed(&mut self, size: i64) {
        self.document_count = (self.document_count - 1).max(0);
        self.total_size = (self.total_size - size).max(0);
    }

    /// Refresh `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
