//! Application state for shared services

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::domain::{
    Document, DocumentChunk, DocumentStatus, DomainError, KnowledgeBase, KnowledgeBaseStatus,
    OwnerResolver,
};
use crate::infrastructure::services::{
    CreateKnowledgeBaseRequest, DocumentService, KnowledgeBaseService, UpdateKnowledgeBaseRequest,
    UploadDocumentRequest,
};

use super::knowledge::UploadPolicy;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub knowledge_base_service: Arc<dyn KnowledgeBaseServiceTrait>,
    pub document_service: Arc<dyn DocumentServiceTrait>,
    pub owner_resolver: Arc<dyn OwnerResolver>,
    pub upload_policy: UploadPolicy,
}

impl AppState {
    pub fn new(
        knowledge_base_service: Arc<dyn KnowledgeBaseServiceTrait>,
        document_service: Arc<dyn DocumentServiceTrait>,
        owner_resolver: Arc<dyn OwnerResolver>,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            knowledge_base_service,
            document_service,
            owner_resolver,
            upload_policy,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("owner_resolver", &self.owner_resolver)
            .field("upload_policy", &self.upload_policy)
            .finish()
    }
}

/// Trait for knowledge base service operations
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait KnowledgeBaseServiceTrait: Send + Sync {
    async fn create(&self, request: CreateKnowledgeBaseRequest)
        -> Result<KnowledgeBase, DomainError>;
    async fn list(
        &self,
        status: Option<KnowledgeBaseStatus>,
    ) -> Result<Vec<KnowledgeBase>, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<KnowledgeBase>, DomainError>;
    async fn exists(&self, id: &str) -> Result<bool, DomainError>;
    async fn update(
        &self,
        id: &str,
        request: UpdateKnowledgeBaseRequest,
    ) -> Result<Option<KnowledgeBase>, DomainError>;
    async fn set_status(
        &self,
        id: &str,
        status: KnowledgeBaseStatus,
    ) -> Result<Option<KnowledgeBase>, DomainError>;
    async fn delete(&self, id: &str, hard: bool) -> Result<bool, DomainError>;
}

/// Trait for document service operations
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DocumentServiceTrait: Send + Sync {
    async fn upload(&self, request: UploadDocumentRequest) -> Result<Document, DomainError>;
    async fn list_by_knowledge_base(&self, kb_id: &str) -> Result<Vec<Document>, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<Document>, DomainError>;
    async fn update_status(
        &self,
        id: &str,
        status: DocumentStatus,
        error_message: Option<String>,
    ) -> Result<Option<Document>, DomainError>;
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
    async fn process(&self, id: &str) -> Result<bool, DomainError>;
    async fn chunks(&self, id: &str) -> Result<Option<Vec<DocumentChunk>>, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl KnowledgeBaseServiceTrait for KnowledgeBaseService {
    async fn create(
        &self,
        request: CreateKnowledgeBaseRequest,
    ) -> Result<KnowledgeBase, DomainError> {
        KnowledgeBaseService::create(self, request).await
    }

    async fn list(
        &self,
        status: Option<KnowledgeBaseStatus>,
    ) -> Result<Vec<KnowledgeBase>, DomainError> {
        KnowledgeBaseService::list(self, status).await
    }

    async fn get(&self, id: &str) -> Result<Option<KnowledgeBase>, DomainError> {
        KnowledgeBaseService::get(self, id).await
    }

    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        KnowledgeBaseService::exists(self, id).await
    }

    async fn update(
        &self,
        id: &str,
        request: UpdateKnowledgeBaseRequest,
    ) -> Result<Option<KnowledgeBase>, DomainError> {
        KnowledgeBaseService::update(self, id, request).await
    }

    async fn set_status(
        &self,
        id: &str,
        status: KnowledgeBaseStatus,
    ) -> Result<Option<KnowledgeBase>, DomainError> {
        KnowledgeBaseService::set_status(self, id, status).await
    }

    async fn delete(&self, id: &str, hard: bool) -> Result<bool, DomainError> {
        KnowledgeBaseService::delete(self, id, hard).await
    }
}

#[async_trait::async_trait]
impl DocumentServiceTrait for DocumentService {
    async fn upload(&self, request: UploadDocumentRequest) -> Result<Document, DomainError> {
        DocumentService::upload(self, request).await
    }

    async fn list_by_knowledge_base(&self, kb_id: &str) -> Result<Vec<Document>, DomainError> {
        DocumentService::list_by_knowledge_base(self, kb_id).await
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, DomainError> {
        DocumentService::get(self, id).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: DocumentStatus,
        error_message: Option<String>,
    ) -> Result<Option<Document>, DomainError> {
        DocumentService::update_status(self, id, status, error_message).await
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        DocumentService::delete(self, id).await
    }

    async fn process(&self, id: &str) -> Result<bool, DomainError> {
        DocumentService::process(self, id).await
    }

    async fn chunks(&self, id: &str) -> Result<Option<Vec<DocumentChunk>>, DomainError> {
        DocumentService::chunks(self, id).await
    }
}
