//! Document service - uploads, status transitions, deletion and processing hand-off

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, error, info, warn};

use crate::domain::{
    ChunkRepository, Document, DocumentChunk, DocumentId, DocumentRepository, DocumentStatus,
    DomainError, KnowledgeBaseId, KnowledgeBaseRepository, ProcessingDispatcher,
};
use crate::infrastructure::filesystem::{sanitize_path_segment, FileStore, StoragePathManager};

use super::kb_locks::KnowledgeBaseLocks;

/// Maximum document title length (column width in the store)
pub const MAX_DOCUMENT_TITLE_LENGTH: usize = 200;

/// Request to store an uploaded file as a new document.
///
/// Extension and size policy are enforced by the caller.
#[derive(Debug, Clone)]
pub struct UploadDocumentRequest {
    pub kb_id: String,
    /// Filename as sent by the client
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Bytes,
}

/// Collaborators of the document service
pub struct DocumentServiceDeps {
    pub documents: Arc<dyn DocumentRepository>,
    pub knowledge_bases: Arc<dyn KnowledgeBaseRepository>,
    pub chunks: Arc<dyn ChunkRepository>,
    pub file_store: Arc<dyn FileStore>,
    pub dispatcher: Arc<dyn ProcessingDispatcher>,
    pub paths: StoragePathManager,
    pub locks: KnowledgeBaseLocks,
}

/// Document service
pub struct DocumentService {
    documents: Arc<dyn DocumentRepository>,
    knowledge_bases: Arc<dyn KnowledgeBaseRepository>,
    chunks: Arc<dyn ChunkRepository>,
    file_store: Arc<dyn FileStore>,
    dispatcher: Arc<dyn ProcessingDispatcher>,
    paths: StoragePathManager,
    locks: KnowledgeBaseLocks,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("paths", &self.paths)
            .finish()
    }
}

impl DocumentService {
    pub fn new(deps: DocumentServiceDeps) -> Self {
        Self {
            documents: deps.documents,
            knowledge_bases: deps.knowledge_bases,
            chunks: deps.chunks,
            file_store: deps.file_store,
            dispatcher: deps.dispatcher,
            paths: deps.paths,
            locks: deps.locks,
        }
    }

    /// Write the file, then insert the record. A record never references a
    /// file that was not fully written; if the insert fails the file is removed.
    pub async fn upload(&self, request: UploadDocumentRequest) -> Result<Document, DomainError> {
        let kb_id = KnowledgeBaseId::parse(&request.kb_id)?;

        if let Some(title) = request.title.as_deref() {
            let length = title.trim().chars().count();
            if length > MAX_DOCUMENT_TITLE_LENGTH {
                return Err(DomainError::validation(format!(
                    "Document title too long: {} characters (max {})",
                    length, MAX_DOCUMENT_TITLE_LENGTH
                )));
            }
        }

        let _guard = self.locks.read(&kb_id).await;

        let kb = self
            .knowledge_bases
            .get(&kb_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Knowledge base '{}' not found", kb_id)))?;

        if kb.is_archived() {
            return Err(DomainError::conflict(format!(
                "Knowledge base '{}' is archived",
                kb_id
            )));
        }

        let documents_dir = self.paths.ensure_knowledge_base_directory(&kb_id).await?;

        let doc_id = DocumentId::generate();
        let safe_filename = sanitize_path_segment(request.filename.as_deref().unwrap_or_default());
        let extension = extension_of(&safe_filename);
        let stored_filename = format!("{}{}", doc_id, extension);
        let file_path = documents_dir.join(&stored_filename);

        let written = match self.file_store.write(&file_path, &request.content).await {
            Ok(written) => written,
            Err(e) => {
                error!(kb_id = %kb_id, path = %file_path.display(), error = %e, "Upload aborted");
                return Err(e);
            }
        };

        let file_size = i64::try_from(written)
            .map_err(|_| DomainError::internal(format!("File size {} out of range", written)))?;

        let title = resolve_title(request.title, request.filename.as_deref(), &stored_filename);
        let mime_type = request
            .content_type
            .filter(|value| !value.trim().is_empty())
            .or_else(|| {
                mime_guess::from_path(&file_path)
                    .first()
                    .map(|mime| mime.essence_str().to_string())
            });

        let document = Document::new(
            doc_id,
            kb_id,
            title,
            file_path.to_string_lossy().into_owned(),
            file_size,
            extension,
        )
        .with_description(request.description)
        .with_mime_type(mime_type);

        match self.documents.create(document).await {
            Ok(document) => {
                info!(
                    document_id = %doc_id,
                    kb_id = %kb_id,
                    file_size,
                    "Document uploaded"
                );
                Ok(document)
            }
            Err(e) => {
                error!(document_id = %doc_id, error = %e, "Failed to persist document");
                self.remove_file_best_effort(&file_path).await;
                Err(e)
            }
        }
    }

    /// Documents of a knowledge base, oldest first
    pub async fn list_by_knowledge_base(&self, kb_id: &str) -> Result<Vec<Document>, DomainError> {
        let kb_id = KnowledgeBaseId::parse(kb_id)?;
        self.documents.list_by_knowledge_base(&kb_id).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Document>, DomainError> {
        let doc_id = DocumentId::parse(id)?;
        self.documents.get(&doc_id).await
    }

    /// Move a document along the processing state machine.
    ///
    /// Illegal transitions fail with `InvalidTransition`. A concurrent change
    /// between read and write fails with `Conflict`.
    pub async fn update_status(
        &self,
        id: &str,
        status: DocumentStatus,
        error_message: Option<String>,
    ) -> Result<Option<Document>, DomainError> {
        let doc_id = DocumentId::parse(id)?;

        let Some(mut document) = self.documents.get(&doc_id).await? else {
            return Ok(None);
        };

        let previous = document.status();
        document.transition_to(status, error_message)?;

        if !self.documents.update_status(&document, previous).await? {
            if self.documents.get(&doc_id).await?.is_none() {
                return Ok(None);
            }

            return Err(DomainError::conflict(format!(
                "Document '{}' changed status concurrently",
                doc_id
            )));
        }

        info!(document_id = %doc_id, from = %previous, to = %status, "Document status changed");

        Ok(Some(document))
    }

    /// Remove the file (best effort), then the record.
    /// Returns `false` if the document does not exist.
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let doc_id = DocumentId::parse(id)?;

        let Some(document) = self.documents.get(&doc_id).await? else {
            return Ok(false);
        };

        self.remove_file_best_effort(Path::new(document.file_path()))
            .await;

        let deleted = self.documents.delete(&doc_id).await?;

        if deleted {
            info!(document_id = %doc_id, kb_id = %document.knowledge_base_id(), "Document deleted");
        }

        Ok(deleted)
    }

    /// Mark an `uploaded` document as `parsing` and hand it to the processing
    /// pipeline. Returns `false` if the document does not exist or is not in
    /// the `uploaded` state.
    pub async fn process(&self, id: &str) -> Result<bool, DomainError> {
        let doc_id = DocumentId::parse(id)?;

        let Some(mut document) = self.documents.get(&doc_id).await? else {
            return Ok(false);
        };

        if document.status() != DocumentStatus::Uploaded {
            return Ok(false);
        }

        document.transition_to(DocumentStatus::Parsing, None)?;

        if !self
            .documents
            .update_status(&document, DocumentStatus::Uploaded)
            .await?
        {
            return Ok(false);
        }

        info!(document_id = %doc_id, "Document processing started");

        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(async move {
            dispatcher.dispatch(document).await;
        });

        Ok(true)
    }

    /// Chunks of a document ordered by index, or `None` if the document does not exist
    pub async fn chunks(&self, id: &str) -> Result<Option<Vec<DocumentChunk>>, DomainError> {
        let doc_id = DocumentId::parse(id)?;

        if self.documents.get(&doc_id).await?.is_none() {
            return Ok(None);
        }

        self.chunks.list_by_document(&doc_id).await.map(Some)
    }

    async fn remove_file_best_effort(&self, path: &Path) {
        if let Ok(false) = self.file_store.exists(path).await {
            debug!(path = %path.display(), "Document file already gone");
            return;
        }

        if let Err(e) = self.file_store.remove(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove document file");
        }
    }
}

/// Lowercased extension including the dot, or empty
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// Explicit title, else the client filename, else the stored filename
fn resolve_title(title: Option<String>, filename: Option<&str>, stored_filename: &str) -> String {
    let candidate = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| {
            filename
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| stored_filename.to_string());

    candidate.chars().take(MAX_DOCUMENT_TITLE_LENGTH).collect()
}
