//! End-to-end lifecycle over the in-memory backend and a temporary upload directory

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;

use kb_manager::domain::{ChunkType, DocumentChunk, DocumentStatus, KnowledgeBaseStatus};
use kb_manager::infrastructure::filesystem::{LocalFileStore, StoragePathManager};
use kb_manager::infrastructure::services::{
    CreateKnowledgeBaseRequest, DocumentService, DocumentServiceDeps, KnowledgeBaseLocks,
    KnowledgeBaseService, LoggingProcessingDispatcher, UploadDocumentRequest,
};
use kb_manager::infrastructure::storage::Repositories;

struct Harness {
    tmp: TempDir,
    paths: StoragePathManager,
    repositories: Repositories,
    knowledge_bases: KnowledgeBaseService,
    documents: DocumentService,
}

impl Harness {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let paths = StoragePathManager::new(tmp.path());
        let repositories = Repositories::in_memory();
        let locks = KnowledgeBaseLocks::new();

        let knowledge_bases = KnowledgeBaseService::new(
            repositories.knowledge_bases.clone(),
            paths.clone(),
            locks.clone(),
        );
        let documents = DocumentService::new(DocumentServiceDeps {
            documents: repositories.documents.clone(),
            knowledge_bases: repositories.knowledge_bases.clone(),
            chunks: repositories.chunks.clone(),
            file_store: Arc::new(LocalFileStore::new()),
            dispatcher: Arc::new(LoggingProcessingDispatcher::new()),
            paths: paths.clone(),
            locks,
        });

        Self {
            tmp,
            paths,
            repositories,
            knowledge_bases,
            documents,
        }
    }

    async fn create_kb(&self, name: &str) -> String {
        self.knowledge_bases
            .create(CreateKnowledgeBaseRequest {
                name: name.to_string(),
                description: None,
                owner_id: "admin".to_string(),
            })
            .await
            .unwrap()
            .id()
            .to_string()
    }

    fn upload_request(kb_id: &str, filename: &str, content: &'static [u8]) -> UploadDocumentRequest {
        UploadDocumentRequest {
            kb_id: kb_id.to_string(),
            filename: Some(filename.to_string()),
            content_type: None,
            title: None,
            description: None,
            content: Bytes::from_static(content),
        }
    }
}

#[tokio::test]
async fn create_upload_process_hard_delete() {
    let h = Harness::new();

    let kb = h
        .knowledge_bases
        .create(CreateKnowledgeBaseRequest {
            name: "Docs".to_string(),
            description: None,
            owner_id: "admin".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(kb.status(), KnowledgeBaseStatus::Active);
    assert_eq!(kb.document_count(), 0);

    let kb_dir = h.paths.knowledge_base_directory(&kb.id());
    assert!(h.paths.documents_directory(&kb.id()).is_dir());
    assert!(h.paths.vectors_directory(&kb.id()).is_dir());
    assert!(kb_dir.starts_with(h.tmp.path()));

    let kb_id = kb.id().to_string();
    let uploaded = h
        .documents
        .upload(Harness::upload_request(&kb_id, "readme.txt", b"hello"))
        .await
        .unwrap();

    let listed = h.documents.list_by_knowledge_base(&kb_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    let doc = &listed[0];
    assert_eq!(doc.id(), uploaded.id());
    assert_eq!(doc.file_size(), 5);
    assert_eq!(doc.doc_type(), ".txt");
    assert_eq!(doc.status(), DocumentStatus::Uploaded);
    assert_eq!(doc.title(), "readme.txt");
    assert_eq!(doc.mime_type(), Some("text/plain"));

    let file_path = Path::new(doc.file_path());
    assert!(file_path.starts_with(&kb_dir));
    assert_eq!(std::fs::metadata(file_path).unwrap().len(), 5);

    let counted = h.knowledge_bases.get(&kb_id).await.unwrap().unwrap();
    assert_eq!(counted.document_count(), 1);
    assert_eq!(counted.total_size(), 5);

    let doc_id = doc.id().to_string();
    assert!(h.documents.process(&doc_id).await.unwrap());
    let parsing = h.documents.get(&doc_id).await.unwrap().unwrap();
    assert_eq!(parsing.status(), DocumentStatus::Parsing);
    assert!(!h.documents.process(&doc_id).await.unwrap());

    assert!(h.knowledge_bases.delete(&kb_id, true).await.unwrap());
    assert!(h.documents.get(&doc_id).await.unwrap().is_none());
    assert!(h.knowledge_bases.get(&kb_id).await.unwrap().is_none());
    assert!(!kb_dir.exists());
}

#[tokio::test]
async fn soft_delete_keeps_documents_and_files() {
    let h = Harness::new();
    let kb_id = h.create_kb("Archive me").await;

    let doc = h
        .documents
        .upload(Harness::upload_request(&kb_id, "notes.md", b"# notes"))
        .await
        .unwrap();

    assert!(h.knowledge_bases.delete(&kb_id, false).await.unwrap());

    let kb = h.knowledge_bases.get(&kb_id).await.unwrap().unwrap();
    assert_eq!(kb.status(), KnowledgeBaseStatus::Archived);
    assert!(h.documents.get(&doc.id().to_string()).await.unwrap().is_some());
    assert!(Path::new(doc.file_path()).exists());

    let visible = h.knowledge_bases.list(None).await.unwrap();
    assert!(visible.iter().all(|kb| kb.id().to_string() != kb_id));

    let archived = h
        .knowledge_bases
        .list(Some(KnowledgeBaseStatus::Archived))
        .await
        .unwrap();
    assert_eq!(archived.len(), 1);
}

#[tokio::test]
async fn hard_delete_cascades_to_chunks() {
    let h = Harness::new();
    let kb_id = h.create_kb("Chunked").await;

    let doc = h
        .documents
        .upload(Harness::upload_request(&kb_id, "guide.txt", b"first. second."))
        .await
        .unwrap();

    for (index, content) in ["first.", "second."].into_iter().enumerate() {
        h.repositories
            .chunks
            .create(
                DocumentChunk::new(doc.id(), index as i32, content)
                    .with_type(ChunkType::Text)
                    .with_token_count(1)
                    .with_vector_id(format!("vec-{}", index)),
            )
            .await
            .unwrap();
    }

    let doc_id = doc.id().to_string();
    let chunks = h.documents.chunks(&doc_id).await.unwrap().unwrap();
    assert_eq!(
        chunks.iter().map(|c| c.chunk_index).collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert_eq!(chunks[1].vector_id.as_deref(), Some("vec-1"));

    assert!(h.knowledge_bases.delete(&kb_id, true).await.unwrap());

    assert!(h.documents.chunks(&doc_id).await.unwrap().is_none());
    assert!(h
        .repositories
        .chunks
        .list_by_document(&doc.id())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn pipeline_status_updates() {
    let h = Harness::new();
    let kb_id = h.create_kb("Pipeline").await;

    let doc = h
        .documents
        .upload(Harness::upload_request(&kb_id, "paper.pdf", b"%PDF-1.4"))
        .await
        .unwrap();
    let doc_id = doc.id().to_string();

    assert!(h.documents.process(&doc_id).await.unwrap());

    for status in [DocumentStatus::Vectorizing, DocumentStatus::Indexing] {
        let updated = h
            .documents
            .update_status(&doc_id, status, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status(), status);
        assert!(updated.processed_at().is_none());
    }

    let completed = h
        .documents
        .update_status(&doc_id, DocumentStatus::Completed, None)
        .await
        .unwrap()
        .unwrap();
    assert!(completed.processed_at().is_some());

    let err = h
        .documents
        .update_status(&doc_id, DocumentStatus::Failed, Some("late".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        kb_manager::domain::DomainError::InvalidTransition { .. }
    ));
}

#[tokio::test]
async fn failure_records_error_message() {
    let h = Harness::new();
    let kb_id = h.create_kb("Failures").await;

    let doc = h
        .documents
        .upload(Harness::upload_request(&kb_id, "broken.docx", b"PK"))
        .await
        .unwrap();
    let doc_id = doc.id().to_string();

    assert!(h.documents.process(&doc_id).await.unwrap());

    let failed = h
        .documents
        .update_status(
            &doc_id,
            DocumentStatus::Failed,
            Some("parser crashed".to_string()),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(failed.status(), DocumentStatus::Failed);
    assert_eq!(failed.error_message(), Some("parser crashed"));
    assert!(failed.processed_at().is_none());
}

#[tokio::test]
async fn document_delete_updates_aggregates() {
    let h = Harness::new();
    let kb_id = h.create_kb("Counters").await;

    let first = h
        .documents
        .upload(Harness::upload_request(&kb_id, "a.txt", b"abc"))
        .await
        .unwrap();
    h.documents
        .upload(Harness::upload_request(&kb_id, "b.txt", b"defgh"))
        .await
        .unwrap();

    let kb = h.knowledge_bases.get(&kb_id).await.unwrap().unwrap();
    assert_eq!(kb.document_count(), 2);
    assert_eq!(kb.total_size(), 8);

    assert!(h.documents.delete(&first.id().to_string()).await.unwrap());
    assert!(!Path::new(first.file_path()).exists());
    assert!(!h.documents.delete(&first.id().to_string()).await.unwrap());

    let kb = h.knowledge_bases.get(&kb_id).await.unwrap().unwrap();
    assert_eq!(kb.document_count(), 1);
    assert_eq!(kb.total_size(), 5);
}

#[tokio::test]
async fn core_upload_performs_no_extension_check() {
    // The allow-list lives in the HTTP layer; the service stores what it is given
    let h = Harness::new();
    let kb_id = h.create_kb("Anything").await;

    let doc = h
        .documents
        .upload(Harness::upload_request(&kb_id, "setup.EXE", b"MZ"))
        .await
        .unwrap();

    assert_eq!(doc.doc_type(), ".exe");
    assert!(doc.file_path().ends_with(&format!("{}.exe", doc.id())));
}
