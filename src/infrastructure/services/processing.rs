//! Default processing dispatcher

use async_trait::async_trait;
use tracing::info;

use crate::domain::{Document, ProcessingDispatcher};

/// Records the hand-off and leaves the document in `parsing`
#[derive(Debug, Clone, Default)]
pub struct LoggingProcessingDispatcher;

impl LoggingProcessingDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessingDispatcher for LoggingProcessingDispatcher {
    async fn dispatch(&self, document: Document) {
        info!(
            document_id = %document.id(),
            kb_id = %document.knowledge_base_id(),
            doc_type = %document.doc_type(),
            "Document handed off for processing"
        );
    }
}
