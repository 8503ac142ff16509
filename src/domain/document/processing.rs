//! Hand-off point to the document processing pipeline

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::Document;

/// Receives documents that have just been marked `parsing`.
///
/// Implementations drive the document through the remaining states by
/// calling back into the status update operation.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProcessingDispatcher: Send + Sync {
    async fn dispatch(&self, document: Document);
}
