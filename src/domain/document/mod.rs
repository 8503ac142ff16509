//! Document domain - uploaded files and their processing state machine

mod entity;
mod processing;
mod repository;
mod status;

pub use entity::{Document, DocumentId};
pub use processing::ProcessingDispatcher;
pub use repository::DocumentRepository;
pub use status::{validate_transition, DocumentStatus};

#[cfg(test)]
pub use processing::MockProcessingDispatcher;
#[cfg(test)]
pub use repository::MockDocumentRepository;
