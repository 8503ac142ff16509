//! Knowledge Base domain - named containers of documents

mod entity;
mod repository;
mod validation;

pub use entity::{KnowledgeBase, KnowledgeBaseId, KnowledgeBaseStatus};
pub use repository::{KnowledgeBaseDetails, KnowledgeBaseRepository};
pub use validation::{
    validate_knowledge_base_name, KnowledgeBaseValidationError, MAX_KB_NAME_LENGTH,
};

#[cfg(test)]
pub use repository::MockKnowledgeBaseRepository;
