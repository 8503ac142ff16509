//! Knowledge base persistence

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryKnowledgeBaseRepository;
pub use postgres_repository::PostgresKnowledgeBaseRepository;
