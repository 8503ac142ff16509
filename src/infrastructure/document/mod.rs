//! Document persistence

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryDocumentRepository;
pub use postgres_repository::PostgresDocumentRepository;
