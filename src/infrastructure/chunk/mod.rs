//! Chunk persistence

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryChunkRepository;
pub use postgres_repository::PostgresChunkRepository;
