//! Chunk domain - processed fragments of documents

mod entity;
mod repository;

pub use entity::{ChunkType, DocumentChunk};
pub use repository::ChunkRepository;

#[cfg(test)]
pub use repository::MockChunkRepository;
