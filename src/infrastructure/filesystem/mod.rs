//! Filesystem infrastructure - knowledge base directories and document files

mod file_store;
mod path_manager;

pub use file_store::{FileStore, LocalFileStore};
pub use path_manager::{sanitize_path_segment, StoragePathManager, FALLBACK_SEGMENT};

#[cfg(test)]
pub use file_store::MockFileStore;
