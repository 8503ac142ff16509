//! Document file storage

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::warn;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Byte storage for uploaded document files
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `data` to `path`, returning the number of bytes written.
    /// The file only becomes visible at `path` once fully written.
    async fn write(&self, path: &Path, data: &[u8]) -> Result<u64, DomainError>;

    /// Delete a single file
    async fn remove(&self, path: &Path) -> Result<(), DomainError>;

    async fn exists(&self, path: &Path) -> Result<bool, DomainError>;
}

/// Local filesystem [`FileStore`]
#[derive(Debug, Clone, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".partial");
        path.with_file_name(name)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn write(&self, path: &Path, data: &[u8]) -> Result<u64, DomainError> {
        let temp_path = Self::temp_path(path);

        let result = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            tokio::fs::rename(&temp_path, path).await
        }
        .await;

        if let Err(e) = result {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove partial file");
                }
            }

            return Err(DomainError::storage(format!(
                "Failed to write file '{}': {}",
                path.display(),
                e
            )));
        }

        let written = tokio::fs::metadata(path)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to stat file '{}': {}", path.display(), e)))?
            .len();

        Ok(written)
    }

    async fn remove(&self, path: &Path) -> Result<(), DomainError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to remove file '{}': {}", path.display(), e)))
    }

    async fn exists(&self, path: &Path) -> Result<bool, DomainError> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check file '{}': {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_reports_bytes_written() {
        let tmp = TempDir::new().unwrap();
        let store = LocalFileStore::new();
        let path = tmp.path().join("doc.txt");

        let written = store.write(&path, b"hello").await.unwrap();

        assert_eq!(written, 5);
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        assert!(!LocalFileStore::temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_write_empty_file() {
        let tmp = TempDir::new().unwrap();
        let store = LocalFileStore::new();
        let path = tmp.path().join("empty.md");

        assert_eq!(store.write(&path, b"").await.unwrap(), 0);
        assert!(store.exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails_cleanly() {
        let tmp = TempDir::new().unwrap();
        let store = LocalFileStore::new();
        let path = tmp.path().join("missing").join("doc.txt");

        let result = store.write(&path, b"hello").await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert!(!store.exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove() {
        let tmp = TempDir::new().unwrap();
        let store = LocalFileStore::new();
        let path = tmp.path().join("doc.txt");
        store.write(&path, b"bye").await.unwrap();

        store.remove(&path).await.unwrap();

        assert!(!store.exists(&path).await.unwrap());
        assert!(store.remove(&path).await.is_err());
    }
}
