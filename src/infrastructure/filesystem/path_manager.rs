//! On-disk layout of knowledge bases
//!
//! ```text
//! <base_dir>/knowledge_bases/<safe_kb_id>/documents/<doc_id><ext>
//! <base_dir>/knowledge_bases/<safe_kb_id>/vectors/
//! ```

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error};

use crate::domain::{DomainError, KnowledgeBaseId};

/// Path segment used when sanitization leaves nothing
pub const FALLBACK_SEGMENT: &str = "unnamed";

const KNOWLEDGE_BASES_DIR: &str = "knowledge_bases";
const DOCUMENTS_DIR: &str = "documents";
const VECTORS_DIR: &str = "vectors";

static DISALLOWED_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.-]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Reduce an identifier or filename to a filesystem-safe path segment.
///
/// Keeps letters, digits, `_`, `-` and `.`; whitespace runs become `_`;
/// leading and trailing dots and spaces are trimmed. An empty result maps to
/// [`FALLBACK_SEGMENT`], so `..` can never escape the parent directory.
pub fn sanitize_path_segment(raw: &str) -> String {
    let kept = DISALLOWED_CHARS.replace_all(raw, "");
    let collapsed = WHITESPACE_RUN.replace_all(&kept, "_");
    let trimmed = collapsed.trim_matches(|c| c == '.' || c == ' ');

    if trimmed.is_empty() {
        FALLBACK_SEGMENT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Resolves and creates per-knowledge-base directories under a base directory
#[derive(Debug, Clone)]
pub struct StoragePathManager {
    base_dir: PathBuf,
}

impl StoragePathManager {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Root of a knowledge base's subtree; hard delete removes exactly this
    pub fn knowledge_base_directory(&self, kb_id: &KnowledgeBaseId) -> PathBuf {
        self.base_dir
            .join(KNOWLEDGE_BASES_DIR)
            .join(sanitize_path_segment(&kb_id.to_string()))
    }

    pub fn documents_directory(&self, kb_id: &KnowledgeBaseId) -> PathBuf {
        self.knowledge_base_directory(kb_id).join(DOCUMENTS_DIR)
    }

    /// Reserved for the vector index
    pub fn vectors_directory(&self, kb_id: &KnowledgeBaseId) -> PathBuf {
        self.knowledge_base_directory(kb_id).join(VECTORS_DIR)
    }

    /// Create the documents and vectors directories of a knowledge base.
    ///
    /// Idempotent. Returns the documents directory.
    pub async fn ensure_knowledge_base_directory(
        &self,
        kb_id: &KnowledgeBaseId,
    ) -> Result<PathBuf, DomainError> {
        let documents = self.documents_directory(kb_id);

        for dir in [&documents, &self.vectors_directory(kb_id)] {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                error!(path = %dir.display(), error = %e, "Failed to create directory");
                DomainError::storage(format!(
                    "Failed to create directory for knowledge base '{}': {}",
                    kb_id, e
                ))
            })?;
        }

        debug!(kb_id = %kb_id, path = %documents.display(), "Knowledge base directory ready");

        Ok(documents)
    }

    /// Remove a knowledge base's whole subtree. A missing tree is not an error.
    pub async fn remove_knowledge_base_directory(
        &self,
        kb_id: &KnowledgeBaseId,
    ) -> Result<(), DomainError> {
        let dir = self.knowledge_base_directory(kb_id);

        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to remove directory for knowledge base '{}': {}",
                kb_id, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_path_segment("report-2024_v1.pdf"), "report-2024_v1.pdf");
        assert_eq!(
            sanitize_path_segment("550e8400-e29b-41d4-a716-446655440000"),
            "550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_sanitize_strips_separators_and_specials() {
        assert_eq!(sanitize_path_segment("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_path_segment("a\\b:c*d?e"), "abcde");
        assert_eq!(sanitize_path_segment("<script>.txt"), "script.txt");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_path_segment("my   annual\treport.txt"), "my_annual_report.txt");
    }

    #[test]
    fn test_sanitize_trims_dots_and_spaces() {
        assert_eq!(sanitize_path_segment(".hidden."), "hidden");
        assert_eq!(sanitize_path_segment("...name..."), "name");
        // Whitespace is collapsed before trimming
        assert_eq!(sanitize_path_segment("  padded  "), "_padded_");
    }

    #[test]
    fn test_sanitize_fallback() {
        assert_eq!(sanitize_path_segment(""), FALLBACK_SEGMENT);
        assert_eq!(sanitize_path_segment(".."), FALLBACK_SEGMENT);
        assert_eq!(sanitize_path_segment("///"), FALLBACK_SEGMENT);
    }

    #[test]
    fn test_sanitize_keeps_unicode_word_characters() {
        assert_eq!(sanitize_path_segment("文档 一.md"), "文档_一.md");
    }

    #[test]
    fn test_directory_layout() {
        let manager = StoragePathManager::new("/data/uploads");
        let kb_id = KnowledgeBaseId::generate();

        let root = manager.knowledge_base_directory(&kb_id);
        assert_eq!(
            root,
            PathBuf::from("/data/uploads/knowledge_bases").join(kb_id.to_string())
        );
        assert_eq!(manager.documents_directory(&kb_id), root.join("documents"));
        assert_eq!(manager.vectors_directory(&kb_id), root.join("vectors"));
    }

    #[tokio::test]
    async fn test_ensure_directory_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let manager = StoragePathManager::new(tmp.path());
        let kb_id = KnowledgeBaseId::generate();

        let first = manager.ensure_knowledge_base_directory(&kb_id).await.unwrap();
        let second = manager.ensure_knowledge_base_directory(&kb_id).await.unwrap();

        assert_eq!(first, second);
        assert!(first.is_dir());
        assert!(manager.vectors_directory(&kb_id).is_dir());
    }

    #[tokio::test]
    async fn test_ensure_directory_fails_when_base_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let manager = StoragePathManager::new(&file);
        let result = manager
            .ensure_knowledge_base_directory(&KnowledgeBaseId::generate())
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_remove_directory() {
        let tmp = TempDir::new().unwrap();
        let manager = StoragePathManager::new(tmp.path());
        let kb_id = KnowledgeBaseId::generate();

        let docs = manager.ensure_knowledge_base_directory(&kb_id).await.unwrap();
        std::fs::write(docs.join("a.txt"), b"hello").unwrap();

        manager.remove_knowledge_base_directory(&kb_id).await.unwrap();
        assert!(!manager.knowledge_base_directory(&kb_id).exists());

        // Already gone
        manager.remove_knowledge_base_directory(&kb_id).await.unwrap();
    }
}
