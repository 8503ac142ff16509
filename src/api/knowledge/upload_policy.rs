//! Upload admission rules applied before a file reaches the document service

use std::collections::BTreeSet;
use std::path::Path;

use axum::extract::multipart::Field;
use bytes::{Bytes, BytesMut};

use crate::api::types::ApiError;
use crate::config::UploadConfig;

/// Headroom for multipart framing and the text fields around the file
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Extension allow-list and size ceiling for uploaded files
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_extensions: BTreeSet<String>,
    max_file_size: u64,
}

impl UploadPolicy {
    /// Extensions are normalized to lowercase with a leading dot
    pub fn new<I, S>(allowed_extensions: I, max_file_size: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .filter_map(|ext| {
                let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
                (!ext.is_empty()).then(|| format!(".{}", ext))
            })
            .collect();

        Self {
            allowed_extensions,
            max_file_size,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(&config.allowed_extensions, config.max_file_size)
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Request body limit for the upload route
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.max_file_size)
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }

    pub fn is_allowed(&self, filename: &str) -> bool {
        extension_of(filename).is_some_and(|ext| self.allowed_extensions.contains(&ext))
    }

    /// Reject filenames whose extension is missing or not on the allow-list
    pub fn check_filename(&self, filename: Option<&str>) -> Result<(), ApiError> {
        match filename {
            Some(name) if self.is_allowed(name) => Ok(()),
            _ => Err(ApiError::bad_request(format!(
                "Unsupported file type. Allowed extensions: {}",
                self.allowed_list()
            ))
            .with_param("file")
            .with_code("unsupported_file_type")),
        }
    }

    /// Read a multipart field, failing as soon as it grows past the size ceiling
    pub async fn read_field(&self, mut field: Field<'_>) -> Result<Bytes, ApiError> {
        let mut buffer = BytesMut::new();

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if (buffer.len() + chunk.len()) as u64 > self.max_file_size {
                return Err(self.too_large());
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(buffer.freeze())
    }

    pub fn too_large(&self) -> ApiError {
        ApiError::payload_too_large(format!(
            "File exceeds the maximum size of {} MB",
            self.max_file_size / (1024 * 1024)
        ))
        .with_param("file")
        .with_code("file_too_large")
    }

    fn allowed_list(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Map a multipart read failure, keeping the status axum assigned to it
pub fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    let mut error =
        ApiError::bad_request(format!("Failed to read multipart body: {}", err.body_text()));
    error.status = err.status();
    error
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn policy() -> UploadPolicy {
        UploadPolicy::new([".pdf", "txt", " .MD "], 10 * 1024 * 1024)
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let policy = policy();

        assert!(policy.is_allowed("report.PDF"));
        assert!(policy.is_allowed("notes.md"));
        assert!(policy.is_allowed("readme.txt"));
        assert!(!policy.is_allowed("setup.exe"));
        assert!(!policy.is_allowed("Makefile"));
        assert!(!policy.is_allowed("archive.txt.exe"));
    }

    #[test]
    fn test_check_filename_rejects_missing_name() {
        let err = policy().check_filename(None).unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.param.as_deref(), Some("file"));
        assert!(err.response.error.message.contains(".pdf"));
    }

    #[test]
    fn test_too_large_is_413() {
        let err = policy().too_large();

        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.response.error.message.contains("10 MB"));
    }

    #[test]
    fn test_body_limit_adds_overhead() {
        let policy = UploadPolicy::new([".txt"], 100);
        assert_eq!(policy.body_limit(), 100 + MULTIPART_OVERHEAD_BYTES);

        let unbounded = UploadPolicy::new([".txt"], u64::MAX);
        assert_eq!(unbounded.body_limit(), usize::MAX);
    }

    #[test]
    fn test_from_config_defaults() {
        let policy = UploadPolicy::from_config(&UploadConfig::default());

        assert_eq!(policy.max_file_size(), 10 * 1024 * 1024);
        assert!(policy.is_allowed("guide.docx"));
        assert!(policy.is_allowed("page.html"));
    }
}
