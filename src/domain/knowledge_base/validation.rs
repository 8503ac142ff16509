//! Knowledge base validation utilities

use std::fmt;

/// Maximum length for knowledge base names (column width in the store)
pub const MAX_KB_NAME_LENGTH: usize = 100;

/// Knowledge base validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum KnowledgeBaseValidationError {
    /// ID is not a UUID
    InvalidIdFormat { id: String },
    /// Name is empty or whitespace only
    EmptyName,
    /// Name exceeds maximum length
    NameTooLong { length: usize, max: usize },
    /// Unknown status value
    UnknownStatus { value: String },
}

impl fmt::Display for KnowledgeBaseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdFormat { id } => {
                write!(f, "Invalid knowledge base ID '{}': must be a UUID", id)
            }
            Self::EmptyName => write!(f, "Knowledge base name cannot be empty"),
            Self::NameTooLong { length, max } => {
                write!(
                    f,
                    "Knowledge base name too long: {} characters (max {})",
                    length, max
                )
            }
            Self::UnknownStatus { value } => write!(
                f,
                "Unknown knowledge base status '{}': expected active, inactive or archived",
                value
            ),
        }
    }
}

impl std::error::Error for KnowledgeBaseValidationError {}

/// Validate a knowledge base display name
pub fn validate_knowledge_base_name(name: &str) -> Result<(), KnowledgeBaseValidationError> {
    if name.trim().is_empty() {
        return Err(KnowledgeBaseValidationError::EmptyName);
    }

    let length = name.trim().chars().count();

    if length > MAX_KB_NAME_LENGTH {
        return Err(KnowledgeBaseValidationError::NameTooLong {
            length,
            max: MAX_KB_NAME_LENGTH,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_knowledge_base_name("Docs").is_ok());
        assert!(validate_knowledge_base_name("产品手册").is_ok());
        assert!(validate_knowledge_base_name(&"a".repeat(MAX_KB_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(
            validate_knowledge_base_name(""),
            Err(KnowledgeBaseValidationError::EmptyName)
        );
        assert_eq!(
            validate_knowledge_base_name("   "),
            Err(KnowledgeBaseValidationError::EmptyName)
        );
    }

    #[test]
    fn test_length_counts_trimmed_name() {
        let padded = format!("  {}  ", "a".repeat(MAX_KB_NAME_LENGTH));
        assert!(validate_knowledge_base_name(&padded).is_ok());
    }

    #[test]
    fn test_name_too_long() {
        let name = "a".repeat(MAX_KB_NAME_LENGTH + 1);
        assert!(matches!(
            validate_knowledge_base_name(&name),
            Err(KnowledgeBaseValidationError::NameTooLong { length: 101, max: 100 })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = KnowledgeBaseValidationError::InvalidIdFormat {
            id: "nope".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid knowledge base ID 'nope': must be a UUID"
        );
    }
}
