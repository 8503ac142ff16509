//! Document processing state machine
//!
//! ```text
//! uploaded -> parsing -> vectorizing -> indexing -> completed
//!     \          \            \             \
//!      +----------+------------+-------------+--> failed
//! ```
//!
//! `uploaded` is the only initial state. `completed` and `failed` are terminal.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Processing status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Uploaded,
    Parsing,
    Vectorizing,
    Indexing,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 6] = [
        Self::Uploaded,
        Self::Parsing,
        Self::Vectorizing,
        Self::Indexing,
        Self::Completed,
        Self::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Parsing => "parsing",
            Self::Vectorizing => "vectorizing",
            Self::Indexing => "indexing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// The single forward step out of this status, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Uploaded => Some(Self::Parsing),
            Self::Parsing => Some(Self::Vectorizing),
            Self::Vectorizing => Some(Self::Indexing),
            Self::Indexing => Some(Self::Completed),
            Self::Completed | Self::Failed => None,
        }
    }

    /// Whether `target` is directly reachable from this status
    pub fn can_transition_to(&self, target: Self) -> bool {
        if self.is_terminal() {
            return false;
        }

        target == Self::Failed || self.next() == Some(target)
    }
}

/// Check a transition, returning a typed error when it is not allowed
pub fn validate_transition(from: DocumentStatus, to: DocumentStatus) -> Result<(), DomainError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(DomainError::invalid_transition(from, to))
    }
}

impl FromStr for DocumentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::validation(format!("Unknown document status '{}'", s)))
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
