//! Structured persistence outcomes
//!
//! Repositories report failures through this closed set instead of raw driver
//! errors, so callers can match on the outcome without inspecting text.

use std::fmt;
use thiserror::Error;

/// Which integrity rule a write broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    ForeignKey,
    NotNull,
    Check,
    /// Value rejected by the column type (length, range, encoding)
    Invalid,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Check => "check",
            ConstraintKind::Invalid => "invalid value",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The addressed record does not exist
    #[error("record not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("unique constraint violated: {}", .constraint.as_deref().unwrap_or("unknown"))]
    Conflict { constraint: Option<String> },

    /// Any other integrity constraint rejected the write
    #[error("{violation} constraint violated: {}", .constraint.as_deref().unwrap_or("unknown"))]
    ConstraintViolation {
        constraint: Option<String>,
        violation: ConstraintKind,
    },

    /// The backend could not complete the call
    #[error("persistence backend unavailable: {reason}")]
    Unavailable { reason: String },
}

impl RepositoryError {
    pub fn conflict(constraint: impl Into<String>) -> Self {
        RepositoryError::Conflict {
            constraint: Some(constraint.into()),
        }
    }

    pub fn violation(violation: ConstraintKind, constraint: Option<String>) -> Self {
        RepositoryError::ConstraintViolation {
            constraint,
            violation,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        RepositoryError::Unavailable {
            reason: reason.into(),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
