//! Error types for StampDB core.

use crate::stamp::StampId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in StampDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The operation addressed an identifier with no row behind it.
    #[error("stamp not found: {id}")]
    NotFound {
        /// The identifier that was not found.
        id: StampId,
    },

    /// A search referenced an unknown field, used a predicate the field
    /// does not support, or gave a malformed range.
    #[error("invalid criteria: {message}")]
    InvalidCriteria {
        /// Description of the problem.
        message: String,
    },

    /// A record violates one of its invariants.
    #[error("invalid value for `{field}`: {message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Description of the violation.
        message: String,
    },

    /// The underlying table is unavailable or a statement failed.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored row could not be decoded.
    #[error("corrupted row: {0}")]
    Codec(#[from] stampdb_codec::CodecError),

    /// A statistics sum left the range of exact decimals.
    #[error("statistics overflow: {metric} exceeds the decimal range")]
    Overflow {
        /// The metric being summed.
        metric: &'static str,
    },

    /// The database file does not exist and `create_if_missing` is false.
    #[error("database does not exist: {}", path.display())]
    MissingDatabase {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A write was attempted on a store opened read-only.
    #[error("store is read-only")]
    ReadOnly,

    /// The store has been closed.
    #[error("store is closed")]
    Closed,
}

impl CoreError {
    /// Creates an invalid criteria error.
    pub fn invalid_criteria(message: impl Into<String>) -> Self {
        Self::InvalidCriteria {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Returns true if this is a [`CoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a [`CoreError::InvalidCriteria`].
    pub fn is_invalid_criteria(&self) -> bool {
        matches!(self, Self::InvalidCriteria { .. })
    }

    /// Returns true if this is a [`CoreError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if the failure came from the storage layer.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Io(_) | Self::MissingDatabase { .. } | Self::ReadOnly | Self::Closed
        )
    }
}
