//! Repository and storage error types.

use thiserror::Error;

use crate::record::RecordId;
use crate::validation::ValidationError;

/// Durable storage failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// I/O error while reading or writing the data file
    #[error("I/O error: {0}")]
    Io(String),

    /// Disk full error during save
    #[error("Disk full: {0}")]
    DiskFull(String),

    /// The data file could not be parsed as a delimited table
    #[error("Corrupt data file: {0}")]
    Corrupt(String),
}

/// Record repository operation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepoError {
    /// Candidate record was rejected; messages are returned verbatim
    #[error("Record rejected: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// Position outside the current dataset bounds
    #[error("No record at position {position} (dataset has {len} records)")]
    NotFound { position: usize, len: usize },

    /// Record id not present in the current dataset
    #[error("Record '{0}' not found")]
    UnknownRecord(RecordId),

    /// Durable storage failure; in-memory state is left unchanged
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Lock poisoned (a previous holder panicked)
    #[error("Lock poisoned")]
    LockPoisoned,
}

impl RepoError {
    /// Returns the validation errors if this is a rejection.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            RepoError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
