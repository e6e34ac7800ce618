//! Failures reported by transaction book storage.

use std::io;
use std::path::PathBuf;

use crate::domain::models::transaction::{InvalidTransaction, TransactionId, UnknownDirection};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The caller supplied no path and no default path is configured.
    #[error("No file path was given and no default file path is configured")]
    MissingPath,
    /// The file exists but its content is not a valid transaction book.
    #[error(transparent)]
    DataLoading(#[from] DataLoadingError),
    /// Underlying filesystem failure, passed through as-is.
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Failed to encode transaction book as CSV: {0}")]
    Csv(String),
}

impl From<csv::Error> for StorageError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => StorageError::Io(io_err),
            _ => StorageError::Csv(message),
        }
    }
}

/// A saved file whose content could not be turned into a transaction book
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid transaction data in {} at line {line}: {reason}", .path.display())]
pub struct DataLoadingError {
    pub path: PathBuf,
    /// 1-based line of the offending row
    pub line: u64,
    pub reason: RowError,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("expected {expected} columns, found {found}")]
    WrongColumnCount { expected: usize, found: usize },
    #[error("unexpected header row '{0}'")]
    MalformedHeader(String),
    #[error("invalid transaction id '{0}'")]
    InvalidId(String),
    #[error(transparent)]
    UnknownDirection(#[from] UnknownDirection),
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error(transparent)]
    InvalidTransaction(#[from] InvalidTransaction),
    #[error("transaction id {0} appears more than once")]
    DuplicateIdentifier(TransactionId),
    #[error("malformed CSV: {0}")]
    Malformed(String),
}

impl StorageError {
    /// Whether this is a content error rather than a usage or I/O error
    pub fn is_data_loading(&self) -> bool {
        matches!(self, StorageError::DataLoading(_))
    }

    pub fn as_data_loading(&self) -> Option<&DataLoadingError> {
        match self {
            StorageError::DataLoading(err) => Some(err),
            _ => None,
        }
    }
}
