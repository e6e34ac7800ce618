//! # Storage Traits
//!
//! The seam between the ledger model and whatever keeps it on disk. The
//! command and presentation layers depend on `TransactionBookStorage`, never
//! on a concrete file format.

use std::path::Path;

use crate::domain::transaction_book::{ReadOnlyTransactionBook, TransactionBook};
use crate::storage::error::StorageError;

/// Result of reading a transaction book
#[derive(Debug)]
pub enum ReadOutcome {
    /// Nothing has been saved at the location yet
    Absent,
    /// Every row was valid
    Loaded(TransactionBook),
    Failed(StorageError),
}

impl ReadOutcome {
    pub fn is_present(&self) -> bool {
        matches!(self, ReadOutcome::Loaded(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ReadOutcome::Absent)
    }

    /// The loaded book, discarding any failure
    pub fn loaded(self) -> Option<TransactionBook> {
        match self {
            ReadOutcome::Loaded(book) => Some(book),
            _ => None,
        }
    }

    /// Convert to a `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<Option<TransactionBook>, StorageError> {
        match self {
            ReadOutcome::Absent => Ok(None),
            ReadOutcome::Loaded(book) => Ok(Some(book)),
            ReadOutcome::Failed(err) => Err(err),
        }
    }
}

impl From<Result<Option<TransactionBook>, StorageError>> for ReadOutcome {
    fn from(result: Result<Option<TransactionBook>, StorageError>) -> Self {
        match result {
            Ok(Some(book)) => ReadOutcome::Loaded(book),
            Ok(None) => ReadOutcome::Absent,
            Err(err) => ReadOutcome::Failed(err),
        }
    }
}

/// Persistence for a single transaction book.
///
/// Every operation runs to completion on the calling thread. Implementations
/// do not lock files, so concurrent saves to one path must be serialized by
/// the caller.
pub trait TransactionBookStorage: Send + Sync {
    /// Location used when no explicit path is given
    fn transaction_book_file_path(&self) -> Option<&Path>;

    /// Read from the default location.
    fn read_transaction_book(&self) -> ReadOutcome;

    /// Read from `file_path`. A missing file is `Absent`; any invalid row fails the whole read.
    fn read_transaction_book_from(&self, file_path: &Path) -> ReadOutcome;

    /// Save to the default location.
    fn save_transaction_book(&self, book: &dyn ReadOnlyTransactionBook) -> Result<(), StorageError>;

    /// Save to `file_path`, replacing whatever was there.
    fn save_transaction_book_to(
        &self,
        book: &dyn ReadOnlyTransactionBook,
        file_path: &Path,
    ) -> Result<(), StorageError>;
}
