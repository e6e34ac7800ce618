//! # Transact Backend
//!
//! Personal transaction ledger: the transaction book and its identifier
//! registry, plus file-backed persistence of the book.
//!
//! ```no_run
//! use transact_backend::{CsvTransactionBookStorage, TransactionBook, TransactionBookStorage};
//!
//! let storage = CsvTransactionBookStorage::new("ledger.csv");
//! let book = storage
//!     .read_transaction_book()
//!     .into_result()?
//!     .unwrap_or_default();
//! storage.save_transaction_book(&book)?;
//! # Ok::<(), transact_backend::StorageError>(())
//! ```

pub mod config;
pub mod domain;
pub mod storage;

pub use config::{ConfigError, DataFileConfig};
pub use domain::{
    BookError, IdRegistry, InvalidTransaction, ReadOnlyTransactionBook, Transaction,
    TransactionBook, TransactionDirection, TransactionId,
};
pub use storage::{
    CsvTransactionBookStorage, DataLoadingError, ReadOutcome, RowError, StorageError,
    TransactionBookStorage,
};
