//! # Storage Module
//!
//! Persistence for the transaction book, behind the `TransactionBookStorage`
//! trait, with a CSV implementation.

pub mod csv;
pub mod error;
pub mod traits;

pub use self::csv::CsvTransactionBookStorage;
pub use error::{DataLoadingError, RowError, StorageError};
pub use traits::{ReadOutcome, TransactionBookStorage};
