//! # Domain Module
//!
//! Ledger model: transactions, the book that holds them and the registry
//! that hands out their identifiers. Nothing in here touches the filesystem.

pub mod id_registry;
pub mod models;
pub mod transaction_book;

pub use id_registry::IdRegistry;
pub use models::{InvalidTransaction, Transaction, TransactionDirection, TransactionId};
pub use transaction_book::{BookError, ReadOnlyTransactionBook, TransactionBook};
