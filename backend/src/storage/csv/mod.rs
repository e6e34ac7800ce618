//! # CSV Storage Module
//!
//! File-backed transaction book storage. One file holds one book, one row
//! per transaction, in book order.
//!
//! ## File Format
//!
//! ```csv
//! id,direction,amount,description,date,category
//! 1,expense,10.00,lunch,2024-01-01,food
//! 2,revenue,2500.00,January salary,2024-01-25,salary
//! ```
//!
//! - `direction` is `expense` or `revenue`
//! - `amount` is a strictly positive decimal, written with its original scale
//! - `date` is `YYYY-MM-DD`
//! - the header row is always written; files without one are still read

pub mod csv_transaction_book_storage;

#[cfg(test)]
pub mod test_utils;

pub use csv_transaction_book_storage::{CsvTransactionBookStorage, DATE_FORMAT, HEADER};
