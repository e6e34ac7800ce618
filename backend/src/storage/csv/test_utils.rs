//! Test utilities for CSV storage tests
//!
//! `TestEnvironment` owns a temporary directory that is removed when the
//! environment is dropped, even if the test panics.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::TempDir;

use crate::domain::models::transaction::{Transaction, TransactionDirection, TransactionId};
use crate::domain::transaction_book::TransactionBook;

/// RAII test environment backed by a temporary directory
pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("transact_test_")?;
        let base_path = temp_dir.path().to_path_buf();
        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// Path of `name` inside the environment; the file is not created
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Write `contents` to `name` and return its path
    pub fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.file_path(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Checked-in fixture files for CSV storage tests
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join("csv_transaction_book_storage")
        .join(name)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn transaction(
    id: u32,
    direction: TransactionDirection,
    amount: Decimal,
    description: &str,
    date: NaiveDate,
    category: &str,
) -> Transaction {
    Transaction::with_id(TransactionId::new(id), direction, amount, description, date, category)
        .unwrap()
}

/// Book of four everyday transactions with ids 1 to 4
pub fn typical_transaction_book() -> TransactionBook {
    TransactionBook::from_transactions(vec![
        transaction(1, TransactionDirection::Expense, Decimal::new(1000, 2), "lunch", date(2024, 1, 1), "food"),
        transaction(2, TransactionDirection::Revenue, Decimal::new(250000, 2), "January salary", date(2024, 1, 25), "salary"),
        transaction(3, TransactionDirection::Expense, Decimal::new(8999, 2), "Concert tickets", date(2024, 2, 3), "entertainment"),
        transaction(4, TransactionDirection::Expense, Decimal::new(120, 0), "Electricity, Q1", date(2024, 3, 31), "utilities"),
    ])
    .unwrap()
}

/// An expense whose id is not in `typical_transaction_book`
pub fn transaction_expense() -> Transaction {
    transaction(5, TransactionDirection::Expense, Decimal::new(4550, 2), "Groceries", date(2024, 4, 2), "food")
}

/// A revenue whose id is not in `typical_transaction_book`
pub fn transaction_revenue() -> Transaction {
    transaction(6, TransactionDirection::Revenue, Decimal::new(7500, 2), "Sold old bike", date(2024, 4, 6), "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() -> Result<()> {
        let base_path;
        {
            let env = TestEnvironment::new()?;
            base_path = env.base_directory().to_path_buf();
            env.write_file("test_file.txt", "test data")?;
            assert!(base_path.join("test_file.txt").exists());
        }
        assert!(!base_path.exists());
        Ok(())
    }

    #[test]
    fn test_fixture_ids_are_distinct() {
        let book = typical_transaction_book();
        assert!(!book.has_transaction(transaction_expense().id()));
        assert!(!book.has_transaction(transaction_revenue().id()));
    }
}
