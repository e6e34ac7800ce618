//! The transaction book: an ordered collection of transactions with unique ids.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::id_registry::IdRegistry;
use crate::domain::models::transaction::{Transaction, TransactionDirection, TransactionId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    #[error("Transaction id {0} is already present in the book")]
    DuplicateIdentifier(TransactionId),
    #[error("Transaction id {0} is not present in the book")]
    TransactionNotFound(TransactionId),
}

/// Read-only view of a transaction book.
///
/// Storage and presentation code take this instead of `TransactionBook` so
/// that they cannot mutate the ledger they were handed.
pub trait ReadOnlyTransactionBook {
    /// Transactions in insertion order
    fn transaction_list(&self) -> &[Transaction];

    fn contains_id(&self, id: TransactionId) -> bool {
        self.transaction_list().iter().any(|t| t.id() == id)
    }

    fn total_expense(&self) -> Decimal {
        total_for(self.transaction_list(), TransactionDirection::Expense)
    }

    fn total_revenue(&self) -> Decimal {
        total_for(self.transaction_list(), TransactionDirection::Revenue)
    }

    /// Revenue minus expense
    fn net_balance(&self) -> Decimal {
        self.transaction_list().iter().map(Transaction::signed_amount).sum()
    }
}

fn total_for(transactions: &[Transaction], direction: TransactionDirection) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.direction() == direction)
        .map(Transaction::amount)
        .sum()
}

/// First identifier that appears more than once, if any
fn first_duplicate(transactions: &[Transaction]) -> Option<TransactionId> {
    let mut seen = HashSet::with_capacity(transactions.len());
    transactions.iter().map(Transaction::id).find(|id| !seen.insert(*id))
}

/// Ordered, mutable ledger. No two contained transactions share an id.
///
/// Two books are equal when their sequences are equal element by element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionBook {
    transactions: Vec<Transaction>,
}

impl TransactionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from `transactions`, keeping their order.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Result<Self, BookError> {
        if let Some(id) = first_duplicate(&transactions) {
            return Err(BookError::DuplicateIdentifier(id));
        }
        Ok(Self { transactions })
    }

    /// Build a book from transactions whose ids the caller has already checked.
    pub(crate) fn from_unique_transactions(transactions: Vec<Transaction>) -> Self {
        debug_assert!(first_duplicate(&transactions).is_none());
        Self { transactions }
    }

    /// Copy the entries of another book, re-checking id uniqueness.
    pub fn from_read_only(book: &dyn ReadOnlyTransactionBook) -> Result<Self, BookError> {
        Self::from_transactions(book.transaction_list().to_vec())
    }

    /// Append a transaction. The book is unchanged if the id is already taken.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), BookError> {
        if self.has_transaction(transaction.id()) {
            return Err(BookError::DuplicateIdentifier(transaction.id()));
        }
        debug!("Adding transaction {}", transaction.id());
        self.transactions.push(transaction);
        Ok(())
    }

    pub fn has_transaction(&self, id: TransactionId) -> bool {
        self.contains_id(id)
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    /// Remove and return the transaction with `id`, keeping the order of the rest.
    pub fn remove_transaction(&mut self, id: TransactionId) -> Result<Transaction, BookError> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id() == id)
            .ok_or(BookError::TransactionNotFound(id))?;
        Ok(self.transactions.remove(index))
    }

    /// Replace every entry. Nothing changes if `transactions` contains a duplicate id.
    pub fn set_transactions(&mut self, transactions: Vec<Transaction>) -> Result<(), BookError> {
        *self = Self::from_transactions(transactions)?;
        Ok(())
    }

    /// Replace every entry with the contents of `book`.
    pub fn reset_data(&mut self, book: &dyn ReadOnlyTransactionBook) -> Result<(), BookError> {
        self.set_transactions(book.transaction_list().to_vec())
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    /// Mark every id in this book as used in `registry`.
    ///
    /// Returns the ids the registry already considered in use.
    pub fn reserve_ids(&self, registry: &IdRegistry) -> Vec<TransactionId> {
        self.transactions
            .iter()
            .map(Transaction::id)
            .filter(|id| !registry.reserve(*id))
            .collect()
    }

    /// Free every id in this book from `registry`.
    pub fn release_ids(&self, registry: &IdRegistry) {
        for transaction in &self.transactions {
            registry.release(transaction.id());
        }
    }
}

impl ReadOnlyTransactionBook for TransactionBook {
    fn transaction_list(&self) -> &[Transaction] {
        &self.transactions
    }
}

impl<'a> IntoIterator for &'a TransactionBook {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
