//! Domain model for a ledger transaction.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::domain::id_registry::IdRegistry;

/// Identifier of a transaction, unique among the transactions held in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(u32);

impl TransactionId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self)
    }
}

/// Whether money left the ledger or came into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionDirection {
    /// Money spent
    Expense,
    /// Money received
    Revenue,
}

impl TransactionDirection {
    /// The literal used for this direction in persisted files
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionDirection::Expense => "expense",
            TransactionDirection::Revenue => "revenue",
        }
    }
}

impl fmt::Display for TransactionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction direction '{0}', expected 'expense' or 'revenue'")]
pub struct UnknownDirection(pub String);

impl FromStr for TransactionDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(TransactionDirection::Expense),
            "revenue" => Ok(TransactionDirection::Revenue),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTransaction {
    #[error("Description cannot be empty")]
    EmptyDescription,
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

/// A single immutable ledger entry.
///
/// Equality compares every field, the identifier included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: TransactionId,
    direction: TransactionDirection,
    amount: Decimal,
    description: String,
    date: NaiveDate,
    category: String,
}

impl Transaction {
    /// Create a transaction with a fresh identifier drawn from `registry`.
    ///
    /// The fields are validated before an identifier is allocated, so a
    /// rejected transaction never holds a reservation.
    pub fn new(
        registry: &IdRegistry,
        direction: TransactionDirection,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Result<Self, InvalidTransaction> {
        let description = description.into();
        Self::validate(amount, &description)?;
        Ok(Self {
            id: registry.allocate(),
            direction,
            amount,
            description,
            date,
            category: category.into(),
        })
    }

    /// Create a transaction carrying an identifier that was assigned elsewhere,
    /// e.g. one read back from a saved file.
    pub fn with_id(
        id: TransactionId,
        direction: TransactionDirection,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Result<Self, InvalidTransaction> {
        let description = description.into();
        Self::validate(amount, &description)?;
        Ok(Self {
            id,
            direction,
            amount,
            description,
            date,
            category: category.into(),
        })
    }

    fn validate(amount: Decimal, description: &str) -> Result<(), InvalidTransaction> {
        if amount <= Decimal::ZERO {
            return Err(InvalidTransaction::NonPositiveAmount(amount));
        }
        if description.trim().is_empty() {
            return Err(InvalidTransaction::EmptyDescription);
        }
        Ok(())
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn direction(&self) -> TransactionDirection {
        self.direction
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Amount with its sign applied: negative for expenses
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            TransactionDirection::Expense => -self.amount,
            TransactionDirection::Revenue => self.amount,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_expense(&self) -> bool {
        self.direction == TransactionDirection::Expense
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} '{}' on {} [{}]",
            self.id, self.direction, self.amount, self.description, self.date, self.category
        )
    }
}
