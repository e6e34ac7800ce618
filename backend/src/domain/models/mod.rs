pub mod transaction;

pub use transaction::{
    InvalidTransaction, Transaction, TransactionDirection, TransactionId, UnknownDirection,
};
