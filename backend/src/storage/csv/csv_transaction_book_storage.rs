use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::domain::models::transaction::{Transaction, TransactionDirection, TransactionId};
use crate::domain::transaction_book::{ReadOnlyTransactionBook, TransactionBook};
use crate::storage::error::{DataLoadingError, RowError, StorageError};
use crate::storage::traits::{ReadOutcome, TransactionBookStorage};

/// Column order of every transaction file
pub const HEADER: [&str; 6] = ["id", "direction", "amount", "description", "date", "category"];

/// Date format of the `date` column (ISO-8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of a transaction file, before validation
#[derive(Debug, Serialize, Deserialize)]
struct CsvTransactionRow {
    id: String,
    direction: String,
    amount: String,
    description: String,
    date: String,
    category: String,
}

impl From<&Transaction> for CsvTransactionRow {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id().to_string(),
            direction: transaction.direction().as_str().to_string(),
            amount: transaction.amount().to_string(),
            description: transaction.description().to_string(),
            date: transaction.date().format(DATE_FORMAT).to_string(),
            category: transaction.category().to_string(),
        }
    }
}

impl TryFrom<CsvTransactionRow> for Transaction {
    type Error = RowError;

    fn try_from(row: CsvTransactionRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .parse::<TransactionId>()
            .map_err(|_| RowError::InvalidId(row.id.clone()))?;
        let direction = row.direction.parse::<TransactionDirection>()?;
        let amount = row
            .amount
            .parse::<Decimal>()
            .map_err(|_| RowError::InvalidAmount(row.amount.clone()))?;
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
            .map_err(|_| RowError::InvalidDate(row.date.clone()))?;

        Ok(Transaction::with_id(
            id,
            direction,
            amount,
            row.description,
            date,
            row.category,
        )?)
    }
}

/// CSV-based transaction book storage.
///
/// Holds an optional default file location that is used whenever a read or
/// save is called without an explicit path.
#[derive(Debug, Clone, Default)]
pub struct CsvTransactionBookStorage {
    file_path: Option<PathBuf>,
}

impl CsvTransactionBookStorage {
    /// Create a storage whose default location is `file_path`
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: Some(file_path.into()),
        }
    }

    /// Create a storage with no default location; every call must name a path
    pub fn without_default_path() -> Self {
        Self::default()
    }

    fn resolve_path<'a>(&'a self, explicit: Option<&'a Path>) -> Result<&'a Path, StorageError> {
        explicit
            .or(self.file_path.as_deref())
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(StorageError::MissingPath)
    }

    fn read_from(&self, explicit: Option<&Path>) -> Result<Option<TransactionBook>, StorageError> {
        let file_path = self.resolve_path(explicit)?;
        read_book(file_path)
    }

    fn save_to(
        &self,
        book: &dyn ReadOnlyTransactionBook,
        explicit: Option<&Path>,
    ) -> Result<(), StorageError> {
        let file_path = self.resolve_path(explicit)?;
        write_book(book.transaction_list(), file_path)
    }
}

impl TransactionBookStorage for CsvTransactionBookStorage {
    fn transaction_book_file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn read_transaction_book(&self) -> ReadOutcome {
        self.read_from(None).into()
    }

    fn read_transaction_book_from(&self, file_path: &Path) -> ReadOutcome {
        self.read_from(Some(file_path)).into()
    }

    fn save_transaction_book(&self, book: &dyn ReadOnlyTransactionBook) -> Result<(), StorageError> {
        self.save_to(book, None)
    }

    fn save_transaction_book_to(
        &self,
        book: &dyn ReadOnlyTransactionBook,
        file_path: &Path,
    ) -> Result<(), StorageError> {
        self.save_to(book, Some(file_path))
    }
}

/// Read every row of `file_path` into a book.
///
/// All rows are parsed and checked before the book is built, so a single bad
/// row (or a repeated id) rejects the whole file.
fn read_book(file_path: &Path) -> Result<Option<TransactionBook>, StorageError> {
    let file = match File::open(file_path) {
        Ok(file) => file,
        Err(err) if is_missing(file_path, &err) => {
            info!("No transaction book at {}", file_path.display());
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    info!("📂 Reading transaction book from {}", file_path.display());
    let data_error = |line: u64, reason: RowError| {
        warn!("Rejecting {} at line {}: {}", file_path.display(), line, reason);
        DataLoadingError {
            path: file_path.to_path_buf(),
            line,
            reason,
        }
    };

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut transactions = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut record = StringRecord::new();
    let mut first_row = true;

    loop {
        match csv_reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                let line = err.position().map_or(0, |p| p.line());
                let message = err.to_string();
                return Err(match err.into_kind() {
                    csv::ErrorKind::Io(io_err) => StorageError::Io(io_err),
                    _ => data_error(line, RowError::Malformed(message)).into(),
                });
            }
        }
        let line = record.position().map_or(0, |p| p.line());

        if std::mem::take(&mut first_row) && looks_like_header(&record) {
            if record.iter().ne(HEADER.iter().copied()) {
                let header = record.iter().collect::<Vec<_>>().join(",");
                return Err(data_error(line, RowError::MalformedHeader(header)).into());
            }
            continue;
        }

        let transaction = parse_record(&record).map_err(|reason| data_error(line, reason))?;
        if !seen_ids.insert(transaction.id()) {
            return Err(data_error(line, RowError::DuplicateIdentifier(transaction.id())).into());
        }
        transactions.push(transaction);
    }

    // Every id was checked against `seen_ids` above.
    let book = TransactionBook::from_unique_transactions(transactions);
    info!("✅ Loaded {} transactions from {}", book.len(), file_path.display());
    Ok(Some(book))
}

/// Whether `err` from opening `file_path` means nothing exists there.
///
/// A path that runs through a regular file (`ledger.csv/book.csv`) cannot
/// exist either, even though the OS reports it as "not a directory".
fn is_missing(file_path: &Path, err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
        || file_path.ancestors().skip(1).any(|ancestor| ancestor.is_file())
}

/// Files written by this storage start with `HEADER`; hand-made files may omit it.
fn looks_like_header(record: &StringRecord) -> bool {
    record.get(0) == Some(HEADER[0])
}

fn parse_record(record: &StringRecord) -> Result<Transaction, RowError> {
    if record.len() != HEADER.len() {
        return Err(RowError::WrongColumnCount {
            expected: HEADER.len(),
            found: record.len(),
        });
    }
    let row: CsvTransactionRow = record
        .deserialize(None)
        .map_err(|err| RowError::Malformed(err.to_string()))?;
    Transaction::try_from(row)
}

/// Write `transactions` to `file_path`, replacing any existing content.
///
/// Rows go to a fresh temporary file in the target directory, which is then
/// renamed over the target, so a failed save leaves the old file intact. A
/// symlinked ledger is written through to the file it points at, and an
/// existing file keeps its permissions.
fn write_book(transactions: &[Transaction], file_path: &Path) -> Result<(), StorageError> {
    let target = fs::canonicalize(file_path).unwrap_or_else(|_| file_path.to_path_buf());
    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory)?;

    let temp_file = NamedTempFile::new_in(directory)?;
    debug!("Writing {} transactions to {}", transactions.len(), temp_file.path().display());
    if let Ok(metadata) = fs::metadata(&target) {
        fs::set_permissions(temp_file.path(), metadata.permissions())?;
    }

    // Dropping `temp_file` on an early return removes it.
    write_rows(transactions, temp_file.as_file())?;
    temp_file
        .persist(&target)
        .map_err(|err| StorageError::Io(err.error))?;

    info!("💾 Saved {} transactions to {}", transactions.len(), target.display());
    Ok(())
}

fn write_rows(transactions: &[Transaction], file: &File) -> Result<(), StorageError> {
    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    csv_writer.write_record(HEADER)?;
    for transaction in transactions {
        csv_writer.serialize(CsvTransactionRow::from(transaction))?;
    }

    csv_writer.flush()?;
    Ok(())
}
