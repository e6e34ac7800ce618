use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use transact_backend::{
    DataFileConfig, IdRegistry, ReadOnlyTransactionBook, TransactionBook, TransactionBookStorage,
    TransactionId,
};

#[derive(Debug, Parser)]
#[command(name = "transact")]
#[command(version)]
#[command(about = "Load a personal transaction ledger and summarize it", long_about = None)]
struct Cli {
    /// Ledger file to read (defaults to $TRANSACT_DATA_FILE or ~/Documents/Transact/transactions.csv)
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match cli.file {
        Some(path) => DataFileConfig::new(path),
        None => DataFileConfig::resolve().context("Failed to resolve the ledger file location")?,
    };
    let storage = config.storage();

    let loaded = storage
        .read_transaction_book()
        .into_result()
        .with_context(|| format!("Failed to load ledger from {}", config.data_file().display()))?;

    let registry = IdRegistry::new();
    let book = match loaded {
        Some(book) => {
            let clashes = book.reserve_ids(&registry);
            if !clashes.is_empty() {
                warn!("Transaction ids already in use: {:?}", clashes);
            }
            book
        }
        None => {
            info!(
                "No ledger at {}, starting with an empty ledger",
                config.data_file().display()
            );
            TransactionBook::new()
        }
    };
    info!(
        "{} transaction ids reserved, next new transaction gets id {}",
        registry.len(),
        next_free_id(&registry)
    );

    println!(
        "{} transactions | expense {} | revenue {} | net {}",
        book.len(),
        book.total_expense(),
        book.total_revenue(),
        book.net_balance()
    );
    Ok(())
}

/// The id the next allocation would return, without keeping it reserved
fn next_free_id(registry: &IdRegistry) -> TransactionId {
    let id = registry.allocate();
    registry.release(id);
    id
}
