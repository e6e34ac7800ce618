//! Resolution of the default transaction book file.
//!
//! Order of precedence:
//! 1. `TRANSACT_DATA_FILE` environment variable
//! 2. `~/Documents/Transact/transactions.csv`, unless that directory holds a
//!    `.transact_redirect` file naming another existing directory

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::storage::csv::CsvTransactionBookStorage;

/// Environment variable overriding the ledger file location
pub const DATA_FILE_ENV: &str = "TRANSACT_DATA_FILE";

const DATA_DIRECTORY_NAME: &str = "Transact";
const DATA_FILE_NAME: &str = "transactions.csv";
const REDIRECT_FILE_NAME: &str = ".transact_redirect";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,
}

/// Where the transaction book lives when no path is given explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFileConfig {
    data_file: PathBuf,
}

impl DataFileConfig {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    /// Resolve from the process environment and the user's home directory.
    ///
    /// Never creates anything on disk.
    pub fn resolve() -> Result<Self, ConfigError> {
        Self::resolve_with(std::env::var_os(DATA_FILE_ENV), dirs::home_dir())
    }

    fn resolve_with(
        env_override: Option<OsString>,
        home_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = env_override.filter(|p| !p.is_empty()) {
            info!("Using ledger file from {}: {}", DATA_FILE_ENV, Path::new(&path).display());
            return Ok(Self::new(path));
        }

        let home_dir = home_dir.ok_or(ConfigError::NoHomeDirectory)?;
        let default_directory = home_dir.join("Documents").join(DATA_DIRECTORY_NAME);
        let directory = follow_redirect(default_directory);
        Ok(Self::new(directory.join(DATA_FILE_NAME)))
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Storage whose default location is this file
    pub fn storage(&self) -> CsvTransactionBookStorage {
        CsvTransactionBookStorage::new(&self.data_file)
    }
}

/// The directory named by a redirect file in `default_directory`, if it exists
fn follow_redirect(default_directory: PathBuf) -> PathBuf {
    let redirect_file = default_directory.join(REDIRECT_FILE_NAME);
    if !redirect_file.exists() {
        info!("No redirect file found, using data directory: {}", default_directory.display());
        return default_directory;
    }

    match fs::read_to_string(&redirect_file) {
        Ok(content) => {
            let redirected = PathBuf::from(content.trim());
            if redirected.is_dir() {
                info!("Found redirect file, using data directory: {}", redirected.display());
                redirected
            } else {
                warn!(
                    "Redirect file points to non-existent directory: {}. Using default.",
                    redirected.display()
                );
                default_directory
            }
        }
        Err(e) => {
            error!("Failed to read redirect file: {}. Using default directory.", e);
            default_directory
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TransactionBookStorage;
    use tempfile::TempDir;

    #[test]
    fn test_env_override_wins() {
        let config = DataFileConfig::resolve_with(
            Some(OsString::from("/tmp/ledger.csv")),
            Some(PathBuf::from("/home/someone")),
        )
        .unwrap();
        assert_eq!(config.data_file(), Path::new("/tmp/ledger.csv"));
    }

    #[test]
    fn test_empty_env_override_is_ignored() {
        let config =
            DataFileConfig::resolve_with(Some(OsString::new()), Some(PathBuf::from("/home/someone")))
                .unwrap();
        assert_eq!(
            config.data_file(),
            Path::new("/home/someone/Documents/Transact/transactions.csv")
        );
    }

    #[test]
    fn test_missing_home_is_an_error() {
        let result = DataFileConfig::resolve_with(None, None);
        assert!(matches!(result, Err(ConfigError::NoHomeDirectory)));
    }

    #[test]
    fn test_redirect_file_is_followed() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let target = TempDir::new()?;
        let default_directory = home.path().join("Documents").join(DATA_DIRECTORY_NAME);
        fs::create_dir_all(&default_directory)?;
        fs::write(
            default_directory.join(REDIRECT_FILE_NAME),
            format!("{}\n", target.path().display()),
        )?;

        let config = DataFileConfig::resolve_with(None, Some(home.path().to_path_buf()))?;
        assert_eq!(config.data_file(), target.path().join(DATA_FILE_NAME));
        Ok(())
    }

    #[test]
    fn test_dangling_redirect_falls_back_to_default() -> anyhow::Result<()> {
        let home = TempDir::new()?;
        let default_directory = home.path().join("Documents").join(DATA_DIRECTORY_NAME);
        fs::create_dir_all(&default_directory)?;
        fs::write(default_directory.join(REDIRECT_FILE_NAME), "/does/not/exist")?;

        let config = DataFileConfig::resolve_with(None, Some(home.path().to_path_buf()))?;
        assert_eq!(config.data_file(), default_directory.join(DATA_FILE_NAME));
        Ok(())
    }

    #[test]
    fn test_storage_uses_data_file_as_default() {
        let config = DataFileConfig::new("/var/ledger/book.csv");
        let storage = config.storage();
        assert_eq!(
            storage.transaction_book_file_path(),
            Some(Path::new("/var/ledger/book.csv"))
        );
    }
}
