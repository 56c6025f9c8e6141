//! CsvConnection manages the data directory and the CSV files inside it.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const TRANSACTIONS_FILE: &str = "transactions.csv";
const ACCOUNTS_FILE: &str = "accounts.csv";
const CARDS_FILE: &str = "cards.csv";

const TRANSACTIONS_HEADER: &str = "id,type_code,category_code,source,description,amount,card_number,merchant_id,merchant_name,merchant_city,merchant_zip,original_date,processing_date,created_at,updated_at\n";
const ACCOUNTS_HEADER: &str = "account_id,current_balance,credit_limit,open_date\n";
const CARDS_HEADER: &str = "card_number,account_id,embossed_name,active\n";

/// Shared handle to one data directory. Cloning is cheap; repositories built
/// from the same connection operate on the same files.
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Open (and if necessary create) a data directory.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn transactions_file_path(&self) -> PathBuf {
        self.base_directory.join(TRANSACTIONS_FILE)
    }

    pub fn accounts_file_path(&self) -> PathBuf {
        self.base_directory.join(ACCOUNTS_FILE)
    }

    pub fn cards_file_path(&self) -> PathBuf {
        self.base_directory.join(CARDS_FILE)
    }

    /// Create an empty CSV file with its header when it does not exist yet.
    pub fn ensure_file_exists(&self, path: &Path, header: &str) -> Result<()> {
        if !path.exists() {
            fs::write(path, header)?;
        }
        Ok(())
    }

    pub fn ensure_transactions_file_exists(&self) -> Result<()> {
        self.ensure_file_exists(&self.transactions_file_path(), TRANSACTIONS_HEADER)
    }

    pub fn ensure_accounts_file_exists(&self) -> Result<()> {
        self.ensure_file_exists(&self.accounts_file_path(), ACCOUNTS_HEADER)
    }

    pub fn ensure_cards_file_exists(&self) -> Result<()> {
        self.ensure_file_exists(&self.cards_file_path(), CARDS_HEADER)
    }

    /// Seed a fresh data directory with a pair of demo accounts so the
    /// server is usable straight after first start. Existing files are left
    /// untouched.
    pub fn ensure_seed_data(&self) -> Result<()> {
        self.ensure_transactions_file_exists()?;
        if !self.accounts_file_path().exists() {
            info!(
                "seeding demo accounts in {}",
                self.base_directory.display()
            );
            fs::write(
                self.accounts_file_path(),
                format!(
                    "{ACCOUNTS_HEADER}12345678901,0.00,5000.00,2020-01-01\n98765432109,250.00,2500.00,2021-07-15\n"
                ),
            )?;
        }
        if !self.cards_file_path().exists() {
            fs::write(
                self.cards_file_path(),
                format!(
                    "{CARDS_HEADER}4111111111111111,12345678901,JANE DOE,true\n5500000000000004,98765432109,JOHN ROE,true\n"
                ),
            )?;
        }
        Ok(())
    }
}
