//! CSV-backed transaction repository.
//!
//! Reads are whole-file scans; writes rewrite the file through a temp file
//! and an atomic rename. The account path needs the card cross-reference, so
//! the repository embeds an account repository built from the same
//! connection.

use anyhow::Result;
use csv::{Reader, Writer};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use tracing::info;

use super::account_repository::AccountRepository;
use super::connection::CsvConnection;
use crate::domain::models::transaction::Transaction;
use crate::domain::query::{AccessPath, SortDirection, SortField, SortSpec};
use crate::storage::traits::{DuplicateIdError, TransactionStore};

#[derive(Clone)]
pub struct TransactionRepository {
    connection: CsvConnection,
    accounts: AccountRepository,
}

impl TransactionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        let accounts = AccountRepository::new(connection.clone());
        Self {
            connection,
            accounts,
        }
    }

    /// Read every transaction from the CSV file.
    fn read_transactions(&self) -> Result<Vec<Transaction>> {
        self.connection.ensure_transactions_file_exists()?;
        let file = File::open(self.connection.transactions_file_path())?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut transactions = Vec::new();
        for result in csv_reader.deserialize() {
            let transaction: Transaction = result?;
            transactions.push(transaction);
        }
        Ok(transactions)
    }

    /// Rewrite the whole CSV file through a temp file and an atomic rename.
    fn write_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let file_path = self.connection.transactions_file_path();
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for transaction in transactions {
                csv_writer.serialize(transaction)?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }

    fn matches(&self, path: &AccessPath, transaction: &Transaction) -> Result<bool> {
        let matched = match path {
            AccessPath::ById(id) => transaction.id == *id,
            AccessPath::ByCard {
                card_number,
                date_range,
            } => {
                transaction.card_number == *card_number
                    && date_range.contains(transaction.processing_date)
            }
            AccessPath::ByAccount { .. } => {
                // handled in query() so the card set is resolved once
                true
            }
            AccessPath::ByDateRange(date_range) => {
                date_range.contains(transaction.processing_date)
            }
            AccessPath::ByType(type_code) => transaction.type_code == *type_code,
            AccessPath::ByCategory(category_code) => {
                transaction.category_code == *category_code
            }
            AccessPath::ByAmountRange { min, max } => {
                min.map_or(true, |min| transaction.amount >= min)
                    && max.map_or(true, |max| transaction.amount <= max)
            }
            AccessPath::ByText(fragment) => {
                let needle = fragment.to_lowercase();
                transaction.description.to_lowercase().contains(&needle)
                    || transaction.merchant_name.to_lowercase().contains(&needle)
                    || transaction.merchant_city.to_lowercase().contains(&needle)
            }
            AccessPath::Unfiltered => true,
        };
        Ok(matched)
    }

    fn sort_transactions(transactions: &mut [Transaction], sort: &SortSpec) {
        transactions.sort_by(|a, b| {
            let ordering = match sort.field {
                SortField::ProcessingDate => a
                    .processing_date
                    .cmp(&b.processing_date)
                    .then_with(|| a.id.cmp(&b.id)),
                SortField::OriginalDate => a
                    .original_date
                    .cmp(&b.original_date)
                    .then_with(|| a.id.cmp(&b.id)),
                SortField::Amount => a.amount.cmp(&b.amount).then_with(|| a.id.cmp(&b.id)),
                SortField::Id => a.id.cmp(&b.id),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)),
            };
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

impl TransactionStore for TransactionRepository {
    fn find_highest_id(&self) -> Result<Option<String>> {
        let transactions = self.read_transactions()?;
        Ok(transactions.into_iter().map(|t| t.id).max())
    }

    fn find_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let transactions = self.read_transactions()?;
        Ok(transactions.into_iter().find(|t| t.id == transaction_id))
    }

    fn save(&self, transaction: &Transaction) -> Result<Transaction> {
        let mut transactions = self.read_transactions()?;
        if transactions.iter().any(|t| t.id == transaction.id) {
            return Err(DuplicateIdError(transaction.id.clone()).into());
        }

        transactions.push(transaction.clone());
        self.write_transactions(&transactions)?;

        info!("stored transaction {}", transaction.id);
        Ok(transaction.clone())
    }

    fn query(
        &self,
        path: &AccessPath,
        sort: &SortSpec,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Transaction>, u64)> {
        let transactions = self.read_transactions()?;

        let mut matched = Vec::new();
        if let AccessPath::ByAccount {
            account_id,
            date_range,
        } = path
        {
            // Resolve the account's card set once, then filter against it.
            let cards: HashSet<String> = self
                .accounts
                .cards_for_account(account_id)?
                .into_iter()
                .map(|card| card.card_number)
                .collect();
            for transaction in transactions {
                if cards.contains(&transaction.card_number)
                    && date_range.contains(transaction.processing_date)
                {
                    matched.push(transaction);
                }
            }
        } else {
            for transaction in transactions {
                if self.matches(path, &transaction)? {
                    matched.push(transaction);
                }
            }
        }

        Self::sort_transactions(&mut matched, sort);

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }
}
