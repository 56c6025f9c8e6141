//! CSV-backed account and card repository.
//!
//! The ledger core only reads accounts; the write methods exist for seeding
//! and tests. Cards live in their own file keyed by card number with the
//! owning account alongside, which is the cross-reference the resolution and
//! the account query path both join through.

use anyhow::Result;
use csv::{Reader, Writer};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::account::{Account, Card, CardAccountLink, IdentityResolution};
use crate::storage::traits::AccountStore;
use rust_decimal::Decimal;

#[derive(Clone)]
pub struct AccountRepository {
    connection: CsvConnection,
}

impl AccountRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_accounts(&self) -> Result<Vec<Account>> {
        self.connection.ensure_accounts_file_exists()?;
        let file = File::open(self.connection.accounts_file_path())?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut accounts = Vec::new();
        for result in csv_reader.deserialize() {
            let account: Account = result?;
            accounts.push(account);
        }
        Ok(accounts)
    }

    fn read_cards(&self) -> Result<Vec<Card>> {
        self.connection.ensure_cards_file_exists()?;
        let file = File::open(self.connection.cards_file_path())?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut cards = Vec::new();
        for result in csv_reader.deserialize() {
            let card: Card = result?;
            cards.push(card);
        }
        Ok(cards)
    }

    fn write_accounts(&self, accounts: &[Account]) -> Result<()> {
        let file_path = self.connection.accounts_file_path();
        let temp_path = file_path.with_extension("tmp");
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for account in accounts {
                csv_writer.serialize(account)?;
            }
            csv_writer.flush()?;
        }
        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }

    fn write_cards(&self, cards: &[Card]) -> Result<()> {
        let file_path = self.connection.cards_file_path();
        let temp_path = file_path.with_extension("tmp");
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for card in cards {
                csv_writer.serialize(card)?;
            }
            csv_writer.flush()?;
        }
        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }

    /// Insert or replace an account record.
    pub fn save_account(&self, account: &Account) -> Result<()> {
        let mut accounts = self.read_accounts()?;
        accounts.retain(|existing| existing.account_id != account.account_id);
        accounts.push(account.clone());
        self.write_accounts(&accounts)
    }

    /// Insert or replace a card record.
    pub fn save_card(&self, card: &Card) -> Result<()> {
        let mut cards = self.read_cards()?;
        cards.retain(|existing| existing.card_number != card.card_number);
        cards.push(card.clone());
        self.write_cards(&cards)
    }

    pub fn find_account(&self, account_id: &str) -> Result<Option<Account>> {
        let accounts = self.read_accounts()?;
        Ok(accounts
            .into_iter()
            .find(|account| account.account_id == account_id))
    }

    pub fn find_card(&self, card_number: &str) -> Result<Option<Card>> {
        let cards = self.read_cards()?;
        Ok(cards.into_iter().find(|card| card.card_number == card_number))
    }

    /// Every card linked to an account, in file order.
    pub fn cards_for_account(&self, account_id: &str) -> Result<Vec<Card>> {
        let cards = self.read_cards()?;
        Ok(cards
            .into_iter()
            .filter(|card| card.account_id == account_id)
            .collect())
    }
}

impl AccountStore for AccountRepository {
    fn resolve_link(
        &self,
        account_id: Option<&str>,
        card_number: Option<&str>,
    ) -> Result<IdentityResolution> {
        match (account_id, card_number) {
            (None, None) => Ok(IdentityResolution::Missing),
            (Some(account_id), Some(card_number)) => {
                let Some(card) = self.find_card(card_number)? else {
                    return Ok(IdentityResolution::UnknownCard(card_number.to_string()));
                };
                if card.account_id != account_id {
                    return Ok(IdentityResolution::Mismatch {
                        account_id: account_id.to_string(),
                        card_number: card_number.to_string(),
                    });
                }
                if self.find_account(account_id)?.is_none() {
                    return Ok(IdentityResolution::UnknownAccount(account_id.to_string()));
                }
                if !card.active {
                    return Ok(IdentityResolution::InactiveCard(card_number.to_string()));
                }
                Ok(IdentityResolution::Resolved(CardAccountLink {
                    account_id: account_id.to_string(),
                    card_number: card_number.to_string(),
                }))
            }
            (Some(account_id), None) => {
                if self.find_account(account_id)?.is_none() {
                    return Ok(IdentityResolution::UnknownAccount(account_id.to_string()));
                }
                let cards = self.cards_for_account(account_id)?;
                match cards.into_iter().find(|card| card.active) {
                    Some(card) => Ok(IdentityResolution::Resolved(CardAccountLink {
                        account_id: account_id.to_string(),
                        card_number: card.card_number,
                    })),
                    None => Ok(IdentityResolution::Unlinked(account_id.to_string())),
                }
            }
            (None, Some(card_number)) => {
                let Some(card) = self.find_card(card_number)? else {
                    return Ok(IdentityResolution::UnknownCard(card_number.to_string()));
                };
                if !card.active {
                    return Ok(IdentityResolution::InactiveCard(card_number.to_string()));
                }
                if self.find_account(&card.account_id)?.is_none() {
                    return Ok(IdentityResolution::UnknownAccount(card.account_id));
                }
                Ok(IdentityResolution::Resolved(CardAccountLink {
                    account_id: card.account_id,
                    card_number: card_number.to_string(),
                }))
            }
        }
    }

    fn current_balance(&self, account_id: &str) -> Result<Option<Decimal>> {
        Ok(self
            .find_account(account_id)?
            .map(|account| account.current_balance))
    }
}
