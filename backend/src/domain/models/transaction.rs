//! Domain model for a persisted ledger transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of characters in a transaction identifier.
pub const TRANSACTION_ID_LENGTH: usize = 16;

/// A ledger transaction as held in the record store.
///
/// The identifier is assigned exactly once at write time and never changes.
/// `created_at`/`updated_at` are audit timestamps; the domain never mutates a
/// transaction after creation, so they differ only when an unrelated
/// maintenance process refreshes the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Fixed-width 16-character alphanumeric identifier, unique in the store
    pub id: String,
    /// Transaction type code from the closed reference set
    pub type_code: String,
    /// Transaction category code from the closed reference set
    pub category_code: String,
    /// Originating system
    pub source: String,
    pub description: String,
    /// Signed amount, scale exactly 2 (never binary floating point)
    pub amount: Decimal,
    /// Card the transaction was charged against
    pub card_number: String,
    pub merchant_id: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub merchant_zip: String,
    /// Calendar date the transaction originally occurred
    pub original_date: NaiveDate,
    /// Calendar date the transaction was processed
    pub processing_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Whether a candidate string has the shape of a transaction identifier:
    /// exactly 16 alphanumeric characters.
    pub fn is_well_formed_id(candidate: &str) -> bool {
        candidate.len() == TRANSACTION_ID_LENGTH
            && candidate.chars().all(|c| c.is_ascii_alphanumeric())
    }
}
