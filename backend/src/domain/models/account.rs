//! Domain models for accounts, cards and the account/card cross-reference.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A card account. The ledger core only reads these; account maintenance is
/// owned by a separate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// 11-digit account identifier
    pub account_id: String,
    /// Balance currently owed on the account
    pub current_balance: Decimal,
    pub credit_limit: Decimal,
    pub open_date: NaiveDate,
}

/// A card linked to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// 16-digit card number
    pub card_number: String,
    /// Owning 11-digit account identifier
    pub account_id: String,
    /// Name embossed on the card
    pub embossed_name: String,
    pub active: bool,
}

/// A resolved account/card pairing for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardAccountLink {
    pub account_id: String,
    pub card_number: String,
}

/// Result of resolving the identity fields of an add request against the
/// account store. Produced once per request, then consumed by the validation
/// pipeline so the cross-reference rule itself stays a pure function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityResolution {
    /// Neither an account identifier nor a card number was supplied.
    Missing,
    /// The supplied account identifier does not exist.
    UnknownAccount(String),
    /// The supplied card number does not exist.
    UnknownCard(String),
    /// The account exists but has no card linked to it.
    Unlinked(String),
    /// The card exists but is not currently active.
    InactiveCard(String),
    /// Both were supplied but the card belongs to a different account.
    Mismatch {
        account_id: String,
        card_number: String,
    },
    Resolved(CardAccountLink),
}
