//! Storage capability traits.
//!
//! The domain layer only ever talks to these interfaces, so storage backends
//! can be swapped without touching domain logic. All operations are
//! synchronous; each request performs at most a handful of store round trips.

use anyhow::Result;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::models::account::IdentityResolution;
use crate::domain::models::transaction::Transaction;
use crate::domain::query::{AccessPath, SortSpec};

/// Raised by `TransactionStore::save` when the identifier already exists.
/// The store is the last line of defense against the non-atomic
/// read-then-increment identifier allocation.
#[derive(Debug, Error)]
#[error("transaction identifier {0} already exists")]
pub struct DuplicateIdError(pub String);

/// Record access for persisted transactions.
pub trait TransactionStore: Send + Sync {
    /// The highest transaction identifier currently in the store, by string
    /// ordering, or `None` for an empty store.
    fn find_highest_id(&self) -> Result<Option<String>>;

    /// Fetch one transaction by identifier.
    fn find_by_id(&self, transaction_id: &str) -> Result<Option<Transaction>>;

    /// Persist a new transaction. Fails with [`DuplicateIdError`] when the
    /// identifier is already taken.
    fn save(&self, transaction: &Transaction) -> Result<Transaction>;

    /// Execute one indexed access path with sorting and offset/limit
    /// pagination. Returns the page plus the total match count.
    fn query(
        &self,
        path: &AccessPath,
        sort: &SortSpec,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Transaction>, u64)>;
}

/// Read access to accounts and the account/card cross-reference.
pub trait AccountStore: Send + Sync {
    /// Resolve the identity fields of a request into an account/card pairing.
    /// At least one of the two arguments is present when this is called.
    fn resolve_link(
        &self,
        account_id: Option<&str>,
        card_number: Option<&str>,
    ) -> Result<IdentityResolution>;

    /// Balance currently owed on an account, `None` for unknown accounts.
    fn current_balance(&self, account_id: &str) -> Result<Option<Decimal>>;
}
