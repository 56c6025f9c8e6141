//! Transaction identifier allocation.
//!
//! Identifiers are 16-character strings. The normal scheme is sequential:
//! read the highest identifier in the store, add one, zero-pad to 16 digits.
//! When the store holds nothing the sequence starts at
//! `0000000000000001`. A current maximum that does not parse as a number
//! (externally seeded or corrupt data), or a failed read, falls back to a
//! random uppercase alphanumeric token that is existence-checked before use.
//!
//! The read-then-increment is not atomic: two concurrent callers can observe
//! the same maximum and compute the same successor. Allocation is only
//! monotonic under sequential use; the store's duplicate-identifier rejection
//! at write time is what turns the race into a reportable conflict.

use rand::Rng;
use std::sync::Arc;
use tracing::warn;

use crate::domain::models::transaction::TRANSACTION_ID_LENGTH;
use crate::error::{LedgerError, LedgerResult};
use crate::storage::traits::TransactionStore;

/// Identifier assigned to the first transaction in an empty store.
pub const FIRST_TRANSACTION_ID: &str = "0000000000000001";

/// Largest value the zero-padded sequential scheme can represent.
const MAX_SEQUENTIAL: u64 = 9_999_999_999_999_999;

/// Attempts at a collision-free random identifier before giving up.
const MAX_RANDOM_ATTEMPTS: usize = 5;

const RANDOM_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub struct IdGenerator {
    store: Arc<dyn TransactionStore>,
}

impl IdGenerator {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Allocate the next transaction identifier.
    pub fn next_id(&self) -> LedgerResult<String> {
        match self.store.find_highest_id() {
            Ok(None) => Ok(FIRST_TRANSACTION_ID.to_string()),
            Ok(Some(highest)) => match highest.parse::<u64>() {
                Ok(value) => match value.checked_add(1) {
                    Some(next) if next <= MAX_SEQUENTIAL => Ok(format!("{next:016}")),
                    _ => {
                        warn!("sequential identifier space exhausted at {highest}, switching to random allocation");
                        self.random_id()
                    }
                },
                Err(_) => {
                    warn!("highest identifier {highest} is not numeric, switching to random allocation");
                    self.random_id()
                }
            },
            Err(e) => {
                warn!("highest-identifier lookup failed ({e:#}), switching to random allocation");
                self.random_id()
            }
        }
    }

    fn random_id(&self) -> LedgerResult<String> {
        let mut rng = rand::thread_rng();
        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let candidate: String = (0..TRANSACTION_ID_LENGTH)
                .map(|_| {
                    let index = rng.gen_range(0..RANDOM_CHARSET.len());
                    RANDOM_CHARSET[index] as char
                })
                .collect();
            match self.store.find_by_id(&candidate) {
                Ok(None) => return Ok(candidate),
                Ok(Some(_)) => continue,
                Err(e) => return Err(LedgerError::System(e)),
            }
        }
        Err(LedgerError::conflict(
            "could not allocate a unique transaction identifier",
        ))
    }
}
