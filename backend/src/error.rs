//! Hard-failure error model for the ledger core.
//!
//! Validation outcomes are values (see `domain::validation`), never errors.
//! This enum covers only the conditions that abort a request outright.

use thiserror::Error;

/// Result type used across the domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// A transaction lookup referenced an identifier that does not exist.
    #[error("transaction not found")]
    NotFound,

    /// Identifier allocation kept colliding until retries were exhausted, or
    /// the store rejected a duplicate identifier at write time.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The record store was unreachable or failed unexpectedly.
    #[error("store failure: {0}")]
    System(#[from] anyhow::Error),
}

impl LedgerError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
