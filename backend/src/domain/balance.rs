//! Balance-impact computation for the card ledger.
//!
//! A transaction either increases the owed balance (debit) or decreases it
//! (credit). The classification comes from the closed type table in
//! `reference`; this module only applies the sign and produces the
//! before/after snapshot. All arithmetic is exact decimal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a transaction type increases or decreases the owed balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceEffect {
    Debit,
    Credit,
}

/// Account balance before and after one transaction is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub previous: Decimal,
    pub current: Decimal,
}

/// Apply one transaction amount to the current balance.
///
/// `current = previous + delta` where `delta` is `+amount` for debits and
/// `-amount` for credits. Holds for zero and negative amounts as well: a
/// negative-amount debit lowers the balance by that amount.
pub fn compute_balance_impact(
    effect: BalanceEffect,
    amount: Decimal,
    current_balance: Decimal,
) -> BalanceSnapshot {
    let delta = match effect {
        BalanceEffect::Debit => amount,
        BalanceEffect::Credit => -amount,
    };
    BalanceSnapshot {
        previous: current_balance,
        current: current_balance + delta,
    }
}
