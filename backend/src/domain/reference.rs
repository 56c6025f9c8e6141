//! Closed reference sets for transaction types and categories.
//!
//! Both sets are fixed at build time. Type codes additionally carry their
//! debit/credit classification, kept as a closed lookup table rather than
//! any form of per-type dispatch.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::domain::balance::BalanceEffect;

/// Metadata for one transaction type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionType {
    pub code: &'static str,
    pub label: &'static str,
    pub effect: BalanceEffect,
}

static TRANSACTION_TYPES: Lazy<BTreeMap<&'static str, TransactionType>> = Lazy::new(|| {
    let entries = [
        TransactionType { code: "01", label: "Purchase", effect: BalanceEffect::Debit },
        TransactionType { code: "02", label: "Payment", effect: BalanceEffect::Credit },
        TransactionType { code: "03", label: "Refund", effect: BalanceEffect::Credit },
        TransactionType { code: "04", label: "Cash Advance", effect: BalanceEffect::Debit },
        TransactionType { code: "05", label: "Fee", effect: BalanceEffect::Debit },
        TransactionType { code: "06", label: "Interest", effect: BalanceEffect::Debit },
        TransactionType { code: "07", label: "Reversal", effect: BalanceEffect::Credit },
    ];
    entries.into_iter().map(|t| (t.code, t)).collect()
});

static CATEGORIES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("0001", "Retail"),
        ("0002", "Grocery"),
        ("0003", "Dining"),
        ("0004", "Travel"),
        ("0005", "Utilities"),
        ("0006", "Cash"),
        ("0007", "Services"),
        ("0008", "Fees & Interest"),
    ])
});

pub fn is_valid_type_code(code: &str) -> bool {
    TRANSACTION_TYPES.contains_key(code)
}

pub fn is_valid_category_code(code: &str) -> bool {
    CATEGORIES.contains_key(code)
}

/// Debit/credit classification for a type code, `None` for codes outside
/// the reference set.
pub fn balance_effect(type_code: &str) -> Option<BalanceEffect> {
    TRANSACTION_TYPES.get(type_code).map(|t| t.effect)
}

pub fn type_label(type_code: &str) -> Option<&'static str> {
    TRANSACTION_TYPES.get(type_code).map(|t| t.label)
}

pub fn category_label(category_code: &str) -> Option<&'static str> {
    CATEGORIES.get(category_code).copied()
}
