//! Wire types shared between the card ledger backend and its clients.
//!
//! These are the public request/response shapes only. The backend maps them
//! to internal domain commands at the REST layer, so changes here never leak
//! into domain logic directly.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request body for recording a new ledger transaction.
///
/// At least one of `account_id` / `card_number` must identify the target
/// account. All other validation (formats, closed code sets, amount bounds,
/// date ordering) happens server-side and is reported through
/// [`AddTransactionResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTransactionRequest {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    /// Transaction type code (2 characters, closed reference set)
    pub type_code: String,
    /// Transaction category code (4 digits, closed reference set)
    pub category_code: String,
    /// Originating system of the transaction (e.g. "POS TERM", "WEB")
    pub source: String,
    pub description: String,
    /// Signed amount with exactly two decimal places, e.g. "-125.00"
    #[serde(default)]
    pub amount: Option<String>,
    /// Merchant identifier (9 digits when present)
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub merchant_city: Option<String>,
    #[serde(default)]
    pub merchant_zip: Option<String>,
    /// Date the transaction originally occurred (`YYYYMMDD`, `YYYY-MM-DD`
    /// or RFC 3339); defaults to the processing date when omitted
    #[serde(default)]
    pub original_date: Option<String>,
    /// Date the transaction is processed; defaults to today when omitted
    #[serde(default)]
    pub processing_date: Option<String>,
    /// Explicit confirmation flag; a write is only accepted once this is true
    #[serde(default)]
    pub confirmed: Option<bool>,
}

/// Outcome of an add-transaction request.
///
/// `success == false` carries either a validation failure (`failure_kind` +
/// `field_errors`) or a confirmation prompt (`failure_kind ==
/// "confirmation_required"`), which the client should handle by re-prompting
/// rather than treating the input as bad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTransactionResponse {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub previous_balance: Option<Decimal>,
    pub current_balance: Option<Decimal>,
    pub failure_kind: Option<String>,
    pub message: String,
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
}

/// One violated rule, with the offending field when one can be named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Option<String>,
    pub message: String,
}

/// A persisted ledger transaction as exposed over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDto {
    /// Fixed 16-character alphanumeric identifier, immutable once assigned
    pub id: String,
    pub type_code: String,
    pub category_code: String,
    pub source: String,
    pub description: String,
    pub amount: Decimal,
    pub card_number: String,
    pub merchant_id: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub merchant_zip: String,
    pub original_date: NaiveDate,
    pub processing_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of the transaction listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub items: Vec<TransactionDto>,
    /// 1-based page number as shown to the user
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub total_records: u64,
    /// Sum of the amounts on this page only, recomputed per request
    pub page_amount_total: Decimal,
    /// Human-readable description of the filter path that was applied
    pub applied_filter: String,
}

/// Error body returned for rejected list requests and hard failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    pub fn with_field_errors(message: impl Into<String>, field_errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: message.into(),
            field_errors,
        }
    }
}
