//! Request validation for the card ledger.
//!
//! Every check is a standalone rule function returning
//! `Option<ValidationFailure>`, held in a fixed-order list. A thin driver
//! either stops at the first failure (add path, one authoritative message) or
//! folds every failure into an ordered list (list path, full form feedback).
//! The rules themselves are shared between both drivers so no check is ever
//! duplicated.
//!
//! Add-path rule order: identity presence, structural formats, account/card
//! cross-reference, required fields, range/enumeration, temporal checks.
//! The confirmation gate runs after everything else passed, so an unconfirmed
//! request with bad input reports the input problem first.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::domain::commands::transactions::{AddTransactionCommand, TransactionListQuery};
use crate::domain::models::account::IdentityResolution;
use crate::domain::models::transaction::Transaction;
use crate::domain::query::{SortDirection, SortField};
use crate::domain::reference;

const ACCOUNT_ID_LENGTH: usize = 11;
const CARD_NUMBER_LENGTH: usize = 16;
const MERCHANT_ID_LENGTH: usize = 9;
const AMOUNT_SCALE: u32 = 2;

/// Largest accepted amount magnitude: 999,999,999.99.
fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999, 2)
}

/// Category of a violated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RequiredField,
    Format,
    Range,
    Temporal,
    CrossReference,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::RequiredField => "required_field",
            FailureKind::Format => "format",
            FailureKind::Range => "range",
            FailureKind::Temporal => "temporal",
            FailureKind::CrossReference => "cross_reference",
        }
    }
}

/// One violated rule, with the offending field when one can be named.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub kind: FailureKind,
    pub message: String,
    pub field: Option<String>,
}

impl ValidationFailure {
    pub fn new(kind: FailureKind, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    fn required(field: &str) -> Self {
        Self::new(
            FailureKind::RequiredField,
            Some(field),
            format!("{field} is required"),
        )
    }

    fn format(field: &str, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Format, Some(field), message)
    }

    fn range(field: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Range, field, message)
    }

    fn temporal(field: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Temporal, field, message)
    }

    fn cross_reference(message: impl Into<String>) -> Self {
        Self::new(FailureKind::CrossReference, None, message)
    }
}

/// Outcome of the add-path pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid,
    /// All rules passed but the caller has not confirmed the write. Reported
    /// with a distinct signal so the caller can re-prompt instead of treating
    /// the request as bad input.
    ConfirmationRequired,
    Rejected(ValidationFailure),
}

/// Everything the add-path rules need: the raw command plus the identity
/// resolution the orchestrator already performed against the account store.
#[derive(Debug)]
pub struct AddValidationSubject<'a> {
    pub command: &'a AddTransactionCommand,
    pub identity: &'a IdentityResolution,
}

/// Return the first failure produced by `rules`, in order.
pub fn first_failure<T>(
    subject: &T,
    rules: &[fn(&T) -> Option<ValidationFailure>],
) -> Option<ValidationFailure> {
    rules.iter().find_map(|rule| rule(subject))
}

/// Return every failure produced by `rules`, in rule order.
pub fn all_failures<T>(
    subject: &T,
    rules: &[fn(&T) -> Option<ValidationFailure>],
) -> Vec<ValidationFailure> {
    rules.iter().filter_map(|rule| rule(subject)).collect()
}

/// Run the short-circuit add-path pipeline.
pub fn validate_add(subject: &AddValidationSubject) -> ValidationOutcome {
    let rules: &[fn(&AddValidationSubject) -> Option<ValidationFailure>] = &[
        identity_presence_rule,
        account_id_format_rule,
        card_number_format_rule,
        merchant_id_format_rule,
        cross_reference_rule,
        type_code_required_rule,
        category_code_required_rule,
        source_required_rule,
        description_required_rule,
        amount_required_rule,
        confirmation_present_rule,
        type_code_range_rule,
        category_code_range_rule,
        amount_range_rule,
        original_date_rule,
        processing_date_rule,
        date_order_rule,
    ];
    if let Some(failure) = first_failure(subject, rules) {
        return ValidationOutcome::Rejected(failure);
    }
    match subject.command.confirmed {
        Some(true) => ValidationOutcome::Valid,
        _ => ValidationOutcome::ConfirmationRequired,
    }
}

const LIST_RULES: &[fn(&TransactionListQuery) -> Option<ValidationFailure>] = &[
    list_transaction_id_rule,
    list_card_number_rule,
    list_account_id_rule,
    list_from_date_rule,
    list_to_date_rule,
    list_date_order_rule,
    list_min_amount_rule,
    list_max_amount_rule,
    list_amount_order_rule,
    list_type_code_rule,
    list_category_code_rule,
    list_sort_field_rule,
    list_sort_direction_rule,
];

/// Run the collect-all list-path pipeline. An empty result means the query
/// is acceptable; a non-empty result must reject the request before any
/// store call.
pub fn validate_list(query: &TransactionListQuery) -> Vec<ValidationFailure> {
    all_failures(query, LIST_RULES)
}

/// Format gate for the transaction-detail path.
pub fn transaction_id_failure(candidate: &str) -> Option<ValidationFailure> {
    if candidate.trim().is_empty() {
        Some(ValidationFailure::required("transaction_id"))
    } else if !Transaction::is_well_formed_id(candidate) {
        Some(ValidationFailure::format(
            "transaction_id",
            "transaction identifier must be exactly 16 alphanumeric characters",
        ))
    } else {
        None
    }
}

/// Parse and bound-check an amount string: signed decimal, scale exactly 2,
/// magnitude at most 999,999,999.99.
pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::required("amount"));
    }
    let value = Decimal::from_str(trimmed).map_err(|_| {
        ValidationFailure::range(Some("amount"), "amount must be a signed decimal number")
    })?;
    if value.scale() != AMOUNT_SCALE {
        return Err(ValidationFailure::range(
            Some("amount"),
            "amount must have exactly 2 decimal places",
        ));
    }
    if value.abs() > max_amount() {
        return Err(ValidationFailure::range(
            Some("amount"),
            "amount must not exceed 999,999,999.99 in magnitude",
        ));
    }
    Ok(value)
}

/// Parse a calendar date in `YYYYMMDD`, `YYYY-MM-DD` or RFC 3339 form.
/// Leap years are honored by the underlying calendar arithmetic.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y%m%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

/// A trimmed, non-empty view of an optional field.
pub(crate) fn given(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn is_digits(value: &str, length: usize) -> bool {
    value.len() == length && value.chars().all(|c| c.is_ascii_digit())
}

// --- add-path rules ---------------------------------------------------------

fn identity_presence_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    match subject.identity {
        IdentityResolution::Missing => Some(ValidationFailure::cross_reference(
            "either an account identifier or a card number must be supplied",
        )),
        _ => None,
    }
}

fn account_id_format_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    let value = given(&subject.command.account_id)?;
    if is_digits(value, ACCOUNT_ID_LENGTH) {
        None
    } else {
        Some(ValidationFailure::format(
            "account_id",
            "account identifier must be exactly 11 digits",
        ))
    }
}

fn card_number_format_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    let value = given(&subject.command.card_number)?;
    if is_digits(value, CARD_NUMBER_LENGTH) {
        None
    } else {
        Some(ValidationFailure::format(
            "card_number",
            "card number must be exactly 16 digits",
        ))
    }
}

fn merchant_id_format_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    let value = given(&subject.command.merchant_id)?;
    if is_digits(value, MERCHANT_ID_LENGTH) {
        None
    } else {
        Some(ValidationFailure::format(
            "merchant_id",
            "merchant identifier must be exactly 9 digits",
        ))
    }
}

fn cross_reference_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    match subject.identity {
        IdentityResolution::Missing | IdentityResolution::Resolved(_) => None,
        IdentityResolution::UnknownAccount(account_id) => Some(ValidationFailure::cross_reference(
            format!("account {account_id} does not exist"),
        )),
        IdentityResolution::UnknownCard(card_number) => Some(ValidationFailure::cross_reference(
            format!("card {card_number} does not exist"),
        )),
        IdentityResolution::Unlinked(account_id) => Some(ValidationFailure::cross_reference(
            format!("account {account_id} has no card linked to it"),
        )),
        IdentityResolution::InactiveCard(card_number) => Some(ValidationFailure::cross_reference(
            format!("card {card_number} is not active"),
        )),
        IdentityResolution::Mismatch {
            account_id,
            card_number,
        } => Some(ValidationFailure::cross_reference(format!(
            "card {card_number} is not linked to account {account_id}"
        ))),
    }
}

fn type_code_required_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    if subject.command.type_code.trim().is_empty() {
        Some(ValidationFailure::required("type_code"))
    } else {
        None
    }
}

fn category_code_required_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    if subject.command.category_code.trim().is_empty() {
        Some(ValidationFailure::required("category_code"))
    } else {
        None
    }
}

fn source_required_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    if subject.command.source.trim().is_empty() {
        Some(ValidationFailure::required("source"))
    } else {
        None
    }
}

fn description_required_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    if subject.command.description.trim().is_empty() {
        Some(ValidationFailure::required("description"))
    } else {
        None
    }
}

fn amount_required_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    if given(&subject.command.amount).is_none() {
        Some(ValidationFailure::required("amount"))
    } else {
        None
    }
}

fn confirmation_present_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    if subject.command.confirmed.is_none() {
        Some(ValidationFailure::required("confirmed"))
    } else {
        None
    }
}

fn type_code_range_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    let code = subject.command.type_code.trim();
    if code.is_empty() || reference::is_valid_type_code(code) {
        None
    } else {
        Some(ValidationFailure::range(
            Some("type_code"),
            format!("transaction type {code} is not a recognized value"),
        ))
    }
}

fn category_code_range_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    let code = subject.command.category_code.trim();
    if code.is_empty() || reference::is_valid_category_code(code) {
        None
    } else {
        Some(ValidationFailure::range(
            Some("category_code"),
            format!("transaction category {code} is not a recognized value"),
        ))
    }
}

fn amount_range_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    let raw = given(&subject.command.amount)?;
    parse_amount(raw).err()
}

fn original_date_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    let raw = given(&subject.command.original_date)?;
    if parse_flexible_date(raw).is_some() {
        None
    } else {
        Some(ValidationFailure::temporal(
            Some("original_date"),
            "original date is not a valid calendar date",
        ))
    }
}

fn processing_date_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    let raw = given(&subject.command.processing_date)?;
    if parse_flexible_date(raw).is_some() {
        None
    } else {
        Some(ValidationFailure::temporal(
            Some("processing_date"),
            "processing date is not a valid calendar date",
        ))
    }
}

fn date_order_rule(subject: &AddValidationSubject) -> Option<ValidationFailure> {
    let original = given(&subject.command.original_date).and_then(parse_flexible_date)?;
    let processing = given(&subject.command.processing_date).and_then(parse_flexible_date)?;
    if original > processing {
        Some(ValidationFailure::temporal(
            None,
            "original date must not be after processing date",
        ))
    } else {
        None
    }
}

// --- list-path rules --------------------------------------------------------

fn list_transaction_id_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let value = given(&query.transaction_id)?;
    if Transaction::is_well_formed_id(value) {
        None
    } else {
        Some(ValidationFailure::format(
            "transaction_id",
            "transaction identifier must be exactly 16 alphanumeric characters",
        ))
    }
}

fn list_card_number_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let value = given(&query.card_number)?;
    if is_digits(value, CARD_NUMBER_LENGTH) {
        None
    } else {
        Some(ValidationFailure::format(
            "card_number",
            "card number must be exactly 16 digits",
        ))
    }
}

fn list_account_id_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let value = given(&query.account_id)?;
    if is_digits(value, ACCOUNT_ID_LENGTH) {
        None
    } else {
        Some(ValidationFailure::format(
            "account_id",
            "account identifier must be exactly 11 digits",
        ))
    }
}

fn list_from_date_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let raw = given(&query.from_date)?;
    if parse_flexible_date(raw).is_some() {
        None
    } else {
        Some(ValidationFailure::temporal(
            Some("from_date"),
            "start date is not a valid calendar date",
        ))
    }
}

fn list_to_date_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let raw = given(&query.to_date)?;
    if parse_flexible_date(raw).is_some() {
        None
    } else {
        Some(ValidationFailure::temporal(
            Some("to_date"),
            "end date is not a valid calendar date",
        ))
    }
}

fn list_date_order_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let from = given(&query.from_date).and_then(parse_flexible_date)?;
    let to = given(&query.to_date).and_then(parse_flexible_date)?;
    if from > to {
        Some(ValidationFailure::temporal(
            None,
            "end date must not be before start date",
        ))
    } else {
        None
    }
}

fn list_min_amount_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let raw = given(&query.min_amount)?;
    if Decimal::from_str(raw).is_ok() {
        None
    } else {
        Some(ValidationFailure::range(
            Some("min_amount"),
            "minimum amount must be a signed decimal number",
        ))
    }
}

fn list_max_amount_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let raw = given(&query.max_amount)?;
    if Decimal::from_str(raw).is_ok() {
        None
    } else {
        Some(ValidationFailure::range(
            Some("max_amount"),
            "maximum amount must be a signed decimal number",
        ))
    }
}

fn list_amount_order_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let min = given(&query.min_amount).and_then(|raw| Decimal::from_str(raw).ok())?;
    let max = given(&query.max_amount).and_then(|raw| Decimal::from_str(raw).ok())?;
    if min > max {
        Some(ValidationFailure::range(
            None,
            "maximum amount must not be less than minimum amount",
        ))
    } else {
        None
    }
}

fn list_type_code_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let code = given(&query.type_code)?;
    if reference::is_valid_type_code(code) {
        None
    } else {
        Some(ValidationFailure::range(
            Some("type_code"),
            format!("transaction type {code} is not a recognized value"),
        ))
    }
}

fn list_category_code_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let code = given(&query.category_code)?;
    if reference::is_valid_category_code(code) {
        None
    } else {
        Some(ValidationFailure::range(
            Some("category_code"),
            format!("transaction category {code} is not a recognized value"),
        ))
    }
}

fn list_sort_field_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let name = given(&query.sort)?;
    if SortField::from_name(name).is_some() {
        None
    } else {
        Some(ValidationFailure::range(
            Some("sort"),
            format!("sort field {name} is not in the allowed set"),
        ))
    }
}

fn list_sort_direction_rule(query: &TransactionListQuery) -> Option<ValidationFailure> {
    let name = given(&query.direction)?;
    if SortDirection::from_name(name).is_some() {
        None
    } else {
        Some(ValidationFailure::range(
            Some("direction"),
            format!("sort direction {name} is not recognized"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::account::CardAccountLink;

    fn resolved() -> IdentityResolution {
        IdentityResolution::Resolved(CardAccountLink {
            account_id: "12345678901".to_string(),
            card_number: "4111111111111111".to_string(),
        })
    }

    fn valid_command() -> AddTransactionCommand {
        AddTransactionCommand {
            account_id: Some("12345678901".to_string()),
            card_number: Some("4111111111111111".to_string()),
            type_code: "01".to_string(),
            category_code: "0001".to_string(),
            source: "POS TERM".to_string(),
            description: "Grocery run".to_string(),
            amount: Some("100.00".to_string()),
            merchant_id: Some("123456789".to_string()),
            merchant_name: "Fresh Mart".to_string(),
            merchant_city: "Springfield".to_string(),
            merchant_zip: "12345".to_string(),
            original_date: Some("2024-06-01".to_string()),
            processing_date: Some("2024-06-02".to_string()),
            confirmed: Some(true),
        }
    }

    fn validate(command: &AddTransactionCommand, identity: &IdentityResolution) -> ValidationOutcome {
        validate_add(&AddValidationSubject { command, identity })
    }

    fn rejected_kind(outcome: ValidationOutcome) -> FailureKind {
        match outcome {
            ValidationOutcome::Rejected(failure) => failure.kind,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn fully_valid_confirmed_request_passes() {
        assert_eq!(validate(&valid_command(), &resolved()), ValidationOutcome::Valid);
    }

    #[test]
    fn missing_both_identity_fields_is_a_cross_reference_failure() {
        let mut command = valid_command();
        command.account_id = None;
        command.card_number = None;
        let outcome = validate(&command, &IdentityResolution::Missing);
        assert_eq!(rejected_kind(outcome), FailureKind::CrossReference);
    }

    #[test]
    fn mismatched_card_and_account_is_a_cross_reference_failure() {
        let identity = IdentityResolution::Mismatch {
            account_id: "12345678901".to_string(),
            card_number: "5500000000000004".to_string(),
        };
        let outcome = validate(&valid_command(), &identity);
        match outcome {
            ValidationOutcome::Rejected(failure) => {
                assert_eq!(failure.kind, FailureKind::CrossReference);
                assert!(failure.message.contains("not linked"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn short_account_id_is_a_format_failure_before_cross_reference() {
        let mut command = valid_command();
        command.account_id = Some("123".to_string());
        command.card_number = None;
        let identity = IdentityResolution::UnknownAccount("123".to_string());
        let outcome = validate(&command, &identity);
        match outcome {
            ValidationOutcome::Rejected(failure) => {
                assert_eq!(failure.kind, FailureKind::Format);
                assert_eq!(failure.field.as_deref(), Some("account_id"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn bad_merchant_id_is_a_format_failure() {
        let mut command = valid_command();
        command.merchant_id = Some("12AB".to_string());
        assert_eq!(rejected_kind(validate(&command, &resolved())), FailureKind::Format);
    }

    #[test]
    fn missing_required_fields_name_the_field() {
        let cases: Vec<(Box<dyn Fn(&mut AddTransactionCommand)>, &str)> = vec![
            (Box::new(|c| c.type_code.clear()), "type_code"),
            (Box::new(|c| c.category_code.clear()), "category_code"),
            (Box::new(|c| c.source.clear()), "source"),
            (Box::new(|c| c.description.clear()), "description"),
            (Box::new(|c| c.amount = None), "amount"),
            (Box::new(|c| c.confirmed = None), "confirmed"),
        ];
        for (mutate, field) in cases {
            let mut command = valid_command();
            mutate(&mut command);
            match validate(&command, &resolved()) {
                ValidationOutcome::Rejected(failure) => {
                    assert_eq!(failure.kind, FailureKind::RequiredField, "field {field}");
                    assert_eq!(failure.field.as_deref(), Some(field));
                }
                other => panic!("expected rejection for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_type_code_is_a_range_failure() {
        let mut command = valid_command();
        command.type_code = "99".to_string();
        assert_eq!(rejected_kind(validate(&command, &resolved())), FailureKind::Range);
    }

    #[test]
    fn amount_with_more_than_two_decimals_is_a_range_failure() {
        let mut command = valid_command();
        command.amount = Some("10.005".to_string());
        assert_eq!(rejected_kind(validate(&command, &resolved())), FailureKind::Range);
    }

    #[test]
    fn amount_without_decimals_is_a_range_failure() {
        let mut command = valid_command();
        command.amount = Some("10".to_string());
        assert_eq!(rejected_kind(validate(&command, &resolved())), FailureKind::Range);
    }

    #[test]
    fn amount_beyond_the_magnitude_bound_is_a_range_failure() {
        for raw in ["1000000000.00", "-1000000000.00"] {
            let mut command = valid_command();
            command.amount = Some(raw.to_string());
            assert_eq!(rejected_kind(validate(&command, &resolved())), FailureKind::Range);
        }
    }

    #[test]
    fn boundary_amount_is_accepted() {
        let mut command = valid_command();
        command.amount = Some("999999999.99".to_string());
        assert_eq!(validate(&command, &resolved()), ValidationOutcome::Valid);
    }

    #[test]
    fn invalid_calendar_date_is_a_temporal_failure() {
        let mut command = valid_command();
        command.original_date = Some("20230229".to_string());
        assert_eq!(rejected_kind(validate(&command, &resolved())), FailureKind::Temporal);
    }

    #[test]
    fn leap_day_is_accepted_in_a_leap_year() {
        let mut command = valid_command();
        command.original_date = Some("20240229".to_string());
        command.processing_date = Some("2024-03-01".to_string());
        assert_eq!(validate(&command, &resolved()), ValidationOutcome::Valid);
    }

    #[test]
    fn original_after_processing_is_a_temporal_failure() {
        let mut command = valid_command();
        command.original_date = Some("2024-06-03".to_string());
        command.processing_date = Some("2024-06-02".to_string());
        assert_eq!(rejected_kind(validate(&command, &resolved())), FailureKind::Temporal);
    }

    #[test]
    fn unconfirmed_but_otherwise_valid_request_asks_for_confirmation() {
        let mut command = valid_command();
        command.confirmed = Some(false);
        assert_eq!(
            validate(&command, &resolved()),
            ValidationOutcome::ConfirmationRequired
        );
    }

    #[test]
    fn invalid_input_outranks_the_confirmation_gate() {
        let mut command = valid_command();
        command.confirmed = Some(false);
        command.amount = Some("oops".to_string());
        assert_eq!(rejected_kind(validate(&command, &resolved())), FailureKind::Range);
    }

    #[test]
    fn list_validation_collects_every_failure_in_order() {
        let query = TransactionListQuery {
            card_number: Some("411".to_string()),
            from_date: Some("2024-06-01".to_string()),
            to_date: Some("2024-01-01".to_string()),
            type_code: Some("99".to_string()),
            ..TransactionListQuery::default()
        };
        let failures = validate_list(&query);
        assert_eq!(failures.len(), 3);
        assert_eq!(failures[0].kind, FailureKind::Format);
        assert_eq!(failures[1].kind, FailureKind::Temporal);
        assert_eq!(failures[2].kind, FailureKind::Range);
    }

    #[test]
    fn inverted_date_range_alone_is_rejected() {
        let query = TransactionListQuery {
            from_date: Some("2024-06-01".to_string()),
            to_date: Some("2024-01-01".to_string()),
            ..TransactionListQuery::default()
        };
        let failures = validate_list(&query);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("end date must not be before start date"));
    }

    #[test]
    fn clean_list_query_produces_no_failures() {
        let query = TransactionListQuery {
            account_id: Some("12345678901".to_string()),
            from_date: Some("20240101".to_string()),
            to_date: Some("2024-06-30".to_string()),
            ..TransactionListQuery::default()
        };
        assert!(validate_list(&query).is_empty());
    }

    #[test]
    fn flexible_date_parsing_accepts_all_three_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(parse_flexible_date("20240601"), Some(expected));
        assert_eq!(parse_flexible_date("2024-06-01"), Some(expected));
        assert_eq!(parse_flexible_date("2024-06-01T09:30:00Z"), Some(expected));
        assert_eq!(parse_flexible_date("06/01/2024"), None);
    }

    #[test]
    fn detail_path_rejects_malformed_identifiers() {
        assert!(transaction_id_failure("0000000000000001").is_none());
        let failure = transaction_id_failure("nope").unwrap();
        assert_eq!(failure.kind, FailureKind::Format);
        let failure = transaction_id_failure("  ").unwrap();
        assert_eq!(failure.kind, FailureKind::RequiredField);
    }
}
