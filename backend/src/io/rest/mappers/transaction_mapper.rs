//! Mapping between the public wire DTOs and internal domain types.
//!
//! Pure translation: no business logic lives here. Empty strings in optional
//! request fields are treated as absent so HTML-form clients behave the same
//! as JSON clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use shared::{
    AddTransactionRequest, AddTransactionResponse, ErrorResponse, FieldError,
    TransactionDto, TransactionListResponse,
};

use crate::domain::commands::transactions::{
    AddTransactionCommand, AddTransactionOutcome, DetailOutcome, ListOutcome,
};
use crate::domain::models::transaction::Transaction;
use crate::domain::validation::ValidationFailure;
use crate::error::LedgerError;

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn add_command_from_request(request: AddTransactionRequest) -> AddTransactionCommand {
    AddTransactionCommand {
        account_id: non_empty(request.account_id),
        card_number: non_empty(request.card_number),
        type_code: request.type_code,
        category_code: request.category_code,
        source: request.source,
        description: request.description,
        amount: non_empty(request.amount),
        merchant_id: non_empty(request.merchant_id),
        merchant_name: request.merchant_name.unwrap_or_default(),
        merchant_city: request.merchant_city.unwrap_or_default(),
        merchant_zip: request.merchant_zip.unwrap_or_default(),
        original_date: non_empty(request.original_date),
        processing_date: non_empty(request.processing_date),
        confirmed: request.confirmed,
    }
}

pub fn transaction_dto(transaction: Transaction) -> TransactionDto {
    TransactionDto {
        id: transaction.id,
        type_code: transaction.type_code,
        category_code: transaction.category_code,
        source: transaction.source,
        description: transaction.description,
        amount: transaction.amount,
        card_number: transaction.card_number,
        merchant_id: transaction.merchant_id,
        merchant_name: transaction.merchant_name,
        merchant_city: transaction.merchant_city,
        merchant_zip: transaction.merchant_zip,
        original_date: transaction.original_date,
        processing_date: transaction.processing_date,
        created_at: transaction.created_at,
        updated_at: transaction.updated_at,
    }
}

fn field_error(failure: &ValidationFailure) -> FieldError {
    FieldError {
        field: failure.field.clone(),
        message: failure.message.clone(),
    }
}

pub fn add_outcome_response(outcome: AddTransactionOutcome) -> Response {
    match outcome {
        AddTransactionOutcome::Created(created) => {
            let body = AddTransactionResponse {
                success: true,
                transaction_id: Some(created.transaction.id.clone()),
                previous_balance: Some(created.balance.previous),
                current_balance: Some(created.balance.current),
                failure_kind: None,
                message: format!("transaction {} recorded", created.transaction.id),
                field_errors: Vec::new(),
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        AddTransactionOutcome::ConfirmationRequired => {
            let body = AddTransactionResponse {
                success: false,
                transaction_id: None,
                previous_balance: None,
                current_balance: None,
                failure_kind: Some("confirmation_required".to_string()),
                message: "confirm the transaction and resubmit".to_string(),
                field_errors: Vec::new(),
            };
            (StatusCode::CONFLICT, Json(body)).into_response()
        }
        AddTransactionOutcome::Rejected(failure) => {
            let body = AddTransactionResponse {
                success: false,
                transaction_id: None,
                previous_balance: None,
                current_balance: None,
                failure_kind: Some(failure.kind.as_str().to_string()),
                message: failure.message.clone(),
                field_errors: vec![field_error(&failure)],
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
    }
}

pub fn list_outcome_response(outcome: ListOutcome) -> Response {
    match outcome {
        ListOutcome::Page(page) => {
            let body = TransactionListResponse {
                items: page.items.into_iter().map(transaction_dto).collect(),
                page: page.page,
                page_size: page.page_size,
                total_pages: page.total_pages,
                total_records: page.total_records,
                page_amount_total: page.page_amount_total,
                applied_filter: page.applied_filter,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        ListOutcome::Rejected(failures) => {
            let body = ErrorResponse::with_field_errors(
                "list request failed validation",
                failures.iter().map(field_error).collect(),
            );
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
    }
}

pub fn detail_outcome_response(outcome: DetailOutcome) -> Response {
    match outcome {
        DetailOutcome::Found(transaction) => {
            (StatusCode::OK, Json(transaction_dto(transaction))).into_response()
        }
        DetailOutcome::Rejected(failure) => {
            let body = ErrorResponse::with_field_errors(
                failure.message.clone(),
                vec![field_error(&failure)],
            );
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
    }
}

pub fn error_response(error: LedgerError) -> Response {
    match error {
        LedgerError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("transaction not found")),
        )
            .into_response(),
        LedgerError::Conflict(message) => {
            (StatusCode::CONFLICT, Json(ErrorResponse::new(message))).into_response()
        }
        LedgerError::System(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("internal error: {e:#}"))),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::FailureKind;

    #[test]
    fn empty_strings_in_optional_fields_become_absent() {
        let request = AddTransactionRequest {
            account_id: Some("  ".to_string()),
            card_number: Some("4111111111111111".to_string()),
            type_code: "01".to_string(),
            category_code: "0001".to_string(),
            source: "WEB".to_string(),
            description: "test".to_string(),
            amount: Some("".to_string()),
            merchant_id: None,
            merchant_name: None,
            merchant_city: None,
            merchant_zip: None,
            original_date: None,
            processing_date: None,
            confirmed: Some(true),
        };
        let command = add_command_from_request(request);
        assert_eq!(command.account_id, None);
        assert_eq!(command.amount, None);
        assert_eq!(command.card_number.as_deref(), Some("4111111111111111"));
        assert_eq!(command.merchant_name, "");
    }

    #[test]
    fn confirmation_prompt_maps_to_conflict_status() {
        let response = add_outcome_response(AddTransactionOutcome::ConfirmationRequired);
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn rejection_maps_to_bad_request() {
        let failure = ValidationFailure::new(
            FailureKind::RequiredField,
            Some("amount"),
            "amount is required",
        );
        let response = add_outcome_response(AddTransactionOutcome::Rejected(failure));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = error_response(LedgerError::NotFound);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn balances_serialize_as_exact_decimal_strings() {
        use rust_decimal::Decimal;
        use std::str::FromStr;

        let body = AddTransactionResponse {
            success: true,
            transaction_id: Some("0000000000000001".to_string()),
            previous_balance: Some(Decimal::from_str("0.00").unwrap()),
            current_balance: Some(Decimal::from_str("100.00").unwrap()),
            failure_kind: None,
            message: "transaction 0000000000000001 recorded".to_string(),
            field_errors: Vec::new(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["previous_balance"], "0.00");
        assert_eq!(value["current_balance"], "100.00");
    }
}
