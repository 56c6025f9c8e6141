//! # REST API for Transactions
//!
//! Endpoints for recording, listing and inspecting ledger transactions.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use shared::AddTransactionRequest;

use crate::domain::commands::transactions::TransactionListQuery;
use crate::io::rest::mappers::transaction_mapper;
use crate::AppState;

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub transaction_id: Option<String>,
    pub card_number: Option<String>,
    pub account_id: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub type_code: Option<String>,
    pub category_code: Option<String>,
    pub text: Option<String>,
}

impl From<ListParams> for TransactionListQuery {
    fn from(params: ListParams) -> Self {
        Self {
            page: params.page,
            page_size: params.page_size,
            sort: params.sort,
            direction: params.direction,
            transaction_id: params.transaction_id,
            card_number: params.card_number,
            account_id: params.account_id,
            from_date: params.from_date,
            to_date: params.to_date,
            min_amount: params.min_amount,
            max_amount: params.max_amount,
            type_code: params.type_code,
            category_code: params.category_code,
            text: params.text,
        }
    }
}

/// Record a new transaction.
pub async fn add_transaction(
    State(state): State<AppState>,
    Json(request): Json<AddTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions");

    let command = transaction_mapper::add_command_from_request(request);
    match state.transaction_service.add_transaction(command) {
        Ok(outcome) => transaction_mapper::add_outcome_response(outcome),
        Err(e) => transaction_mapper::error_response(e),
    }
}

/// List transactions with optional filtering and pagination.
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    info!("GET /api/transactions - params: {:?}", params);

    match state.transaction_service.list_transactions(params.into()) {
        Ok(outcome) => transaction_mapper::list_outcome_response(outcome),
        Err(e) => transaction_mapper::error_response(e),
    }
}

/// Fetch a single transaction by identifier.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/transactions/{}", transaction_id);

    match state.transaction_service.get_transaction(&transaction_id) {
        Ok(outcome) => transaction_mapper::detail_outcome_response(outcome),
        Err(e) => transaction_mapper::error_response(e),
    }
}
