//! # REST API Interface Layer
//!
//! HTTP endpoints for the card ledger. This layer handles request/response
//! serialization, translation from domain outcomes to HTTP status codes and
//! request logging. It is a pure translation layer: no business logic.

pub mod mappers;
pub mod transaction_apis;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

/// All `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            post(transaction_apis::add_transaction).get(transaction_apis::list_transactions),
        )
        .route("/transactions/:id", get(transaction_apis::get_transaction))
}
