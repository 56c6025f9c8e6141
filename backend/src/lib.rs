//! Card ledger backend.
//!
//! Layering, outermost first: `io` (REST glue) -> `domain` (validation,
//! identifier allocation, balance computation, query engine, transaction
//! service) -> `storage` (capability traits + CSV backend). The domain layer
//! never touches a concrete store type.

pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use std::sync::Arc;

use domain::TransactionService;

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    pub transaction_service: Arc<TransactionService>,
}
