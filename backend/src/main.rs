use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

use card_ledger_backend::domain::TransactionService;
use card_ledger_backend::io::rest;
use card_ledger_backend::storage::csv::{AccountRepository, CsvConnection, TransactionRepository};
use card_ledger_backend::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let data_dir =
        std::env::var("CARD_LEDGER_DATA").unwrap_or_else(|_| "data".to_string());
    info!("Opening data directory {}", data_dir);
    let connection = CsvConnection::new(&data_dir)?;
    connection.ensure_seed_data()?;

    let transactions = Arc::new(TransactionRepository::new(connection.clone()));
    let accounts = Arc::new(AccountRepository::new(connection));
    let state = AppState {
        transaction_service: Arc::new(TransactionService::new(transactions, accounts)),
    };

    // CORS setup so browser clients can call the API directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", rest::routes())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
