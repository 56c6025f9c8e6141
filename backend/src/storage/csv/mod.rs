//! CSV storage backend.

pub mod account_repository;
pub mod connection;
pub mod transaction_repository;

pub use account_repository::AccountRepository;
pub use connection::CsvConnection;
pub use transaction_repository::TransactionRepository;
