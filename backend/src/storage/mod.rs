//! Storage layer: capability traits plus the CSV backend that implements
//! them. The domain layer depends on the traits only.

pub mod csv;
pub mod traits;

pub use traits::{AccountStore, DuplicateIdError, TransactionStore};
