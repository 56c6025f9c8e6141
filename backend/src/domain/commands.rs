//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod transactions {
    use crate::domain::balance::BalanceSnapshot;
    use crate::domain::models::transaction::Transaction;
    use crate::domain::query::PageResult;
    use crate::domain::validation::ValidationFailure;

    /// Input for recording a new transaction. Identity and amount fields are
    /// carried raw; the validation pipeline owns every format decision.
    #[derive(Debug, Clone, Default)]
    pub struct AddTransactionCommand {
        pub account_id: Option<String>,
        pub card_number: Option<String>,
        pub type_code: String,
        pub category_code: String,
        pub source: String,
        pub description: String,
        pub amount: Option<String>,
        pub merchant_id: Option<String>,
        pub merchant_name: String,
        pub merchant_city: String,
        pub merchant_zip: String,
        pub original_date: Option<String>,
        pub processing_date: Option<String>,
        pub confirmed: Option<bool>,
    }

    /// Raw query parameters for listing transactions, before normalization.
    #[derive(Debug, Clone, Default)]
    pub struct TransactionListQuery {
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

    /// A successfully persisted transaction plus its balance impact.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CreatedTransaction {
        pub transaction: Transaction,
        pub balance: BalanceSnapshot,
    }

    /// Outcome of the add path. Validation failures and the confirmation
    /// prompt are ordinary values; only store-level faults surface as errors.
    #[derive(Debug, Clone, PartialEq)]
    pub enum AddTransactionOutcome {
        Created(CreatedTransaction),
        /// The request is otherwise valid but the caller has not confirmed it
        /// yet. Nothing was allocated or written.
        ConfirmationRequired,
        Rejected(ValidationFailure),
    }

    /// Outcome of the list path.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ListOutcome {
        Page(PageResult),
        /// Every violated filter rule, in rule order, so a client form can
        /// surface all problems at once.
        Rejected(Vec<ValidationFailure>),
    }

    /// Outcome of a detail lookup. An unknown-but-well-formed identifier is a
    /// `LedgerError::NotFound`, not a rejection.
    #[derive(Debug, Clone, PartialEq)]
    pub enum DetailOutcome {
        Found(Transaction),
        Rejected(ValidationFailure),
    }
}
