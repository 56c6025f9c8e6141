//! Transaction service: the write-path orchestrator and the entry point for
//! listing and detail lookups.
//!
//! The add path runs validation, identifier allocation and the balance
//! computation before touching the store, and performs exactly one write at
//! the very end. A failure anywhere earlier leaves nothing to roll back.

use anyhow::anyhow;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::balance;
use crate::domain::commands::transactions::{
    AddTransactionCommand, AddTransactionOutcome, CreatedTransaction, DetailOutcome, ListOutcome,
    TransactionListQuery,
};
use crate::domain::id_generator::IdGenerator;
use crate::domain::models::account::IdentityResolution;
use crate::domain::models::transaction::Transaction;
use crate::domain::query::{ListFilter, QueryEngine};
use crate::domain::reference;
use crate::domain::validation::{self, AddValidationSubject, ValidationOutcome};
use crate::error::{LedgerError, LedgerResult};
use crate::storage::traits::{AccountStore, DuplicateIdError, TransactionStore};

/// Write attempts before a duplicate identifier becomes a hard conflict.
/// Identifier allocation reads then increments without atomicity, so a
/// concurrent writer can take the same identifier first; the store's
/// uniqueness rejection plus this bounded retry is the mitigation.
const MAX_SAVE_ATTEMPTS: usize = 3;

pub struct TransactionService {
    transactions: Arc<dyn TransactionStore>,
    accounts: Arc<dyn AccountStore>,
    id_generator: IdGenerator,
    query_engine: QueryEngine,
}

impl TransactionService {
    pub fn new(transactions: Arc<dyn TransactionStore>, accounts: Arc<dyn AccountStore>) -> Self {
        let id_generator = IdGenerator::new(transactions.clone());
        let query_engine = QueryEngine::new(transactions.clone());
        Self {
            transactions,
            accounts,
            id_generator,
            query_engine,
        }
    }

    /// Record a new transaction.
    ///
    /// Validation failures and the confirmation prompt come back as ordinary
    /// outcome values; only store faults and identifier conflicts are errors.
    pub fn add_transaction(
        &self,
        command: AddTransactionCommand,
    ) -> LedgerResult<AddTransactionOutcome> {
        let identity = self.resolve_identity(&command)?;
        let subject = AddValidationSubject {
            command: &command,
            identity: &identity,
        };
        match validation::validate_add(&subject) {
            ValidationOutcome::Rejected(failure) => {
                info!("add request rejected: {}", failure.message);
                return Ok(AddTransactionOutcome::Rejected(failure));
            }
            ValidationOutcome::ConfirmationRequired => {
                info!("add request held pending confirmation");
                return Ok(AddTransactionOutcome::ConfirmationRequired);
            }
            ValidationOutcome::Valid => {}
        }

        let link = match identity {
            IdentityResolution::Resolved(link) => link,
            other => {
                return Err(LedgerError::System(anyhow!(
                    "identity {other:?} survived validation unresolved"
                )))
            }
        };

        let amount = validation::parse_amount(command.amount.as_deref().unwrap_or_default())
            .map_err(|failure| LedgerError::System(anyhow!(failure.message)))?;
        let processing_date = match validation::given(&command.processing_date) {
            Some(raw) => validation::parse_flexible_date(raw).ok_or_else(|| {
                LedgerError::System(anyhow!("processing date unparseable after validation"))
            })?,
            None => Utc::now().date_naive(),
        };
        let original_date = match validation::given(&command.original_date) {
            Some(raw) => validation::parse_flexible_date(raw).ok_or_else(|| {
                LedgerError::System(anyhow!("original date unparseable after validation"))
            })?,
            None => processing_date,
        };

        let transaction_id = self.id_generator.next_id()?;

        let current_balance = self
            .accounts
            .current_balance(&link.account_id)
            .map_err(LedgerError::System)?
            .ok_or_else(|| {
                LedgerError::System(anyhow!(
                    "account {} has no balance record",
                    link.account_id
                ))
            })?;
        let effect = reference::balance_effect(command.type_code.trim()).ok_or_else(|| {
            LedgerError::System(anyhow!(
                "type code {} has no debit/credit classification",
                command.type_code
            ))
        })?;
        let snapshot = balance::compute_balance_impact(effect, amount, current_balance);

        let now = Utc::now();
        let mut transaction = Transaction {
            id: transaction_id,
            type_code: command.type_code.trim().to_string(),
            category_code: command.category_code.trim().to_string(),
            source: command.source.trim().to_string(),
            description: command.description.trim().to_string(),
            amount,
            card_number: link.card_number.clone(),
            merchant_id: validation::given(&command.merchant_id)
                .unwrap_or_default()
                .to_string(),
            merchant_name: command.merchant_name.trim().to_string(),
            merchant_city: command.merchant_city.trim().to_string(),
            merchant_zip: command.merchant_zip.trim().to_string(),
            original_date,
            processing_date,
            created_at: now,
            updated_at: now,
        };

        for attempt in 1..=MAX_SAVE_ATTEMPTS {
            match self.transactions.save(&transaction) {
                Ok(persisted) => {
                    info!(
                        "recorded transaction {} against card {} for account {}",
                        persisted.id, persisted.card_number, link.account_id
                    );
                    return Ok(AddTransactionOutcome::Created(CreatedTransaction {
                        transaction: persisted,
                        balance: snapshot,
                    }));
                }
                Err(e) if e.downcast_ref::<DuplicateIdError>().is_some() => {
                    if attempt == MAX_SAVE_ATTEMPTS {
                        return Err(LedgerError::Conflict(e.to_string()));
                    }
                    warn!(
                        "identifier {} collided at write time, reallocating",
                        transaction.id
                    );
                    transaction.id = self.id_generator.next_id()?;
                }
                Err(e) => return Err(LedgerError::System(e)),
            }
        }
        Err(LedgerError::conflict(
            "transaction identifier allocation kept colliding",
        ))
    }

    /// List transactions for a normalized filter. A query that fails the
    /// collect-all validation is rejected before any store access.
    pub fn list_transactions(&self, query: TransactionListQuery) -> LedgerResult<ListOutcome> {
        match ListFilter::normalize(&query) {
            Ok(filter) => Ok(ListOutcome::Page(self.query_engine.run(&filter)?)),
            Err(failures) => {
                info!("list request rejected with {} rule failures", failures.len());
                Ok(ListOutcome::Rejected(failures))
            }
        }
    }

    /// Look up a single transaction by identifier.
    pub fn get_transaction(&self, transaction_id: &str) -> LedgerResult<DetailOutcome> {
        if let Some(failure) = validation::transaction_id_failure(transaction_id) {
            return Ok(DetailOutcome::Rejected(failure));
        }
        match self
            .transactions
            .find_by_id(transaction_id)
            .map_err(LedgerError::System)?
        {
            Some(transaction) => Ok(DetailOutcome::Found(transaction)),
            None => Err(LedgerError::NotFound),
        }
    }

    /// One account-store round trip resolving the identity fields; skipped
    /// entirely when neither field was supplied.
    fn resolve_identity(&self, command: &AddTransactionCommand) -> LedgerResult<IdentityResolution> {
        let account_id = validation::given(&command.account_id);
        let card_number = validation::given(&command.card_number);
        if account_id.is_none() && card_number.is_none() {
            return Ok(IdentityResolution::Missing);
        }
        self.accounts
            .resolve_link(account_id, card_number)
            .map_err(LedgerError::System)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id_generator::FIRST_TRANSACTION_ID;
    use crate::domain::models::account::{Account, Card};
    use crate::domain::query::{AccessPath, SortSpec};
    use crate::domain::validation::FailureKind;
    use crate::storage::csv::{AccountRepository, CsvConnection, TransactionRepository};
    use anyhow::Result;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Mutex;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_service() -> (TransactionService, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let accounts = AccountRepository::new(connection.clone());
        accounts
            .save_account(&Account {
                account_id: "12345678901".to_string(),
                current_balance: dec("0.00"),
                credit_limit: dec("5000.00"),
                open_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            })
            .unwrap();
        accounts
            .save_card(&Card {
                card_number: "4111111111111111".to_string(),
                account_id: "12345678901".to_string(),
                embossed_name: "JANE DOE".to_string(),
                active: true,
            })
            .unwrap();
        let transactions = TransactionRepository::new(connection);
        let service = TransactionService::new(Arc::new(transactions), Arc::new(accounts));
        (service, temp_dir)
    }

    fn confirmed_command() -> AddTransactionCommand {
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

    #[test]
    fn confirmed_add_on_an_empty_store_uses_the_seed_identifier() {
        let (service, _temp_dir) = create_test_service();
        let outcome = service.add_transaction(confirmed_command()).unwrap();
        match outcome {
            AddTransactionOutcome::Created(created) => {
                assert_eq!(created.transaction.id, FIRST_TRANSACTION_ID);
                assert_eq!(created.transaction.card_number, "4111111111111111");
                assert_eq!(created.balance.previous, dec("0.00"));
                assert_eq!(created.balance.current, dec("100.00"));
            }
            other => panic!("expected created, got {other:?}"),
        }
    }

    #[test]
    fn sequential_adds_produce_increasing_identifiers() {
        let (service, _temp_dir) = create_test_service();
        let mut previous_id = String::new();
        for _ in 0..3 {
            match service.add_transaction(confirmed_command()).unwrap() {
                AddTransactionOutcome::Created(created) => {
                    assert!(created.transaction.id > previous_id);
                    previous_id = created.transaction.id;
                }
                other => panic!("expected created, got {other:?}"),
            }
        }
        assert_eq!(previous_id, "0000000000000003");
    }

    #[test]
    fn unconfirmed_add_allocates_nothing_and_writes_nothing() {
        let (service, _temp_dir) = create_test_service();
        let mut command = confirmed_command();
        command.confirmed = Some(false);
        let outcome = service.add_transaction(command).unwrap();
        assert_eq!(outcome, AddTransactionOutcome::ConfirmationRequired);
        assert_eq!(service.transactions.find_highest_id().unwrap(), None);
    }

    #[test]
    fn missing_identity_is_rejected_before_identifier_generation() {
        let (service, _temp_dir) = create_test_service();
        let mut command = confirmed_command();
        command.account_id = None;
        command.card_number = None;
        match service.add_transaction(command).unwrap() {
            AddTransactionOutcome::Rejected(failure) => {
                assert_eq!(failure.kind, FailureKind::CrossReference);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(service.transactions.find_highest_id().unwrap(), None);
    }

    #[test]
    fn card_only_request_resolves_the_owning_account() {
        let (service, _temp_dir) = create_test_service();
        let mut command = confirmed_command();
        command.account_id = None;
        match service.add_transaction(command).unwrap() {
            AddTransactionOutcome::Created(created) => {
                assert_eq!(created.transaction.card_number, "4111111111111111");
            }
            other => panic!("expected created, got {other:?}"),
        }
    }

    #[test]
    fn credit_type_decreases_the_owed_balance() {
        let (service, _temp_dir) = create_test_service();
        let mut command = confirmed_command();
        command.type_code = "02".to_string();
        command.category_code = "0008".to_string();
        match service.add_transaction(command).unwrap() {
            AddTransactionOutcome::Created(created) => {
                assert_eq!(created.balance.current, dec("-100.00"));
            }
            other => panic!("expected created, got {other:?}"),
        }
    }

    #[test]
    fn detail_lookup_round_trips_a_persisted_transaction() {
        let (service, _temp_dir) = create_test_service();
        service.add_transaction(confirmed_command()).unwrap();
        match service.get_transaction(FIRST_TRANSACTION_ID).unwrap() {
            DetailOutcome::Found(transaction) => {
                assert_eq!(transaction.description, "Grocery run");
                assert_eq!(transaction.amount, dec("100.00"));
            }
            other => panic!("expected found, got {other:?}"),
        }
    }

    #[test]
    fn detail_lookup_of_an_unknown_identifier_is_not_found() {
        let (service, _temp_dir) = create_test_service();
        match service.get_transaction("0000000000009999") {
            Err(LedgerError::NotFound) => {}
            other => panic!("expected not-found, got {other:?}"),
        }
    }

    #[test]
    fn detail_lookup_of_a_malformed_identifier_is_rejected() {
        let (service, _temp_dir) = create_test_service();
        match service.get_transaction("short").unwrap() {
            DetailOutcome::Rejected(failure) => {
                assert_eq!(failure.kind, FailureKind::Format);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn account_and_date_range_list_takes_the_composite_account_path() {
        let (service, _temp_dir) = create_test_service();
        service.add_transaction(confirmed_command()).unwrap();

        let query = TransactionListQuery {
            account_id: Some("12345678901".to_string()),
            from_date: Some("2024-01-01".to_string()),
            to_date: Some("2024-12-31".to_string()),
            ..TransactionListQuery::default()
        };
        match service.list_transactions(query).unwrap() {
            ListOutcome::Page(page) => {
                assert_eq!(page.total_records, 1);
                assert!(page.applied_filter.starts_with("account 12345678901"));
            }
            other => panic!("expected page, got {other:?}"),
        }
    }

    #[test]
    fn exhausted_write_collisions_surface_as_a_conflict() {
        use crate::domain::models::account::CardAccountLink;

        struct AlwaysCollidingStore;

        impl TransactionStore for AlwaysCollidingStore {
            fn find_highest_id(&self) -> Result<Option<String>> {
                Ok(Some("0000000000000001".to_string()))
            }

            fn find_by_id(&self, _transaction_id: &str) -> Result<Option<Transaction>> {
                Ok(None)
            }

            fn save(&self, transaction: &Transaction) -> Result<Transaction> {
                Err(DuplicateIdError(transaction.id.clone()).into())
            }

            fn query(
                &self,
                _path: &AccessPath,
                _sort: &SortSpec,
                _offset: u64,
                _limit: u64,
            ) -> Result<(Vec<Transaction>, u64)> {
                Ok((Vec::new(), 0))
            }
        }

        struct OneAccount;

        impl AccountStore for OneAccount {
            fn resolve_link(
                &self,
                _account_id: Option<&str>,
                _card_number: Option<&str>,
            ) -> Result<IdentityResolution> {
                Ok(IdentityResolution::Resolved(CardAccountLink {
                    account_id: "12345678901".to_string(),
                    card_number: "4111111111111111".to_string(),
                }))
            }

            fn current_balance(&self, _account_id: &str) -> Result<Option<Decimal>> {
                Ok(Some(Decimal::ZERO))
            }
        }

        let service =
            TransactionService::new(Arc::new(AlwaysCollidingStore), Arc::new(OneAccount));
        match service.add_transaction(confirmed_command()) {
            Err(LedgerError::Conflict(_)) => {}
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn inverted_date_range_list_is_rejected_before_any_store_call() {
        // Counting store: the assertion is that the filter rejection happens
        // strictly before dispatch, so the store sees zero queries.
        struct CountingStore {
            queries: Mutex<u32>,
        }

        impl TransactionStore for CountingStore {
            fn find_highest_id(&self) -> Result<Option<String>> {
                Ok(None)
            }

            fn find_by_id(&self, _transaction_id: &str) -> Result<Option<Transaction>> {
                Ok(None)
            }

            fn save(&self, transaction: &Transaction) -> Result<Transaction> {
                Ok(transaction.clone())
            }

            fn query(
                &self,
                _path: &AccessPath,
                _sort: &SortSpec,
                _offset: u64,
                _limit: u64,
            ) -> Result<(Vec<Transaction>, u64)> {
                *self.queries.lock().unwrap() += 1;
                Ok((Vec::new(), 0))
            }
        }

        struct NoAccounts;

        impl AccountStore for NoAccounts {
            fn resolve_link(
                &self,
                _account_id: Option<&str>,
                _card_number: Option<&str>,
            ) -> Result<IdentityResolution> {
                Ok(IdentityResolution::Missing)
            }

            fn current_balance(&self, _account_id: &str) -> Result<Option<Decimal>> {
                Ok(None)
            }
        }

        let store = Arc::new(CountingStore {
            queries: Mutex::new(0),
        });
        let service = TransactionService::new(store.clone(), Arc::new(NoAccounts));

        let query = TransactionListQuery {
            from_date: Some("2024-06-01".to_string()),
            to_date: Some("2024-01-01".to_string()),
            ..TransactionListQuery::default()
        };
        match service.list_transactions(query).unwrap() {
            ListOutcome::Rejected(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].kind, FailureKind::Temporal);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(*store.queries.lock().unwrap(), 0);
    }
}
