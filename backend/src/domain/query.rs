//! Filtered listing and pagination for the card ledger.
//!
//! The store exposes a handful of indexed access paths that cannot be
//! composed arbitrarily, so the engine picks the single most selective path
//! available instead of building a general composite filter. Which predicates
//! map to which path is a fixed priority table (`AccessPath::select`), kept
//! as data rather than nested conditionals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::domain::commands::transactions::TransactionListQuery;
use crate::domain::models::transaction::Transaction;
use crate::domain::validation::{self, given, ValidationFailure};
use crate::error::{LedgerError, LedgerResult};
use crate::storage::traits::TransactionStore;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sortable columns. The whitelist is closed; anything else is rejected
/// during list validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    ProcessingDate,
    OriginalDate,
    Amount,
    Id,
    CreatedAt,
}

impl SortField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "processing_date" => Some(Self::ProcessingDate),
            "original_date" => Some(Self::OriginalDate),
            "amount" => Some(Self::Amount),
            "id" => Some(Self::Id),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// Most recent first.
    fn default() -> Self {
        Self {
            field: SortField::ProcessingDate,
            direction: SortDirection::Descending,
        }
    }
}

/// A possibly half-open processing-date range. When both ends are present the
/// list validation already guaranteed `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Normalized query parameters for one listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilter {
    /// 0-based page index
    pub page: u32,
    pub page_size: u32,
    pub sort: SortSpec,
    pub transaction_id: Option<String>,
    pub card_number: Option<String>,
    pub account_id: Option<String>,
    pub date_range: DateRange,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub type_code: Option<String>,
    pub category_code: Option<String>,
    pub text: Option<String>,
}

impl ListFilter {
    /// Validate a raw query (collect-all mode) and normalize it. Page and
    /// page size are clamped rather than rejected; every other problem comes
    /// back as the full ordered failure list.
    pub fn normalize(query: &TransactionListQuery) -> Result<Self, Vec<ValidationFailure>> {
        let failures = validation::validate_list(query);
        if !failures.is_empty() {
            return Err(failures);
        }

        let sort = SortSpec {
            field: given(&query.sort)
                .and_then(SortField::from_name)
                .unwrap_or(SortField::ProcessingDate),
            direction: given(&query.direction)
                .and_then(SortDirection::from_name)
                .unwrap_or(SortDirection::Descending),
        };

        Ok(Self {
            page: query.page.unwrap_or(0),
            page_size: query
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            sort,
            transaction_id: given(&query.transaction_id).map(str::to_string),
            card_number: given(&query.card_number).map(str::to_string),
            account_id: given(&query.account_id).map(str::to_string),
            date_range: DateRange {
                from: given(&query.from_date).and_then(validation::parse_flexible_date),
                to: given(&query.to_date).and_then(validation::parse_flexible_date),
            },
            min_amount: given(&query.min_amount).and_then(|raw| Decimal::from_str(raw).ok()),
            max_amount: given(&query.max_amount).and_then(|raw| Decimal::from_str(raw).ok()),
            type_code: given(&query.type_code).map(str::to_string),
            category_code: given(&query.category_code).map(str::to_string),
            text: given(&query.text).map(str::to_string),
        })
    }
}

/// One store access path, tagged per predicate combination the store can
/// serve from an index. Secondary date ranges ride along only on the card
/// and account paths.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessPath {
    ById(String),
    ByCard {
        card_number: String,
        date_range: DateRange,
    },
    ByAccount {
        account_id: String,
        date_range: DateRange,
    },
    ByDateRange(DateRange),
    ByType(String),
    ByCategory(String),
    ByAmountRange {
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    ByText(String),
    Unfiltered,
}

impl AccessPath {
    /// Fixed priority table: the highest-priority predicate present wins.
    pub fn select(filter: &ListFilter) -> Self {
        if let Some(id) = &filter.transaction_id {
            return Self::ById(id.clone());
        }
        if let Some(card_number) = &filter.card_number {
            return Self::ByCard {
                card_number: card_number.clone(),
                date_range: filter.date_range,
            };
        }
        if let Some(account_id) = &filter.account_id {
            return Self::ByAccount {
                account_id: account_id.clone(),
                date_range: filter.date_range,
            };
        }
        if !filter.date_range.is_open() {
            return Self::ByDateRange(filter.date_range);
        }
        if let Some(type_code) = &filter.type_code {
            return Self::ByType(type_code.clone());
        }
        if let Some(category_code) = &filter.category_code {
            return Self::ByCategory(category_code.clone());
        }
        if filter.min_amount.is_some() || filter.max_amount.is_some() {
            return Self::ByAmountRange {
                min: filter.min_amount,
                max: filter.max_amount,
            };
        }
        if let Some(text) = &filter.text {
            return Self::ByText(text.clone());
        }
        Self::Unfiltered
    }

    /// Human-readable description of the applied filter, echoed back to the
    /// caller with each page.
    pub fn describe(&self) -> String {
        match self {
            Self::ById(id) => format!("transaction {id}"),
            Self::ByCard {
                card_number,
                date_range,
            } => format!("card {card_number}{}", describe_range(date_range)),
            Self::ByAccount {
                account_id,
                date_range,
            } => format!("account {account_id}{}", describe_range(date_range)),
            Self::ByDateRange(date_range) => {
                format!("all transactions{}", describe_range(date_range))
            }
            Self::ByType(code) => format!("type {code}"),
            Self::ByCategory(code) => format!("category {code}"),
            Self::ByAmountRange { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("amount between {min} and {max}"),
                (Some(min), None) => format!("amount at least {min}"),
                (None, Some(max)) => format!("amount at most {max}"),
                (None, None) => "any amount".to_string(),
            },
            Self::ByText(text) => format!("text \"{text}\""),
            Self::Unfiltered => "all transactions".to_string(),
        }
    }
}

fn describe_range(range: &DateRange) -> String {
    match (range.from, range.to) {
        (Some(from), Some(to)) => format!(" between {from} and {to}"),
        (Some(from), None) => format!(" from {from}"),
        (None, Some(to)) => format!(" through {to}"),
        (None, None) => String::new(),
    }
}

/// One page of query results plus the pagination arithmetic callers render.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub items: Vec<Transaction>,
    /// 1-based page number for external consumers
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub total_records: u64,
    /// Sum of the amounts on this page only. Recomputed from page content on
    /// every call, never cached.
    pub page_amount_total: Decimal,
    pub applied_filter: String,
}

/// Executes normalized list filters against the transaction store.
pub struct QueryEngine {
    store: Arc<dyn TransactionStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    pub fn run(&self, filter: &ListFilter) -> LedgerResult<PageResult> {
        let path = AccessPath::select(filter);
        debug!("list query dispatched to path: {}", path.describe());

        let offset = u64::from(filter.page) * u64::from(filter.page_size);
        let (items, total_records) = self
            .store
            .query(&path, &filter.sort, offset, u64::from(filter.page_size))
            .map_err(LedgerError::System)?;

        let page_size = u64::from(filter.page_size);
        let total_pages = if total_records == 0 {
            0
        } else {
            (total_records + page_size - 1) / page_size
        };
        let page_amount_total = items
            .iter()
            .fold(Decimal::ZERO, |acc, tx| acc + tx.amount);

        Ok(PageResult {
            items,
            page: filter.page + 1,
            page_size: filter.page_size,
            total_pages,
            total_records,
            page_amount_total,
            applied_filter: path.describe(),
        })
    }
}
