//! # Store Ports
//!
//! The four collaborators the workflow orchestrates, as async traits.
//!
//! ## Port Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      TransactionWorkflow                                │
//! │                                                                         │
//! │   Arc<dyn CatalogStore>   Arc<dyn CustomerStore>                       │
//! │   Arc<dyn LedgerStore>    Arc<dyn ReportCache>                         │
//! │          │                        │                                     │
//! │   ┌──────┴───────┐         ┌──────┴───────┐                            │
//! │   │ snack-db     │         │ memory.rs    │                            │
//! │   │ Pg* / Redis* │         │ Memory*      │                            │
//! │   └──────────────┘         └──────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Absent vs Unavailable
//! Lookups return `Ok(None)` when the record does not exist and `Err` when the
//! store could not answer. The workflow only creates customers on `Ok(None)`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use snack_core::{Customer, NewProduct, NewTransaction, Product, SalesReport, Transaction};

// =============================================================================
// Store Error
// =============================================================================

/// Failure reported by a store across the port boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The row targeted by a mutation does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A guarded update or unique index refused the write.
    ///
    /// ## When This Occurs
    /// - Stock delta would drive quantity below zero
    /// - Points delta would drive the balance below zero
    /// - Customer name already exists
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// The store could not be reached (pool exhausted, connection refused).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with an unexpected failure.
    #[error("store failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Cache Scope
// =============================================================================

/// Which cached reports to evict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    /// The report for exactly this inclusive range.
    Range { start: NaiveDate, end: NaiveDate },
    /// Every cached report.
    AllReports,
}

// =============================================================================
// Ports
// =============================================================================

/// Product persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Product>>;

    /// Products manufactured on `date`.
    async fn get_by_date(&self, date: NaiveDate) -> StoreResult<Vec<Product>>;

    async fn create(&self, product: NewProduct) -> StoreResult<Product>;

    /// Atomically adds `delta` to the stock of product `id`.
    ///
    /// ## Errors
    /// - `NotFound` if the product does not exist
    /// - `Constraint` if the result would be negative
    async fn apply_stock_delta(&self, id: i64, delta: i64) -> StoreResult<()>;
}

/// Customer persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Exact, case-sensitive name match.
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Customer>>;

    /// Creates a customer with zero points.
    async fn create(&self, name: &str) -> StoreResult<Customer>;

    /// Atomically adds `delta` to the balance of customer `id`.
    ///
    /// ## Errors
    /// - `NotFound` if the customer does not exist
    /// - `Constraint` if a negative delta would drive the balance below zero
    async fn apply_points_delta(&self, id: i64, delta: i64) -> StoreResult<()>;

    /// All customers, highest balance first.
    async fn list_all(&self) -> StoreResult<Vec<Customer>>;
}

/// Append-only transaction ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn create(&self, transaction: NewTransaction) -> StoreResult<Transaction>;

    /// Aggregates the ledger over the inclusive range `[start, end]` from one
    /// consistent snapshot.
    async fn aggregate_report(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<SalesReport>;
}

/// Report cache keyed by date range.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportCache: Send + Sync {
    async fn get(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Option<SalesReport>>;

    async fn set(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        report: &SalesReport,
        ttl: Duration,
    ) -> StoreResult<()>;

    /// Returns the number of evicted entries.
    async fn invalidate(&self, scope: CacheScope) -> StoreResult<u64>;
}
