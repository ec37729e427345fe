//! # Transaction Workflow
//!
//! Purchase, Redeem and GetReport over the four store ports.
//!
//! ## Purchase Flow
//! ```text
//! POST /transactions { customer_name, product_id, quantity, transaction_date? }
//!      │
//!      ▼
//! validate (quantity, name, date)        ── 400, no store touched
//!      │
//!      ▼
//! catalog.get_by_id ── None ──────────────── 404 product not found
//!      │
//!      ▼
//! stock snapshot < quantity ──────────────── 409 insufficient stock
//!      │
//!      ▼
//! customers.get_by_name ── None ──► customers.create(name)   (0 points)
//!      │
//!      ▼
//! total = price × qty ; points = floor(total / 1000)
//!      │
//!      ▼
//! [StockReserved]  catalog.apply_stock_delta(-qty)
//! [PointsUpdated]  customers.apply_points_delta(+points)   fail → undo stock
//! [Recorded]       ledger.create(transaction)              fail → undo points, stock
//!      │
//!      ▼
//! [Committed] → 201 Transaction
//! ```
//!
//! ## Report Flow (cache-aside)
//! ```text
//! cache.get(start, end) ── hit ──► return (ledger untouched)
//!      │ miss / read error
//!      ▼
//! ledger.aggregate_report(start, end)
//!      │
//!      ▼
//! cache.set(start, end, report, ttl)   (write errors logged and dropped)
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use snack_core::loyalty::{points_earned, redemption_cost};
use snack_core::validation::{
    parse_date, parse_optional_date, validate_customer_name, validate_quantity,
};
use snack_core::{
    CoreError, Customer, NewTransaction, Product, ProductSize, SalesReport, Transaction, ValidationError,
};

use crate::error::{WorkflowError, WorkflowResult};
use crate::ports::{CacheScope, CatalogStore, CustomerStore, LedgerStore, ReportCache, StoreError};
use crate::saga::{Compensation, PurchaseStage, RedeemStage, Saga, SagaStage};
use crate::DEFAULT_REPORT_TTL;

// =============================================================================
// Requests and Results
// =============================================================================

/// Input of a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub customer_name: String,
    pub product_id: i64,
    pub quantity: i64,
    /// `YYYY-MM-DD`; the current instant when absent or blank.
    #[serde(default)]
    pub transaction_date: Option<String>,
}

/// Input of a point redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub customer_name: String,
    pub product_id: i64,
}

/// What a successful redemption did.
///
/// Redemptions are not written to the ledger; this receipt is the only record
/// returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    pub customer_id: i64,
    pub customer_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub product_size: ProductSize,
    pub points_spent: i64,
    /// Balance after the debit, computed from the lookup snapshot.
    pub points_remaining: i64,
}

// =============================================================================
// Workflow
// =============================================================================

/// Orchestrates the stores for one request at a time.
///
/// Holds no mutable state; clone the `Arc` handles freely.
#[derive(Clone)]
pub struct TransactionWorkflow {
    catalog: Arc<dyn CatalogStore>,
    customers: Arc<dyn CustomerStore>,
    ledger: Arc<dyn LedgerStore>,
    cache: Arc<dyn ReportCache>,
    report_ttl: Duration,
    span: Span,
}

impl TransactionWorkflow {
    /// Creates a workflow whose events are all emitted inside `span`.
    ///
    /// ## Example
    /// ```rust
    /// use std::sync::Arc;
    /// use snack_workflow::memory::{MemoryCatalog, MemoryCustomers, MemoryLedger, MemoryReportCache};
    /// use snack_workflow::TransactionWorkflow;
    ///
    /// let workflow = TransactionWorkflow::new(
    ///     Arc::new(MemoryCatalog::new()),
    ///     Arc::new(MemoryCustomers::new()),
    ///     Arc::new(MemoryLedger::new()),
    ///     Arc::new(MemoryReportCache::new()),
    ///     tracing::info_span!("workflow"),
    /// );
    /// # let _ = workflow;
    /// ```
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        customers: Arc<dyn CustomerStore>,
        ledger: Arc<dyn LedgerStore>,
        cache: Arc<dyn ReportCache>,
        span: Span,
    ) -> Self {
        TransactionWorkflow {
            catalog,
            customers,
            ledger,
            cache,
            report_ttl: DEFAULT_REPORT_TTL,
            span,
        }
    }

    /// Sets the expiry of cached reports.
    pub fn with_report_ttl(mut self, ttl: Duration) -> Self {
        self.report_ttl = ttl;
        self
    }

    pub fn report_ttl(&self) -> Duration {
        self.report_ttl
    }

    // =========================================================================
    // Purchase
    // =========================================================================

    /// Sells `quantity` units of a product and records the transaction.
    ///
    /// ## Errors
    /// - Validation: quantity <= 0, empty name, malformed date, total too large
    /// - NotFound: unknown product
    /// - Conflict: insufficient stock (snapshot or guarded update)
    /// - Store: any store failure, after completed steps were compensated
    pub async fn purchase(&self, request: PurchaseRequest) -> WorkflowResult<Transaction> {
        let span = info_span!(
            parent: &self.span,
            "purchase",
            customer = %request.customer_name,
            product_id = request.product_id,
            quantity = request.quantity,
        );
        self.run_purchase(request).instrument(span).await
    }

    async fn run_purchase(&self, request: PurchaseRequest) -> WorkflowResult<Transaction> {
        validate_quantity(request.quantity)?;
        validate_customer_name(&request.customer_name)?;
        let transaction_date = resolve_transaction_date(request.transaction_date.as_deref(), Utc::now())?;

        let product = self
            .catalog
            .get_by_id(request.product_id)
            .await?
            .ok_or(CoreError::ProductNotFound(request.product_id))?;

        if !product.has_stock_for(request.quantity) {
            warn!(
                available = product.quantity,
                "purchase refused: insufficient stock"
            );
            return Err(CoreError::InsufficientStock {
                product_id: product.id,
                available: product.quantity,
                requested: request.quantity,
            }
            .into());
        }

        let points = points_earned(product.total_for(request.quantity)?);

        let customer = self.resolve_customer(&request.customer_name).await?;
        let record = NewTransaction::sale(&customer, &product, request.quantity, transaction_date)?;

        let mut saga = Saga::begin(PurchaseStage::Validated);

        let stock_delta = -request.quantity;
        self.catalog
            .apply_stock_delta(product.id, stock_delta)
            .await
            .map_err(|err| stock_refused(err, &product, request.quantity))?;
        saga.advance(
            PurchaseStage::StockReserved,
            Compensation::reverse_stock(product.id, stock_delta),
        );

        if let Err(err) = self.customers.apply_points_delta(customer.id, points).await {
            return Err(self.compensate(&mut saga, err.into()).await);
        }
        saga.advance(
            PurchaseStage::PointsUpdated,
            Compensation::reverse_points(customer.id, points),
        );

        let transaction = match self.ledger.create(record).await {
            Ok(transaction) => transaction,
            Err(err) => return Err(self.compensate(&mut saga, err.into()).await),
        };
        saga.reach(PurchaseStage::Recorded);
        saga.commit(PurchaseStage::Committed);

        info!(
            transaction_id = %transaction.id,
            total = %transaction.total_price,
            points,
            is_new_customer = transaction.is_new_customer,
            "purchase committed"
        );
        Ok(transaction)
    }

    /// Finds the customer, creating it on first purchase.
    ///
    /// Only an absent record triggers creation. If a concurrent purchase
    /// created the same name first, the existing record is used.
    async fn resolve_customer(&self, name: &str) -> WorkflowResult<Customer> {
        if let Some(customer) = self.customers.get_by_name(name).await? {
            return Ok(customer);
        }

        match self.customers.create(name).await {
            Ok(customer) => {
                info!(customer_id = customer.id, "customer registered");
                Ok(customer)
            }
            Err(StoreError::Constraint(reason)) => {
                debug!(%reason, "customer created concurrently, reloading");
                self.customers
                    .get_by_name(name)
                    .await?
                    .ok_or_else(|| StoreError::Constraint(reason).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    // =========================================================================
    // Redeem
    // =========================================================================

    /// Exchanges points for one unit of a product.
    ///
    /// ## Cost Table
    /// Small 200, Medium 300, Large 500 points. No ledger entry is written.
    pub async fn redeem(&self, request: RedeemRequest) -> WorkflowResult<Redemption> {
        let span = info_span!(
            parent: &self.span,
            "redeem",
            customer = %request.customer_name,
            product_id = request.product_id,
        );
        self.run_redeem(request).instrument(span).await
    }

    async fn run_redeem(&self, request: RedeemRequest) -> WorkflowResult<Redemption> {
        validate_customer_name(&request.customer_name)?;

        let product = self
            .catalog
            .get_by_id(request.product_id)
            .await?
            .ok_or(CoreError::ProductNotFound(request.product_id))?;

        let cost = redemption_cost(&product.size)?;

        let customer = match self.customers.get_by_name(&request.customer_name).await {
            Ok(Some(customer)) => customer,
            Ok(None) => {
                return Err(CoreError::CustomerNotFound(request.customer_name).into());
            }
            Err(err) => {
                warn!(error = %err, "customer lookup failed");
                return Err(CoreError::CustomerNotFound(request.customer_name).into());
            }
        };

        if customer.points < cost {
            warn!(
                points = customer.points,
                required = cost,
                "redemption failed: insufficient points"
            );
            return Err(CoreError::InsufficientPoints {
                customer: customer.name,
                available: customer.points,
                required: cost,
            }
            .into());
        }

        let mut saga = Saga::begin(RedeemStage::Validated);

        self.customers
            .apply_points_delta(customer.id, -cost)
            .await
            .map_err(|err| match err {
                StoreError::Constraint(reason) => {
                    warn!(%reason, "points debit refused by store");
                    WorkflowError::from(CoreError::InsufficientPoints {
                        customer: customer.name.clone(),
                        available: customer.points,
                        required: cost,
                    })
                }
                other => WorkflowError::from(other),
            })?;
        saga.advance(
            RedeemStage::PointsDebited,
            Compensation::reverse_points(customer.id, -cost),
        );

        if let Err(err) = self.catalog.apply_stock_delta(product.id, -1).await {
            let cause = stock_refused(err, &product, 1);
            return Err(self.compensate(&mut saga, cause).await);
        }
        saga.reach(RedeemStage::StockReleased);
        saga.commit(RedeemStage::Committed);

        info!(points_spent = cost, "redemption committed");
        Ok(Redemption {
            customer_id: customer.id,
            customer_name: customer.name,
            product_id: product.id,
            product_name: product.name,
            product_size: product.size,
            points_spent: cost,
            points_remaining: customer.points - cost,
        })
    }

    // =========================================================================
    // Compensation
    // =========================================================================

    /// Undoes every completed step of `saga` and hands back `cause`.
    ///
    /// A compensation that fails is logged at error level; the remaining
    /// compensations still run and `cause` is still returned.
    async fn compensate<S: SagaStage>(&self, saga: &mut Saga<S>, cause: WorkflowError) -> WorkflowError {
        let failed_after = saga.stage();
        warn!(
            saga = S::SAGA,
            stage = %failed_after,
            error = %cause,
            "step failed, compensating"
        );

        for step in saga.unwind() {
            let result = match step {
                Compensation::Stock { product_id, delta } => {
                    self.catalog.apply_stock_delta(product_id, delta).await
                }
                Compensation::Points { customer_id, delta } => {
                    self.customers.apply_points_delta(customer_id, delta).await
                }
            };

            match result {
                Ok(()) => debug!(saga = S::SAGA, compensation = ?step, "compensated"),
                Err(err) => error!(
                    saga = S::SAGA,
                    stage = %failed_after,
                    compensation = ?step,
                    error = %err,
                    "compensation failed, manual correction required"
                ),
            }
        }

        cause
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Sales report for raw `YYYY-MM-DD` bounds.
    ///
    /// `end` defaults to today (UTC) when absent or blank.
    pub async fn get_report(&self, start: &str, end: Option<&str>) -> WorkflowResult<SalesReport> {
        let (start, end) = parse_report_range(start, end, Utc::now().date_naive())?;
        self.report_for(start, end).await
    }

    /// Sales report for the inclusive range `[start, end]`, cache-aside.
    pub async fn report_for(&self, start: NaiveDate, end: NaiveDate) -> WorkflowResult<SalesReport> {
        let span = info_span!(parent: &self.span, "report", %start, %end);
        async move {
            match self.cache.get(start, end).await {
                Ok(Some(report)) => {
                    debug!("report cache hit");
                    return Ok(report);
                }
                Ok(None) => debug!("report cache miss"),
                Err(err) => warn!(error = %err, "report cache read failed, treating as miss"),
            }

            let report = self.ledger.aggregate_report(start, end).await?;

            if let Err(err) = self.cache.set(start, end, &report, self.report_ttl).await {
                warn!(error = %err, "report cache write failed");
            }

            info!(
                transactions = report.transactions.len(),
                total_income = %report.total_income,
                "report aggregated"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Evicts cached reports. Unlike reads, eviction failures are returned.
    pub async fn evict_reports(&self, scope: CacheScope) -> WorkflowResult<u64> {
        let evicted = self
            .cache
            .invalidate(scope)
            .instrument(self.span.clone())
            .await?;
        self.span.in_scope(|| info!(?scope, evicted, "report cache evicted"));
        Ok(evicted)
    }
}

// =============================================================================
// Store Refusals
// =============================================================================

/// A guarded stock update that refuses the decrement reads as insufficient stock.
fn stock_refused(err: StoreError, product: &Product, requested: i64) -> WorkflowError {
    match err {
        StoreError::Constraint(reason) => {
            warn!(%reason, "stock update refused by store");
            CoreError::InsufficientStock {
                product_id: product.id,
                available: product.quantity,
                requested,
            }
            .into()
        }
        other => other.into(),
    }
}

// =============================================================================
// Date Helpers
// =============================================================================

/// Midnight UTC of the given date, or `now` when absent.
fn resolve_transaction_date(
    raw: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    Ok(parse_optional_date("transaction_date", raw)?
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        .unwrap_or(now))
}

/// Parses report bounds; a blank `end` becomes `today`.
pub fn parse_report_range(
    start: &str,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    if start.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "start".to_string(),
        });
    }
    let start = parse_date("start", start)?;
    let end = parse_optional_date("end", end)?.unwrap_or(today);
    Ok((start, end))
}

/// Parses the bounds of a cache eviction: both dates, or neither.
pub fn parse_cache_scope(start: Option<&str>, end: Option<&str>) -> Result<CacheScope, ValidationError> {
    match (
        parse_optional_date("start", start)?,
        parse_optional_date("end", end)?,
    ) {
        (Some(start), Some(end)) => Ok(CacheScope::Range { start, end }),
        (None, None) => Ok(CacheScope::AllReports),
        (Some(_), None) => Err(ValidationError::Required {
            field: "end".to_string(),
        }),
        (None, Some(_)) => Err(ValidationError::Required {
            field: "start".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
