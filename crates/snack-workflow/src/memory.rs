//! # In-Memory Stores
//!
//! Implementations of the four ports backed by `tokio::sync::RwLock`.
//! Used by the workflow tests, the router tests and `STORAGE_BACKEND=memory`
//! demo runs. Each store counts the calls that tests assert on.
//!
//! The guarded-delta semantics match the PostgreSQL adapter: a delta that
//! would drive stock or points below zero is refused with
//! `StoreError::Constraint` and leaves the row untouched.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use snack_core::{Customer, NewProduct, NewTransaction, Product, SalesReport, Transaction};

use crate::ports::{
    CacheScope, CatalogStore, CustomerStore, LedgerStore, ReportCache, StoreError, StoreResult,
};

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: RwLock<BTreeMap<i64, Product>>,
    next_id: AtomicI64,
    stock_updates: AtomicUsize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated catalog; identifiers are kept as given.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products: BTreeMap<i64, Product> = products.into_iter().map(|p| (p.id, p)).collect();
        let next_id = products.keys().max().copied().unwrap_or(0);
        MemoryCatalog {
            products: RwLock::new(products),
            next_id: AtomicI64::new(next_id),
            stock_updates: AtomicUsize::new(0),
        }
    }

    /// Current stock of a product, if it exists.
    pub async fn stock_of(&self, id: i64) -> Option<i64> {
        self.products.read().await.get(&id).map(|p| p.quantity)
    }

    /// Number of stock deltas applied (successful or not).
    pub fn stock_update_count(&self) -> usize {
        self.stock_updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn get_by_date(&self, date: NaiveDate) -> StoreResult<Vec<Product>> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.manufacturing_date == date)
            .cloned()
            .collect())
    }

    async fn create(&self, product: NewProduct) -> StoreResult<Product> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let product = product.with_id(id);
        self.products.write().await.insert(id, product.clone());
        Ok(product)
    }

    async fn apply_stock_delta(&self, id: i64, delta: i64) -> StoreResult<()> {
        self.stock_updates.fetch_add(1, Ordering::SeqCst);

        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("product", id))?;

        if product.quantity + delta < 0 {
            return Err(StoreError::Constraint(format!(
                "stock of product {id} cannot drop below zero"
            )));
        }
        product.quantity += delta;
        Ok(())
    }
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryCustomers {
    customers: RwLock<BTreeMap<String, Customer>>,
    next_id: AtomicI64,
    creates: AtomicUsize,
    points_updates: AtomicUsize,
}

impl MemoryCustomers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        let customers: BTreeMap<String, Customer> = customers
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();
        let next_id = customers.values().map(|c| c.id).max().unwrap_or(0);
        MemoryCustomers {
            customers: RwLock::new(customers),
            next_id: AtomicI64::new(next_id),
            creates: AtomicUsize::new(0),
            points_updates: AtomicUsize::new(0),
        }
    }

    pub async fn points_of(&self, name: &str) -> Option<i64> {
        self.customers.read().await.get(name).map(|c| c.points)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn points_update_count(&self) -> usize {
        self.points_updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomers {
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Customer>> {
        Ok(self.customers.read().await.get(name).cloned())
    }

    async fn create(&self, name: &str) -> StoreResult<Customer> {
        let mut customers = self.customers.write().await;
        if customers.contains_key(name) {
            return Err(StoreError::Constraint(format!(
                "customer '{name}' already exists"
            )));
        }

        self.creates.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let customer = Customer {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: name.to_string(),
            points: 0,
            created_at: now,
            updated_at: now,
        };
        customers.insert(customer.name.clone(), customer.clone());
        Ok(customer)
    }

    async fn apply_points_delta(&self, id: i64, delta: i64) -> StoreResult<()> {
        self.points_updates.fetch_add(1, Ordering::SeqCst);

        let mut customers = self.customers.write().await;
        let customer = customers
            .values_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("customer", id))?;

        if delta < 0 && customer.points + delta < 0 {
            return Err(StoreError::Constraint(format!(
                "points of customer {id} cannot drop below zero"
            )));
        }
        customer.points += delta;
        customer.updated_at = Utc::now();
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<Customer>> {
        let mut customers: Vec<Customer> = self.customers.read().await.values().cloned().collect();
        customers.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.id.cmp(&b.id)));
        Ok(customers)
    }
}

// =============================================================================
// Ledger
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryLedger {
    transactions: RwLock<Vec<Transaction>>,
    aggregations: AtomicUsize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in insertion order.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.transactions.read().await.clone()
    }

    pub fn aggregation_count(&self) -> usize {
        self.aggregations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn create(&self, transaction: NewTransaction) -> StoreResult<Transaction> {
        let transaction = transaction.with_id(Uuid::new_v4());
        self.transactions.write().await.push(transaction.clone());
        Ok(transaction)
    }

    async fn aggregate_report(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<SalesReport> {
        self.aggregations.fetch_add(1, Ordering::SeqCst);
        let transactions = self.transactions.read().await;
        Ok(SalesReport::aggregate(start, end, transactions.iter()))
    }
}

// =============================================================================
// Report Cache
// =============================================================================

/// Stores reports as JSON, like the Redis cache, so that tests exercise the
/// same serialize/deserialize path.
#[derive(Debug, Default)]
pub struct MemoryReportCache {
    entries: RwLock<HashMap<(NaiveDate, NaiveDate), (String, Instant)>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ReportCache for MemoryReportCache {
    async fn get(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Option<SalesReport>> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let entries = self.entries.read().await;
        match entries.get(&(start, end)) {
            Some((payload, expires_at)) if *expires_at > Instant::now() => {
                let report = serde_json::from_str(payload)
                    .map_err(|e| StoreError::Backend(format!("corrupt cached report: {e}")))?;
                Ok(Some(report))
            }
            _ => Ok(None),
        }
    }

    async fn set(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        report: &SalesReport,
        ttl: Duration,
    ) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let payload = serde_json::to_string(report)
            .map_err(|e| StoreError::Backend(format!("cannot encode report: {e}")))?;
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        // drop lapsed ranges
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert((start, end), (payload, now + ttl));
        Ok(())
    }

    async fn invalidate(&self, scope: CacheScope) -> StoreResult<u64> {
        let mut entries = self.entries.write().await;
        let evicted = match scope {
            CacheScope::Range { start, end } => entries.remove(&(start, end)).map_or(0, |_| 1),
            CacheScope::AllReports => {
                let count = entries.len() as u64;
                entries.clear();
                count
            }
        };
        Ok(evicted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use snack_core::{Money, ProductSize};

    fn product(id: i64, quantity: i64) -> Product {
        Product {
            id,
            name: "Keripik".to_string(),
            product_type: "Chips".to_string(),
            flavor: "Balado".to_string(),
            size: ProductSize::Small,
            price: Money::from_major(10_000),
            quantity,
            manufacturing_date: NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_stock_delta_is_guarded() {
        let catalog = MemoryCatalog::with_products([product(1, 3)]);

        catalog.apply_stock_delta(1, -2).await.unwrap();
        assert_eq!(catalog.stock_of(1).await, Some(1));

        let err = catalog.apply_stock_delta(1, -2).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(catalog.stock_of(1).await, Some(1));

        let err = catalog.apply_stock_delta(99, -1).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(catalog.stock_update_count(), 3);
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let catalog = MemoryCatalog::with_products([product(4, 1)]);
        let p = product(0, 5);
        let created = catalog
            .create(NewProduct {
                name: p.name,
                product_type: p.product_type,
                flavor: p.flavor,
                size: p.size,
                price: p.price,
                quantity: p.quantity,
                manufacturing_date: p.manufacturing_date,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 5);

        let date = NaiveDate::from_ymd_opt(2025, 10, 22).unwrap();
        assert_eq!(catalog.get_by_date(date).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_customers_unique_and_sorted() {
        let customers = MemoryCustomers::new();
        let budi = customers.create("Budi").await.unwrap();
        let fery = customers.create("Fery").await.unwrap();
        assert!(customers.create("Budi").await.is_err());
        assert_eq!(customers.create_count(), 2);

        customers.apply_points_delta(fery.id, 300).await.unwrap();
        customers.apply_points_delta(budi.id, 20).await.unwrap();

        let err = customers.apply_points_delta(budi.id, -21).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        let listed = customers.list_all().await.unwrap();
        assert_eq!(listed[0].name, "Fery");
        assert_eq!(listed[1].points, 20);
    }

    #[tokio::test]
    async fn test_cache_expiry_and_invalidation() {
        let cache = MemoryReportCache::new();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let report = SalesReport::empty(start, end);

        cache.set(start, end, &report, Duration::ZERO).await.unwrap();
        assert_eq!(cache.get(start, end).await.unwrap(), None);

        cache
            .set(start, end, &report, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get(start, end).await.unwrap(), Some(report));

        let evicted = cache.invalidate(CacheScope::AllReports).await.unwrap();
        assert_eq!(evicted, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_set_purges_expired_ranges() {
        let cache = MemoryReportCache::new();
        let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();

        for d in 1..=5 {
            let report = SalesReport::empty(day(d), day(d));
            cache.set(day(d), day(d), &report, Duration::ZERO).await.unwrap();
        }

        let live = SalesReport::empty(day(10), day(20));
        cache
            .set(day(10), day(20), &live, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(day(10), day(20)).await.unwrap(), Some(live));
    }
}
