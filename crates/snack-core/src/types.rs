//! # Domain Types
//!
//! Core domain types used throughout Snack POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (UUID)      │       │
//! │  │  size           │   │  name (unique)  │   │  snapshots      │       │
//! │  │  price (Money)  │   │  points         │   │  total_price    │       │
//! │  │  quantity       │   │  created_at     │   │  is_new_customer│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────────────────────────┐     │
//! │  │  ProductSize    │   │  SalesReport (derived, cached)          │     │
//! │  │  Small/Medium/  │   │  totals + best seller + transactions    │     │
//! │  │  Large/Unknown  │   └─────────────────────────────────────────┘     │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A transaction freezes the customer name and the product name, size and
//! flavor at the time of sale. Reports never depend on the current catalog.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::NO_SALES_LABEL;

// =============================================================================
// Product Size
// =============================================================================

/// Package size of a product.
///
/// Sizes arrive from storage and HTTP as plain strings. Anything other than
/// the three known sizes is kept as `Unknown` so that the redemption table can
/// reject it explicitly instead of failing to decode the whole row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductSize {
    Small,
    Medium,
    Large,
    Unknown(String),
}

impl ProductSize {
    /// All sizes a product may be created with.
    pub const KNOWN: [ProductSize; 3] = [ProductSize::Small, ProductSize::Medium, ProductSize::Large];

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        match self {
            ProductSize::Small => "Small",
            ProductSize::Medium => "Medium",
            ProductSize::Large => "Large",
            ProductSize::Unknown(raw) => raw,
        }
    }

    /// Whether this is one of the three known sizes.
    pub fn is_known(&self) -> bool {
        !matches!(self, ProductSize::Unknown(_))
    }
}

impl From<&str> for ProductSize {
    fn from(raw: &str) -> Self {
        match raw {
            "Small" => ProductSize::Small,
            "Medium" => ProductSize::Medium,
            "Large" => ProductSize::Large,
            other => ProductSize::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ProductSize {
    fn from(raw: String) -> Self {
        ProductSize::from(raw.as_str())
    }
}

impl From<ProductSize> for String {
    fn from(size: ProductSize) -> Self {
        match size {
            ProductSize::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ProductSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Category label, e.g. "Chips".
    #[serde(rename = "type")]
    pub product_type: String,
    pub flavor: String,
    pub size: ProductSize,
    /// Unit price.
    pub price: Money,
    /// Quantity on hand.
    pub quantity: i64,
    pub manufacturing_date: NaiveDate,
}

impl Product {
    /// Whether the stock snapshot covers the requested quantity.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }

    /// Price for `quantity` units at the current unit price.
    ///
    /// Fails with `TooLarge` when the total leaves the cent range.
    pub fn total_for(&self, quantity: i64) -> Result<Money, ValidationError> {
        self.price
            .checked_mul(quantity)
            .ok_or_else(|| ValidationError::TooLarge {
                field: "total_price".to_string(),
            })
    }

    /// Best-seller label: "name - flavor".
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.flavor)
    }
}

/// A product that has not been stored yet (no identifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub flavor: String,
    pub size: ProductSize,
    pub price: Money,
    pub quantity: i64,
    pub manufacturing_date: NaiveDate,
}

impl NewProduct {
    /// Attaches a store-assigned identifier.
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            product_type: self.product_type,
            flavor: self.flavor,
            size: self.size,
            price: self.price,
            quantity: self.quantity,
            manufacturing_date: self.manufacturing_date,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A loyalty customer, identified to the cashier by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// A customer counts as new for transactions in the calendar month
    /// (and year) they were created in.
    pub fn is_new_at(&self, at: DateTime<Utc>) -> bool {
        is_same_month(self.created_at, at)
    }
}

/// Month/year equality used for the "is new customer" flag.
pub fn is_same_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed sale. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub customer_id: i64,
    pub customer_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub product_size: ProductSize,
    pub product_flavor: String,
    pub quantity: i64,
    /// Unit price at sale time × quantity.
    pub total_price: Money,
    pub transaction_date: DateTime<Utc>,
    pub is_new_customer: bool,
}

impl Transaction {
    /// Best-seller label of the product sold, from the snapshot.
    pub fn product_label(&self) -> String {
        format!("{} - {}", self.product_name, self.product_flavor)
    }
}

/// A sale about to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub customer_id: i64,
    pub customer_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub product_size: ProductSize,
    pub product_flavor: String,
    pub quantity: i64,
    pub total_price: Money,
    pub transaction_date: DateTime<Utc>,
    pub is_new_customer: bool,
}

impl NewTransaction {
    /// Builds the ledger record for `quantity` units of `product` sold to
    /// `customer` at `transaction_date`, snapshotting names and price.
    pub fn sale(
        customer: &Customer,
        product: &Product,
        quantity: i64,
        transaction_date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(NewTransaction {
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            product_id: product.id,
            product_name: product.name.clone(),
            product_size: product.size.clone(),
            product_flavor: product.flavor.clone(),
            quantity,
            total_price: product.total_for(quantity)?,
            transaction_date,
            is_new_customer: customer.is_new_at(transaction_date),
        })
    }

    /// Attaches a ledger-assigned identifier.
    pub fn with_id(self, id: Uuid) -> Transaction {
        Transaction {
            id,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            product_id: self.product_id,
            product_name: self.product_name,
            product_size: self.product_size,
            product_flavor: self.product_flavor,
            quantity: self.quantity,
            total_price: self.total_price,
            transaction_date: self.transaction_date,
            is_new_customer: self.is_new_customer,
        }
    }
}

// =============================================================================
// Sales Report
// =============================================================================

/// Aggregated sales for an inclusive date range.
///
/// Derived from the ledger, never stored authoritatively; cached as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Distinct customers with at least one sale in range.
    pub total_customers: i64,
    /// Units sold.
    pub total_products: i64,
    pub total_income: Money,
    /// "name - flavor" with the highest summed quantity, or the sentinel.
    pub best_seller: String,
    /// Most recent first.
    pub transactions: Vec<Transaction>,
}

impl SalesReport {
    /// A report for a range with no sales.
    pub fn empty(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        SalesReport {
            start_date,
            end_date,
            total_customers: 0,
            total_products: 0,
            total_income: Money::zero(),
            best_seller: NO_SALES_LABEL.to_string(),
            transactions: Vec::new(),
        }
    }

    /// Aggregates the transactions whose date falls in `[start_date, end_date]`.
    ///
    /// Transactions outside the range are ignored. Ties for best seller go
    /// to the alphabetically first label.
    pub fn aggregate<'a, I>(start_date: NaiveDate, end_date: NaiveDate, transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut in_range: Vec<Transaction> = transactions
            .into_iter()
            .filter(|t| {
                let day = t.transaction_date.date_naive();
                day >= start_date && day <= end_date
            })
            .cloned()
            .collect();

        if in_range.is_empty() {
            return SalesReport::empty(start_date, end_date);
        }

        in_range.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));

        let customers: HashSet<i64> = in_range.iter().map(|t| t.customer_id).collect();
        let total_products = in_range.iter().map(|t| t.quantity).sum();
        let total_income = in_range.iter().map(|t| t.total_price).sum();

        let mut units_by_label: BTreeMap<String, i64> = BTreeMap::new();
        for t in &in_range {
            *units_by_label.entry(t.product_label()).or_insert(0) += t.quantity;
        }
        // BTreeMap iterates labels in order, so the first maximum wins ties.
        let mut best: Option<(String, i64)> = None;
        for (label, units) in units_by_label {
            if best.as_ref().map_or(true, |(_, best_units)| units > *best_units) {
                best = Some((label, units));
            }
        }
        let best_seller = best
            .map(|(label, _)| label)
            .unwrap_or_else(|| NO_SALES_LABEL.to_string());

        SalesReport {
            start_date,
            end_date,
            total_customers: customers.len() as i64,
            total_products,
            total_income,
            best_seller,
            transactions: in_range,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn sale(customer_id: i64, name: &str, flavor: &str, qty: i64, when: DateTime<Utc>) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            customer_id,
            customer_name: format!("customer-{customer_id}"),
            product_id: 1,
            product_name: name.to_string(),
            product_size: ProductSize::Small,
            product_flavor: flavor.to_string(),
            quantity: qty,
            total_price: Money::from_major(1000 * qty),
            transaction_date: when,
            is_new_customer: false,
        }
    }

    #[test]
    fn test_product_size_strings() {
        assert_eq!(ProductSize::from("Small"), ProductSize::Small);
        assert_eq!(ProductSize::from("Large").as_str(), "Large");
        assert_eq!(
            ProductSize::from("Jumbo"),
            ProductSize::Unknown("Jumbo".to_string())
        );
        assert!(!ProductSize::from("small").is_known());
    }

    #[test]
    fn test_product_size_serde_is_plain_string() {
        let json = serde_json::to_string(&ProductSize::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");

        let size: ProductSize = serde_json::from_str("\"Family\"").unwrap();
        assert_eq!(size, ProductSize::Unknown("Family".to_string()));
        assert_eq!(serde_json::to_string(&size).unwrap(), "\"Family\"");
    }

    #[test]
    fn test_product_uses_type_field_name() {
        let json = r#"{
            "name": "Keripik",
            "type": "Chips",
            "flavor": "Balado",
            "size": "Small",
            "price": 10000,
            "quantity": 10,
            "manufacturing_date": "2025-10-22"
        }"#;
        let product: NewProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.product_type, "Chips");
        assert_eq!(product.price, Money::from_major(10_000));
        assert_eq!(product.manufacturing_date, day(2025, 10, 22));
    }

    #[test]
    fn test_is_new_customer_same_month_only() {
        let customer = Customer {
            id: 1,
            name: "Budi".to_string(),
            points: 0,
            created_at: at(2025, 10, 3, 9),
            updated_at: at(2025, 10, 3, 9),
        };
        assert!(customer.is_new_at(at(2025, 10, 31, 23)));
        assert!(!customer.is_new_at(at(2025, 11, 1, 0)));
        assert!(!customer.is_new_at(at(2024, 10, 3, 9)));
    }

    #[test]
    fn test_aggregate_empty_range_uses_sentinel() {
        let report = SalesReport::aggregate(day(2025, 1, 1), day(2025, 1, 31), &Vec::new());
        assert_eq!(report, SalesReport::empty(day(2025, 1, 1), day(2025, 1, 31)));
        assert_eq!(report.best_seller, "No sales yet");
        assert!(report.transactions.is_empty());
    }

    #[test]
    fn test_aggregate_totals_and_order() {
        let ledger = vec![
            sale(1, "Keripik", "Balado", 2, at(2025, 1, 5, 10)),
            sale(2, "Keripik", "Balado", 1, at(2025, 1, 20, 10)),
            sale(1, "Makaroni", "Pedas", 2, at(2025, 1, 31, 23)),
            // outside the range on both ends
            sale(3, "Makaroni", "Pedas", 9, at(2024, 12, 31, 23)),
            sale(3, "Makaroni", "Pedas", 9, at(2025, 2, 1, 0)),
        ];

        let report = SalesReport::aggregate(day(2025, 1, 1), day(2025, 1, 31), &ledger);

        assert_eq!(report.total_customers, 2);
        assert_eq!(report.total_products, 5);
        assert_eq!(report.total_income, Money::from_major(5000));
        assert_eq!(report.best_seller, "Keripik - Balado");
        assert_eq!(report.transactions.len(), 3);
        // most recent first
        assert_eq!(report.transactions[0].transaction_date, at(2025, 1, 31, 23));
        assert_eq!(report.transactions[2].transaction_date, at(2025, 1, 5, 10));
    }

    #[test]
    fn test_aggregate_best_seller_tie_is_alphabetical() {
        let ledger = vec![
            sale(1, "Makaroni", "Pedas", 2, at(2025, 3, 1, 8)),
            sale(2, "Basreng", "Original", 2, at(2025, 3, 2, 8)),
        ];
        let report = SalesReport::aggregate(day(2025, 3, 1), day(2025, 3, 2), &ledger);
        assert_eq!(report.best_seller, "Basreng - Original");
    }

    #[test]
    fn test_new_transaction_snapshots_sale() {
        let customer = Customer {
            id: 4,
            name: "Budi".to_string(),
            points: 0,
            created_at: at(2025, 10, 1, 8),
            updated_at: at(2025, 10, 1, 8),
        };
        let product = Product {
            id: 9,
            name: "Keripik".to_string(),
            product_type: "Chips".to_string(),
            flavor: "Balado".to_string(),
            size: ProductSize::Large,
            price: Money::from_major(10_000),
            quantity: 10,
            manufacturing_date: day(2025, 9, 1),
        };

        let record = NewTransaction::sale(&customer, &product, 2, at(2025, 10, 16, 0)).unwrap();
        assert_eq!(record.total_price, Money::from_major(20_000));
        assert_eq!(record.product_size, ProductSize::Large);
        assert!(record.is_new_customer);

        let id = Uuid::new_v4();
        let tx = record.with_id(id);
        assert_eq!(tx.id, id);
        assert_eq!(tx.product_label(), "Keripik - Balado");
    }

    #[test]
    fn test_sale_total_overflow_is_rejected() {
        let customer = Customer {
            id: 4,
            name: "Budi".to_string(),
            points: 0,
            created_at: at(2025, 10, 1, 8),
            updated_at: at(2025, 10, 1, 8),
        };
        let product = Product {
            id: 9,
            name: "Keripik".to_string(),
            product_type: "Chips".to_string(),
            flavor: "Balado".to_string(),
            size: ProductSize::Large,
            price: Money::from_cents(5_000_000_000_000_000_000),
            quantity: 10,
            manufacturing_date: day(2025, 9, 1),
        };

        assert_eq!(product.total_for(1).unwrap(), product.price);
        let err = NewTransaction::sale(&customer, &product, 2, at(2025, 10, 16, 0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLarge {
                field: "total_price".to_string()
            }
        );
    }
}
