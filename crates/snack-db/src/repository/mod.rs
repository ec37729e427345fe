//! # Repository Module
//!
//! PostgreSQL implementations of the snack-workflow store ports.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TransactionWorkflow                                                   │
//! │       │                                                                 │
//! │       │  Arc<dyn CatalogStore>.apply_stock_delta(7, -2)                │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── inherent methods → DbResult<T>  (sqlx errors with context)        │
//! │  └── CatalogStore impl → StoreResult<T>  (classified for workflow)     │
//! │       │                                                                 │
//! │       │  UPDATE products SET quantity = quantity + $1                   │
//! │       │  WHERE id = $2 AND quantity + $1 >= 0                           │
//! │       ▼                                                                 │
//! │  PostgreSQL                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog store
//! - [`customer::CustomerRepository`] - Customer store
//! - [`transaction::TransactionRepository`] - Ledger store and report query

pub mod customer;
pub mod product;
pub mod transaction;
