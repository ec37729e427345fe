//! # snack-db: Storage Adapters for Snack POS
//!
//! PostgreSQL implementations of the catalog, customer and ledger stores,
//! and a Redis implementation of the report cache.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Snack POS Data Flow                              │
//! │                                                                         │
//! │  TransactionWorkflow (snack-workflow)                                  │
//! │       │  Arc<dyn CatalogStore> / CustomerStore / LedgerStore / Cache   │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     snack-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │ RedisReport  │  │   │
//! │  │   │   (pool.rs)   │    │ ProductRepo   │    │    Cache     │  │   │
//! │  │   │    PgPool     │◄───│ CustomerRepo  │    │  (cache.rs)  │  │   │
//! │  │   │  migrations   │    │ TransactionRepo│   │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────┬───────┘  │   │
//! │  └──────────┬────────────────────────────────────────┼──────────┘   │
//! │             ▼                                          ▼              │
//! │        PostgreSQL                                    Redis            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and cache error types
//! - [`repository`] - Store implementations (product, customer, transaction)
//! - [`cache`] - Redis report cache
//!
//! ## Usage
//!
//! ```rust,ignore
//! use snack_db::{Database, DbConfig, RedisReportCache};
//!
//! let db = Database::new(DbConfig::new(database_url)).await?;
//! let cache = RedisReportCache::new(&redis_url).await?;
//!
//! let workflow = TransactionWorkflow::new(
//!     Arc::new(db.products()),
//!     Arc::new(db.customers()),
//!     Arc::new(db.transactions()),
//!     Arc::new(cache),
//!     tracing::Span::current(),
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::RedisReportCache;
pub use error::{CacheError, DbError};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::transaction::TransactionRepository;
