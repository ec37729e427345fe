//! # snack-workflow: Transaction Workflow for Snack POS
//!
//! Moves product stock, customer points, the transaction ledger and the
//! report cache together, under the rule that no single transaction spans
//! them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Snack POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ decoded requests                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ snack-workflow (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   TransactionWorkflow   CatalogService   CustomerService        │   │
//! │  │   saga (stages, undo)   ports (traits)   memory (test stores)   │   │
//! │  └──────────┬──────────────────────────────────────┬───────────────┘   │
//! │             │ pure rules                            │ port traits       │
//! │  ┌──────────▼──────────┐              ┌─────────────▼───────────────┐  │
//! │  │     snack-core      │              │  snack-db (Postgres, Redis) │  │
//! │  └─────────────────────┘              └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`workflow`] - Purchase, Redeem, GetReport, cache eviction
//! - [`catalog`] - Product and customer services
//! - [`ports`] - Store traits and `StoreError`
//! - [`saga`] - Saga stages and compensation stack
//! - [`memory`] - In-memory store implementations
//! - [`error`] - `WorkflowError` and its classification

use std::time::Duration;

pub mod catalog;
pub mod error;
pub mod memory;
pub mod ports;
pub mod saga;
pub mod workflow;

pub use catalog::{CatalogService, CustomerService};
pub use error::{ErrorKind, WorkflowError, WorkflowResult};
pub use ports::{
    CacheScope, CatalogStore, CustomerStore, LedgerStore, ReportCache, StoreError, StoreResult,
};
pub use workflow::{PurchaseRequest, RedeemRequest, Redemption, TransactionWorkflow};

/// Expiry of cached sales reports unless configured otherwise.
pub const DEFAULT_REPORT_TTL: Duration = Duration::from_secs(5 * 60);
