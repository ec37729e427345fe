//! Shared application state.
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  STORAGE_BACKEND=postgres                STORAGE_BACKEND=memory        │
//! │  ────────────────────────                ──────────────────────        │
//! │  ProductRepository      ─┐               MemoryCatalog      ─┐         │
//! │  CustomerRepository     ─┤               MemoryCustomers    ─┤         │
//! │  TransactionRepository  ─┤               MemoryLedger       ─┤         │
//! │  RedisReportCache       ─┤               MemoryReportCache  ─┤         │
//! │                          ▼                                    ▼         │
//! │            TransactionWorkflow + CatalogService + CustomerService       │
//! │                       (all share one "snack_workflow" span)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, info_span};

use snack_db::{Database, DbConfig, RedisReportCache};
use snack_workflow::memory::{MemoryCatalog, MemoryCustomers, MemoryLedger, MemoryReportCache};
use snack_workflow::{
    CatalogService, CatalogStore, CustomerService, CustomerStore, LedgerStore, ReportCache,
    TransactionWorkflow,
};

use crate::config::{ApiConfig, StorageBackend};
use crate::error::StartupError;

#[derive(Clone)]
enum Backend {
    Postgres(Database),
    Memory,
}

/// Handles shared by every request handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub workflow: TransactionWorkflow,
    pub catalog: CatalogService,
    pub customers: CustomerService,
    backend: Backend,
}

impl AppState {
    /// Connects the configured backend.
    pub async fn connect(config: &ApiConfig) -> Result<Self, StartupError> {
        match config.storage_backend {
            StorageBackend::Memory => {
                info!("Using in-memory stores");
                Ok(Self::in_memory(config.report_ttl()))
            }
            StorageBackend::Postgres => {
                let db = Database::new(
                    DbConfig::new(&config.database_url)
                        .max_connections(config.database_max_connections),
                )
                .await?;
                info!("Connected to PostgreSQL");

                let cache = RedisReportCache::new(&config.redis_url).await?;
                info!("Connected to Redis");

                Ok(Self::assemble(
                    Arc::new(db.products()),
                    Arc::new(db.customers()),
                    Arc::new(db.transactions()),
                    Arc::new(cache),
                    config.report_ttl(),
                    Backend::Postgres(db),
                ))
            }
        }
    }

    /// Empty in-memory stores.
    pub fn in_memory(report_ttl: Duration) -> Self {
        Self::from_stores(
            Arc::new(MemoryCatalog::new()),
            Arc::new(MemoryCustomers::new()),
            Arc::new(MemoryLedger::new()),
            Arc::new(MemoryReportCache::new()),
            report_ttl,
        )
    }

    /// Wires caller-provided stores (reported as the memory backend).
    pub fn from_stores(
        catalog: Arc<dyn CatalogStore>,
        customers: Arc<dyn CustomerStore>,
        ledger: Arc<dyn LedgerStore>,
        cache: Arc<dyn ReportCache>,
        report_ttl: Duration,
    ) -> Self {
        Self::assemble(catalog, customers, ledger, cache, report_ttl, Backend::Memory)
    }

    fn assemble(
        catalog: Arc<dyn CatalogStore>,
        customers: Arc<dyn CustomerStore>,
        ledger: Arc<dyn LedgerStore>,
        cache: Arc<dyn ReportCache>,
        report_ttl: Duration,
        backend: Backend,
    ) -> Self {
        let span = info_span!("snack_workflow", backend = backend.name());

        AppState {
            workflow: TransactionWorkflow::new(catalog.clone(), customers.clone(), ledger, cache, span.clone())
                .with_report_ttl(report_ttl),
            catalog: CatalogService::new(catalog, span.clone()),
            customers: CustomerService::new(customers, span),
            backend,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Whether the primary store answers queries.
    pub async fn storage_healthy(&self) -> bool {
        match &self.backend {
            Backend::Postgres(db) => db.health_check().await,
            Backend::Memory => true,
        }
    }

    /// Releases pooled connections.
    pub async fn shutdown(&self) {
        if let Backend::Postgres(db) = &self.backend {
            db.close().await;
        }
    }
}

impl Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Postgres(_) => StorageBackend::Postgres.as_str(),
            Backend::Memory => StorageBackend::Memory.as_str(),
        }
    }
}
