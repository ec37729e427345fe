//! # Snack API
//!
//! HTTP front end of the Snack POS loyalty workflow.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Snack API Routes                              │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  Catalog       │  │  Loyalty       │  │  Reports                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • POST products│  │ • POST trans-  │  │ • GET transactions         ││
//! │  │ • GET products │  │   actions      │  │   (cache-aside)            ││
//! │  │ • GET customers│  │ • POST redemp- │  │ • DELETE reports/cache     ││
//! │  │                │  │   tions        │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  request_logger middleware wraps every route                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`] for the environment variables.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::routing::{delete, get, post};
use axum::Router;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, StartupError};
pub use state::AppState;

/// Builds the router with every route and the request logger.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::check))
        .route("/customers", get(routes::customers::list))
        .route(
            "/products",
            post(routes::products::create).get(routes::products::by_date),
        )
        .route(
            "/transactions",
            post(routes::transactions::purchase).get(routes::transactions::report),
        )
        .route("/redemptions", post(routes::redemptions::redeem))
        .route("/reports/cache", delete(routes::reports::evict))
        .layer(axum::middleware::from_fn(middleware::request_logger))
        .with_state(state)
}
