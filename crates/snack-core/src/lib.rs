//! # snack-core: Pure Business Logic for Snack POS
//!
//! This crate holds the domain model and every business rule that can be
//! expressed without touching a store: money math, the loyalty point rules,
//! the redemption cost table and input validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Snack POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │   POST /transactions ── POST /redemptions ── GET /transactions  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               snack-workflow (sagas, cache-aside)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ snack-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  loyalty  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  points   │  │   rules   │  │   │
//! │  │   │ Customer  │  │           │  │  costs    │  │   dates   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Transaction, SalesReport)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`loyalty`] - Points earned per purchase, redemption cost table
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use snack_core::loyalty::points_earned;
//! use snack_core::money::Money;
//!
//! let unit_price = Money::from_major(10_000);
//! let total = unit_price.multiply_quantity(2);
//!
//! // One point per 1000 currency units, truncated
//! assert_eq!(points_earned(total), 20);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod loyalty;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Wire and storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Best-seller label used when a report range contains no sales.
pub const NO_SALES_LABEL: &str = "No sales yet";

/// Maximum length of a customer name.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;
