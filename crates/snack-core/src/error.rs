//! # Error Types
//!
//! Domain-specific error types for snack-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  snack-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  snack-workflow errors                                                 │
//! │  ├── StoreError       - What a store reports across the trait boundary │
//! │  └── WorkflowError    - CoreError | StoreError, classified by kind     │
//! │                                                                         │
//! │  apps/api errors                                                        │
//! │  └── ApiError         - What the HTTP client sees                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → WorkflowError → ApiError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the purchase and redemption workflows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No product with this identifier exists.
    #[error("product not found: {0}")]
    ProductNotFound(i64),

    /// No customer with this name exists (redemption never creates customers).
    #[error("customer not found: {0}")]
    CustomerNotFound(String),

    /// Requested quantity exceeds the stock snapshot.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /transactions (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// 409 Conflict "insufficient stock"
    /// ```
    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Customer balance is below the redemption cost.
    #[error("insufficient points for {customer}: available {available}, required {required}")]
    InsufficientPoints {
        customer: String,
        available: i64,
        required: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Short, stable reason used in API responses.
    ///
    /// ```rust
    /// use snack_core::CoreError;
    ///
    /// let err = CoreError::InsufficientStock { product_id: 1, available: 1, requested: 2 };
    /// assert_eq!(err.reason(), "insufficient stock");
    /// ```
    pub fn reason(&self) -> String {
        match self {
            CoreError::ProductNotFound(_) => "product not found".to_string(),
            CoreError::CustomerNotFound(_) => "customer not found".to_string(),
            CoreError::InsufficientStock { .. } => "insufficient stock".to_string(),
            CoreError::InsufficientPoints { .. } => "insufficient points".to_string(),
            CoreError::Validation(e) => e.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements and are raised
/// before any store is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value exceeds the representable range.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Invalid format (e.g., a date that isn't YYYY-MM-DD).
    #[error("invalid {field} format ({reason})")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for product 7: available 3, requested 5"
        );
        assert_eq!(err.reason(), "insufficient stock");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be greater than 0");

        let err = ValidationError::InvalidFormat {
            field: "transaction_date".to_string(),
            reason: "use YYYY-MM-DD".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid transaction_date format (use YYYY-MM-DD)"
        );

        let err = ValidationError::TooLarge {
            field: "total_price".to_string(),
        };
        assert_eq!(err.to_string(), "total_price is too large");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "customer_name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.reason(), "customer_name is required");
    }
}
