//! # Validation Module
//!
//! Input validation utilities for Snack POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP adapter (axum)                                          │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── Required query parameters                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Workflow (Rust)                                              │
//! │  └── THIS MODULE: Business rule validation, before any store call      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (PostgreSQL)                                        │
//! │  ├── CHECK (quantity >= 0)                                             │
//! │  ├── UNIQUE (customers.name)                                           │
//! │  └── Guarded delta updates                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{NewProduct, ProductSize};
use crate::{DATE_FORMAT, MAX_CUSTOMER_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of product text fields.
const MAX_PRODUCT_TEXT_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 100 characters
///
/// Names are matched case-sensitively and are not normalized.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    required_text("customer_name", name, MAX_CUSTOMER_NAME_LEN)
}

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a purchase quantity.
///
/// ## User Workflow
/// ```text
/// POST /transactions { quantity: 0 }
///       │
///       ▼
/// validate_quantity(0) ← THIS FUNCTION
///       │
///       └── qty <= 0? → 400 "quantity must be greater than 0"
///                       (no store has been touched)
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a product before insertion.
///
/// ## Rules
/// - name, type and flavor present
/// - size is Small, Medium or Large
/// - price and initial stock are not negative
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    required_text("name", &product.name, MAX_PRODUCT_TEXT_LEN)?;
    required_text("type", &product.product_type, MAX_PRODUCT_TEXT_LEN)?;
    required_text("flavor", &product.flavor, MAX_PRODUCT_TEXT_LEN)?;

    if !product.size.is_known() {
        return Err(ValidationError::NotAllowed {
            field: "size".to_string(),
            allowed: ProductSize::KNOWN.iter().map(|s| s.to_string()).collect(),
        });
    }

    if product.price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if product.quantity < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` calendar date.
///
/// ## Example
/// ```rust
/// use snack_core::validation::parse_date;
///
/// assert!(parse_date("start", "2025-10-22").is_ok());
/// assert!(parse_date("start", "22/10/2025").is_err());
/// ```
pub fn parse_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();
    // chrono accepts unpadded fields; the wire format is strictly 10 chars
    if raw.len() != 10 {
        return Err(date_format_error(field));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| date_format_error(field))
}

/// Parses an optional date, treating `None` and blank strings as absent.
pub fn parse_optional_date(field: &str, raw: Option<&str>) -> ValidationResult<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(field, value).map(Some),
    }
}

fn date_format_error(field: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "use YYYY-MM-DD".to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;


    fn snack() -> NewProduct {
        NewProduct {
            name: "Keripik".to_string(),
            product_type: "Chips".to_string(),
            flavor: "Balado".to_string(),
            size: ProductSize::Small,
            price: Money::from_major(10_000),
            quantity: 10,
            manufacturing_date: NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(),
        }
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Budi").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        assert!(validate_new_product(&snack()).is_ok());

        let mut free = snack();
        free.price = Money::zero();
        assert!(validate_new_product(&free).is_ok());

        let mut bad_size = snack();
        bad_size.size = ProductSize::from("Jumbo");
        assert!(matches!(
            validate_new_product(&bad_size),
            Err(ValidationError::NotAllowed { .. })
        ));

        let mut negative = snack();
        negative.quantity = -1;
        assert!(validate_new_product(&negative).is_err());

        let mut unnamed = snack();
        unnamed.name = String::new();
        assert!(validate_new_product(&unnamed).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("transaction_date", "2025-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
        assert!(parse_date("transaction_date", "2025-02-30").is_err());
        assert!(parse_date("transaction_date", "2025-1-5").is_err());
        assert!(parse_date("transaction_date", "2025-01-31T00:00:00Z").is_err());
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date("end", None).unwrap(), None);
        assert_eq!(parse_optional_date("end", Some("  ")).unwrap(), None);
        assert!(parse_optional_date("end", Some("2025-10-01")).unwrap().is_some());
        assert!(parse_optional_date("end", Some("tomorrow")).is_err());
    }
}
