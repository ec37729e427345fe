//! # Loyalty Rules
//!
//! Earning and spending points.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EARN                                   SPEND (one unit per redemption) │
//! │  ────                                   ─────                           │
//! │  1 point per 1000 currency units        Small  → 200 points             │
//! │  of the purchase total, truncated       Medium → 300 points             │
//! │                                         Large  → 500 points             │
//! │  10000 × 2 = 20000 → 20 points          anything else → rejected        │
//! │    999 × 1 =   999 →  0 points                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductSize;

/// Currency units that earn one point.
pub const UNITS_PER_POINT: i64 = 1000;

/// Points earned for a purchase total, floored.
///
/// ```rust
/// use snack_core::loyalty::points_earned;
/// use snack_core::Money;
///
/// assert_eq!(points_earned(Money::from_major(20_000)), 20);
/// assert_eq!(points_earned(Money::from_major(999)), 0);
/// ```
pub fn points_earned(total: Money) -> i64 {
    total
        .cents()
        .div_euclid(Money::from_major(UNITS_PER_POINT).cents())
}

/// Point cost of redeeming one unit of a product of this size.
///
/// ## Errors
/// `ValidationError::NotAllowed` for sizes outside the exchange table.
pub fn redemption_cost(size: &ProductSize) -> Result<i64, ValidationError> {
    match size {
        ProductSize::Small => Ok(200),
        ProductSize::Medium => Ok(300),
        ProductSize::Large => Ok(500),
        ProductSize::Unknown(_) => Err(ValidationError::NotAllowed {
            field: "product size".to_string(),
            allowed: ProductSize::KNOWN.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_earned_truncates() {
        assert_eq!(points_earned(Money::from_major(10_000) * 2), 20);
        assert_eq!(points_earned(Money::from_major(999)), 0);
        assert_eq!(points_earned(Money::from_major(1000)), 1);
        assert_eq!(points_earned(Money::from_cents(199_999)), 1);
        assert_eq!(points_earned(Money::zero()), 0);
    }

    #[test]
    fn test_redemption_cost_table() {
        assert_eq!(redemption_cost(&ProductSize::Small), Ok(200));
        assert_eq!(redemption_cost(&ProductSize::Medium), Ok(300));
        assert_eq!(redemption_cost(&ProductSize::Large), Ok(500));
    }

    #[test]
    fn test_redemption_cost_rejects_unknown_size() {
        let err = redemption_cost(&ProductSize::from("Jumbo")).unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
        assert_eq!(
            err.to_string(),
            r#"product size must be one of: ["Small", "Medium", "Large"]"#
        );
    }
}
