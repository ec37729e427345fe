//! # Saga State Machines
//!
//! Purchase and Redeem touch several stores with no transaction spanning
//! them. Each step commits locally; when a later step fails, the completed
//! steps are undone in reverse order.
//!
//! ## Purchase
//! ```text
//! Validated ──► StockReserved ──► PointsUpdated ──► Recorded ──► Committed
//!                  │ undo:             │ undo:
//!                  │ stock +qty        │ points -earned
//!                  ▼                   ▼
//!  points step fails:   [stock +qty]
//!  ledger step fails:   [points -earned, stock +qty]
//! ```
//!
//! ## Redeem
//! ```text
//! Validated ──► PointsDebited ──► StockReleased ──► Committed
//!                  │ undo:
//!                  │ points +cost
//!                  ▼
//!  stock step fails:    [points +cost]
//! ```

use std::fmt;

// =============================================================================
// Stages
// =============================================================================

/// A point in a saga's progress.
pub trait SagaStage: Copy + fmt::Debug + fmt::Display + Send + Sync {
    /// Saga name used in log fields.
    const SAGA: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStage {
    Validated,
    StockReserved,
    PointsUpdated,
    Recorded,
    Committed,
}

impl fmt::Display for PurchaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PurchaseStage::Validated => "validated",
            PurchaseStage::StockReserved => "stock_reserved",
            PurchaseStage::PointsUpdated => "points_updated",
            PurchaseStage::Recorded => "recorded",
            PurchaseStage::Committed => "committed",
        };
        f.write_str(name)
    }
}

impl SagaStage for PurchaseStage {
    const SAGA: &'static str = "purchase";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemStage {
    Validated,
    PointsDebited,
    StockReleased,
    Committed,
}

impl fmt::Display for RedeemStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RedeemStage::Validated => "validated",
            RedeemStage::PointsDebited => "points_debited",
            RedeemStage::StockReleased => "stock_released",
            RedeemStage::Committed => "committed",
        };
        f.write_str(name)
    }
}

impl SagaStage for RedeemStage {
    const SAGA: &'static str = "redeem";
}

// =============================================================================
// Compensation
// =============================================================================

/// A delta that reverses a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    Stock { product_id: i64, delta: i64 },
    Points { customer_id: i64, delta: i64 },
}

impl Compensation {
    /// Undo for a stock delta that has been applied.
    pub fn reverse_stock(product_id: i64, applied: i64) -> Self {
        Compensation::Stock {
            product_id,
            delta: -applied,
        }
    }

    /// Undo for a points delta that has been applied.
    pub fn reverse_points(customer_id: i64, applied: i64) -> Self {
        Compensation::Points {
            customer_id,
            delta: -applied,
        }
    }
}

// =============================================================================
// Saga
// =============================================================================

/// Tracks the current stage and the undo stack of one saga run.
#[derive(Debug)]
pub struct Saga<S: SagaStage> {
    stage: S,
    undo: Vec<Compensation>,
}

impl<S: SagaStage> Saga<S> {
    pub fn begin(stage: S) -> Self {
        Saga {
            stage,
            undo: Vec::new(),
        }
    }

    pub fn stage(&self) -> S {
        self.stage
    }

    /// Moves to `stage` after a step committed, remembering how to undo it.
    pub fn advance(&mut self, stage: S, undo: Compensation) {
        self.stage = stage;
        self.undo.push(undo);
    }

    /// Moves to `stage` after a step that needs no undo.
    pub fn reach(&mut self, stage: S) {
        self.stage = stage;
    }

    /// Final transition; nothing is undone after this.
    pub fn commit(&mut self, stage: S) {
        self.stage = stage;
        self.undo.clear();
    }

    /// Takes the pending compensations, most recent first.
    pub fn unwind(&mut self) -> Vec<Compensation> {
        let mut pending = std::mem::take(&mut self.undo);
        pending.reverse();
        pending
    }
}
