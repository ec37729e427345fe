//! # Workflow Errors
//!
//! Every failure a workflow operation can return, classified into one of
//! four kinds so the adapter layer can pick a status code without
//! inspecting messages.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Source                              Kind         HTTP              │
//! │  ──────                              ────         ────              │
//! │  CoreError::Validation               Validation   400               │
//! │  CoreError::*NotFound                NotFound     404               │
//! │  StoreError::NotFound                NotFound     404               │
//! │  CoreError::Insufficient*            Conflict     409               │
//! │  StoreError::Constraint              Conflict     409               │
//! │  StoreError::Backend                 Store        500               │
//! │  StoreError::Unavailable             Store        503               │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use snack_core::{CoreError, ValidationError};

use crate::ports::StoreError;

/// Error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Store,
}

/// Failure of a workflow operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// A business rule refused the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store failed; passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Core(CoreError::Validation(_)) => ErrorKind::Validation,
            WorkflowError::Core(CoreError::ProductNotFound(_))
            | WorkflowError::Core(CoreError::CustomerNotFound(_)) => ErrorKind::NotFound,
            WorkflowError::Core(CoreError::InsufficientStock { .. })
            | WorkflowError::Core(CoreError::InsufficientPoints { .. }) => ErrorKind::Conflict,
            WorkflowError::Store(StoreError::NotFound { .. }) => ErrorKind::NotFound,
            WorkflowError::Store(StoreError::Constraint(_)) => ErrorKind::Conflict,
            WorkflowError::Store(StoreError::Unavailable(_))
            | WorkflowError::Store(StoreError::Backend(_)) => ErrorKind::Store,
        }
    }

    /// Client-facing message.
    ///
    /// Business rule failures use their short reason ("insufficient stock");
    /// store failures use the store's own description.
    pub fn message(&self) -> String {
        match self {
            WorkflowError::Core(err) => err.reason(),
            WorkflowError::Store(err) => err.to_string(),
        }
    }

    /// Whether the store could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, WorkflowError::Store(StoreError::Unavailable(_)))
    }
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        WorkflowError::Core(CoreError::Validation(err))
    }
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
