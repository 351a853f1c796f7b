//! Error types for the SplitLedger engine.
//!
//! All errors use the `SL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Split errors
//! - 2xx: Balance errors
//! - 3xx: Settlement errors
//! - 4xx: Ledger / store errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::Scope;

/// Central error enum for all SplitLedger operations.
#[derive(Debug, Error)]
pub enum SplitledgerError {
    // =================================================================
    // Split Errors (1xx)
    // =================================================================
    /// The split inputs are malformed (no members, negative amount, ...).
    #[error("SL_ERR_100: Invalid split: {reason}")]
    InvalidSplit { reason: String },

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Balances left over after simplification exceed the allowed residual.
    /// Signals corrupted upstream data.
    #[error("SL_ERR_200: Invalid balance: {reason}")]
    InvalidBalance { reason: String },

    /// Aggregated balances do not sum to the expected rounding residual.
    #[error("SL_ERR_201: Balance conservation violated: actual {actual}, expected {expected}")]
    ConservationViolation { actual: Decimal, expected: Decimal },

    // =================================================================
    // Settlement Errors (3xx)
    // =================================================================
    /// The settlement is structurally invalid.
    #[error("SL_ERR_300: Invalid settlement: {reason}")]
    InvalidSettlement { reason: String },

    /// A proposed transfer index is out of range for the plan.
    #[error("SL_ERR_301: No proposed transfer at index {index} (plan has {len})")]
    TransferNotInPlan { index: usize, len: usize },

    // =================================================================
    // Ledger Errors (4xx)
    // =================================================================
    /// The store has no ledger for this scope.
    #[error("SL_ERR_400: Scope not found: {0}")]
    ScopeNotFound(Scope),

    /// The backing store failed.
    #[error("SL_ERR_401: Storage error: {0}")]
    Storage(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SL_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config document, out-of-range values).
    #[error("SL_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl SplitledgerError {
    pub fn invalid_split(reason: impl Into<String>) -> Self {
        Self::InvalidSplit {
            reason: reason.into(),
        }
    }

    pub fn invalid_settlement(reason: impl Into<String>) -> Self {
        Self::InvalidSettlement {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SplitledgerError>;

impl From<serde_json::Error> for SplitledgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
