//! Configuration types for the split calculator and debt simplifier.
//!
//! By default rounding remainders stay unallocated and creditor/debtor
//! pairs are matched in first-seen order. The alternatives are opt-in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, SplitledgerError, constants};

/// What happens to the cents lost when rounding per-member shares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemainderPolicy {
    /// Shares may sum to less (or more) than the amount by up to
    /// `(members - 1) × 0.01`.
    #[default]
    Unallocated,
    /// The first member absorbs the remainder so shares sum exactly to the
    /// amount.
    AssignToFirst,
}

/// Order in which the simplifier picks creditor/debtor pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchingOrder {
    /// Front of each queue, queues in first-seen order. Valid but not
    /// necessarily minimal.
    #[default]
    InsertionOrder,
    /// Always the largest remaining creditor against the largest remaining
    /// debtor (ties broken by first-seen order).
    LargestFirst,
}

/// Split calculator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Decimal places of every member share.
    pub currency_scale: u32,
    /// Decimal places of share fractions before the final rounding.
    pub intermediate_scale: u32,
    pub remainder: RemainderPolicy,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            currency_scale: constants::CURRENCY_SCALE,
            intermediate_scale: constants::INTERMEDIATE_SCALE,
            remainder: RemainderPolicy::default(),
        }
    }
}

/// Debt simplifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    /// Balances with `|balance| <= tolerance` count as settled.
    pub tolerance: Decimal,
    pub order: MatchingOrder,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            tolerance: constants::SETTLE_TOLERANCE,
            order: MatchingOrder::default(),
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub split: SplitConfig,
    pub simplify: SimplifyConfig,
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document. Missing fields
    /// take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SplitledgerError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot honor.
    ///
    /// # Errors
    /// Returns [`SplitledgerError::Configuration`] for a negative tolerance,
    /// an intermediate scale below the currency scale, or a scale beyond
    /// what `Decimal` can represent.
    pub fn validate(&self) -> Result<()> {
        if self.simplify.tolerance.is_sign_negative() {
            return Err(SplitledgerError::Configuration(format!(
                "tolerance must not be negative, got {}",
                self.simplify.tolerance
            )));
        }
        if self.split.intermediate_scale < self.split.currency_scale {
            return Err(SplitledgerError::Configuration(format!(
                "intermediate_scale {} is below currency_scale {}",
                self.split.intermediate_scale, self.split.currency_scale
            )));
        }
        if self.split.intermediate_scale > constants::MAX_SCALE {
            return Err(SplitledgerError::Configuration(format!(
                "intermediate_scale {} exceeds {}",
                self.split.intermediate_scale,
                constants::MAX_SCALE
            )));
        }
        Ok(())
    }
}
