//! Split results produced by the split calculator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Expense, MemberId, constants};

/// One member's owed portion of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberShare {
    pub member: MemberId,
    pub amount: Decimal,
}

/// The per-member owed amounts for one expense, in participant order.
///
/// The shares sum to the expense amount up to the rounding remainder
/// reported by [`SplitResult::unallocated`]. When the policy inputs cover
/// the whole amount, that remainder never exceeds
/// [`SplitResult::rounding_bound`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    /// The amount that was split.
    pub amount: Decimal,
    pub shares: Vec<MemberShare>,
    /// Decimal places every share was rounded to.
    #[serde(default = "default_scale")]
    pub scale: u32,
}

fn default_scale() -> u32 {
    constants::CURRENCY_SCALE
}

impl SplitResult {
    /// Shares rounded to [`constants::CURRENCY_SCALE`].
    #[must_use]
    pub fn new(amount: Decimal, shares: Vec<MemberShare>) -> Self {
        Self {
            amount,
            shares,
            scale: default_scale(),
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// The owed amount for `member`, if they take part in the split.
    #[must_use]
    pub fn get(&self, member: &MemberId) -> Option<Decimal> {
        self.shares
            .iter()
            .find(|s| &s.member == member)
            .map(|s| s.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, Decimal)> {
        self.shares.iter().map(|s| (&s.member, s.amount))
    }

    /// Sum of all member shares.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.shares.iter().map(|s| s.amount).sum()
    }

    /// Rounding remainder left unassigned: `amount - total()`.
    #[must_use]
    pub fn unallocated(&self) -> Decimal {
        self.amount - self.total()
    }

    /// Largest remainder rounding alone can leave: one unit at `scale` per
    /// share. Anything beyond it was never allocated by the policy inputs.
    #[must_use]
    pub fn rounding_bound(&self) -> Decimal {
        Decimal::from(self.shares.len()) * Decimal::new(1, self.scale.min(constants::MAX_SCALE))
    }

    /// Whether the unallocated remainder is explained by rounding.
    #[must_use]
    pub fn is_fully_allocated(&self) -> bool {
        self.unallocated().abs() <= self.rounding_bound()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// An expense together with its computed split, ready for aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitExpense {
    pub expense: Expense,
    pub split: SplitResult,
}

impl SplitExpense {
    #[must_use]
    pub fn payer(&self) -> &MemberId {
        &self.expense.payer
    }

    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.expense.amount
    }
}
