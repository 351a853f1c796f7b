//! Per-member split computation.
//!
//! ```text
//! compute_split(amount, policy, members, raw_inputs) -> SplitResult
//! ```
//!
//! ## Rounding remainder
//!
//! With the default [`RemainderPolicy::Unallocated`] every share is rounded
//! on its own and nothing is redistributed, so `100.00 / 3` yields three
//! shares of `33.33` and one unallocated cent. With
//! [`RemainderPolicy::AssignToFirst`] the first member absorbs the
//! remainder whenever the policy's inputs cover the whole amount.
//!
//! ## Missing raw inputs
//!
//! A member with no raw input under `Shares` or `Percentage` counts as
//! zero instead of failing the split. Raw inputs for ids outside `members`
//! are ignored, so the `Shares` denominator is the sum over `members`
//! only, not over every raw input supplied. A non-positive total gives
//! every member a zero share.
//!
//! ## Overflow
//!
//! All share arithmetic is checked. Inputs whose products or sums do not
//! fit in a `Decimal` fail with `InvalidSplit` instead of panicking.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use splitledger_types::{
    Expense, MemberId, MemberShare, RemainderPolicy, Result, SplitConfig, SplitExpense,
    SplitPolicy, SplitResult, SplitledgerError, constants, money,
};

/// Split calculator with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct SplitCalculator {
    config: SplitConfig,
}

impl SplitCalculator {
    #[must_use]
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Divide `amount` between `members` according to `policy`.
    ///
    /// # Errors
    /// Returns [`SplitledgerError::InvalidSplit`] if `members` is empty,
    /// lists the same member twice, or `amount` is negative.
    pub fn compute(
        &self,
        amount: Decimal,
        policy: SplitPolicy,
        members: &[MemberId],
        raw_inputs: &HashMap<MemberId, Decimal>,
    ) -> Result<SplitResult> {
        validate(amount, members)?;

        let (mut shares, covers_amount) = match policy {
            SplitPolicy::Equal => (self.equal(amount, members), true),
            SplitPolicy::Shares => self.by_shares(amount, members, raw_inputs)?,
            SplitPolicy::Percentage => self.by_percentage(amount, members, raw_inputs)?,
        };

        if self.config.remainder == RemainderPolicy::AssignToFirst && covers_amount {
            let allocated = checked_sum(shares.iter().map(|s| s.amount))?;
            if let Some(first) = shares.first_mut() {
                first.amount += amount - allocated;
            }
        }

        Ok(SplitResult::new(amount, shares).with_scale(self.config.currency_scale))
    }

    /// Split an expense using its own policy, participants and raw inputs.
    pub fn split_expense(&self, expense: &Expense) -> Result<SplitExpense> {
        let split = self.compute(
            expense.amount,
            expense.policy,
            &expense.participants,
            &expense.raw_inputs,
        )?;
        Ok(SplitExpense {
            expense: expense.clone(),
            split,
        })
    }

    fn round(&self, value: Decimal) -> Decimal {
        money::round_half_up(value, self.config.currency_scale)
    }

    fn equal(&self, amount: Decimal, members: &[MemberId]) -> Vec<MemberShare> {
        let each = self.round(amount / Decimal::from(members.len()));
        members
            .iter()
            .map(|member| MemberShare {
                member: member.clone(),
                amount: each,
            })
            .collect()
    }

    fn by_shares(
        &self,
        amount: Decimal,
        members: &[MemberId],
        raw_inputs: &HashMap<MemberId, Decimal>,
    ) -> Result<(Vec<MemberShare>, bool)> {
        let counts: Vec<Decimal> = members
            .iter()
            .map(|m| raw_input(raw_inputs, m, SplitPolicy::Shares))
            .collect();
        let total = checked_sum(counts.iter().copied())?;

        let shares = members
            .iter()
            .zip(counts)
            .map(|(member, count)| -> Result<MemberShare> {
                let fraction = if total > Decimal::ZERO {
                    let exact = count.checked_div(total).ok_or_else(|| overflow(member))?;
                    money::round_half_up(exact, self.config.intermediate_scale)
                } else {
                    Decimal::ZERO
                };
                let owed = fraction.checked_mul(amount).ok_or_else(|| overflow(member))?;
                Ok(MemberShare {
                    member: member.clone(),
                    amount: self.round(owed),
                })
            })
            .collect::<Result<_>>()?;
        Ok((shares, total > Decimal::ZERO))
    }

    fn by_percentage(
        &self,
        amount: Decimal,
        members: &[MemberId],
        raw_inputs: &HashMap<MemberId, Decimal>,
    ) -> Result<(Vec<MemberShare>, bool)> {
        let mut total_percent = Decimal::ZERO;
        let shares = members
            .iter()
            .map(|member| -> Result<MemberShare> {
                let percent = raw_input(raw_inputs, member, SplitPolicy::Percentage);
                total_percent = total_percent
                    .checked_add(percent)
                    .ok_or_else(|| overflow(member))?;
                let owed = (percent / constants::FULL_PERCENTAGE)
                    .checked_mul(amount)
                    .ok_or_else(|| overflow(member))?;
                Ok(MemberShare {
                    member: member.clone(),
                    amount: self.round(owed),
                })
            })
            .collect::<Result<_>>()?;
        Ok((shares, total_percent == constants::FULL_PERCENTAGE))
    }
}

fn overflow(member: &MemberId) -> SplitledgerError {
    SplitledgerError::invalid_split(format!("share of {member} overflows"))
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value)
            .ok_or_else(|| SplitledgerError::invalid_split("split total overflows"))
    })
}

fn validate(amount: Decimal, members: &[MemberId]) -> Result<()> {
    if members.is_empty() {
        return Err(SplitledgerError::invalid_split("member set is empty"));
    }
    if amount < Decimal::ZERO {
        return Err(SplitledgerError::invalid_split(format!(
            "amount must not be negative, got {amount}"
        )));
    }
    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if !seen.insert(member) {
            return Err(SplitledgerError::invalid_split(format!(
                "member {member} listed twice"
            )));
        }
    }
    Ok(())
}

fn raw_input(
    raw_inputs: &HashMap<MemberId, Decimal>,
    member: &MemberId,
    policy: SplitPolicy,
) -> Decimal {
    if let Some(value) = raw_inputs.get(member) {
        *value
    } else {
        tracing::debug!(%member, %policy, "No raw input for member; counting it as zero");
        Decimal::ZERO
    }
}

/// Split with the default configuration.
pub fn compute_split(
    amount: Decimal,
    policy: SplitPolicy,
    members: &[MemberId],
    raw_inputs: &HashMap<MemberId, Decimal>,
) -> Result<SplitResult> {
    SplitCalculator::default().compute(amount, policy, members, raw_inputs)
}

/// Split an expense with the default configuration.
pub fn split_expense(expense: &Expense) -> Result<SplitExpense> {
    SplitCalculator::default().split_expense(expense)
}
