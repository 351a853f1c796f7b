//! Balance conservation invariant checker.
//!
//! Money is never created or destroyed by splitting or settling:
//! ```text
//! Σ balances == Σ (split.amount - Σ split shares)
//! ```
//!
//! The right-hand side is the rounding remainder splits left unallocated;
//! it is exactly zero when every split sums to its amount. Aggregation
//! credits payers with the *expense* amount, so an expense whose split was
//! computed over a different amount breaks the equality. Recorded
//! settlements move money between two members and never change the total.
//! The check is exact, not tolerance-based.
//!
//! The remainder itself must come from rounding: each split may leave at
//! most [`SplitResult::rounding_bound`](splitledger_types::SplitResult::rounding_bound)
//! unallocated. Incomplete percentages or non-positive share totals leave
//! far more, and [`BalanceConservation::check_remainder`] rejects them.

use rust_decimal::Decimal;
use splitledger_types::{Balances, Result, SplitExpense, SplitledgerError};

/// Tracks the expected balance total and validates it against computed
/// balances.
#[derive(Debug, Clone, Default)]
pub struct BalanceConservation {
    /// Σ split amounts over recorded expenses.
    spent: Decimal,
    /// Σ allocated shares over recorded expenses.
    allocated: Decimal,
    /// Σ per-split rounding bounds.
    rounding_bound: Decimal,
    expenses: usize,
}

impl BalanceConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker pre-loaded with `expenses`.
    #[must_use]
    pub fn from_expenses(expenses: &[SplitExpense]) -> Self {
        let mut tracker = Self::new();
        for expense in expenses {
            tracker.record_expense(expense);
        }
        tracker
    }

    pub fn record_expense(&mut self, expense: &SplitExpense) {
        self.spent += expense.split.amount;
        self.allocated += expense.split.total();
        self.rounding_bound += expense.split.rounding_bound();
        self.expenses += 1;
    }

    /// Reject a split whose unallocated remainder exceeds what rounding can
    /// leave behind.
    ///
    /// # Errors
    /// Returns [`SplitledgerError::InvalidBalance`] naming the expense.
    pub fn check_remainder(expense: &SplitExpense) -> Result<()> {
        if expense.split.is_fully_allocated() {
            return Ok(());
        }
        Err(SplitledgerError::InvalidBalance {
            reason: format!(
                "{} ({}) leaves {} unallocated, rounding accounts for at most {}",
                expense.expense.id,
                expense.expense.policy,
                expense.split.unallocated(),
                expense.split.rounding_bound()
            ),
        })
    }

    /// Largest total remainder rounding can explain across recorded expenses.
    #[must_use]
    pub fn rounding_bound(&self) -> Decimal {
        self.rounding_bound
    }

    /// What Σ balances must equal: the unallocated rounding remainder.
    #[must_use]
    pub fn expected_total(&self) -> Decimal {
        self.spent - self.allocated
    }

    /// Total amount split across recorded expenses.
    #[must_use]
    pub fn total_spent(&self) -> Decimal {
        self.spent
    }

    #[must_use]
    pub fn expense_count(&self) -> usize {
        self.expenses
    }

    /// Verify that `balances` sum to the expected total.
    ///
    /// # Errors
    /// Returns [`SplitledgerError::ConservationViolation`] if they don't.
    pub fn verify(&self, balances: &Balances) -> Result<()> {
        let actual = balances.total();
        let expected = self.expected_total();
        if actual != expected {
            return Err(SplitledgerError::ConservationViolation { actual, expected });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use splitledger_split::split_expense;
    use splitledger_types::{Expense, MemberId, Settlement};

    use super::*;
    use crate::{aggregate_balances, net_settlements};

    fn split(expense: &Expense) -> SplitExpense {
        split_expense(expense).unwrap()
    }

    #[test]
    fn empty_tracker_expects_zero() {
        let tracker = BalanceConservation::new();
        assert_eq!(tracker.expected_total(), Decimal::ZERO);
        assert!(tracker.verify(&Balances::new()).is_ok());
    }

    #[test]
    fn exact_splits_conserve_to_zero() {
        let expenses = vec![
            split(&Expense::dummy_equal("A", 9000, &["A", "B", "C"])),
            split(&Expense::dummy_equal("B", 5000, &["A", "B"])),
        ];
        let tracker = BalanceConservation::from_expenses(&expenses);
        assert_eq!(tracker.expected_total(), Decimal::ZERO);
        assert_eq!(tracker.total_spent(), Decimal::new(14000, 2));
        assert_eq!(tracker.expense_count(), 2);
        assert!(tracker.verify(&aggregate_balances(&expenses)).is_ok());
    }

    #[test]
    fn unallocated_cent_is_expected() {
        let expenses = vec![split(&Expense::dummy_equal("A", 10000, &["A", "B", "C"]))];
        let tracker = BalanceConservation::from_expenses(&expenses);
        assert_eq!(tracker.expected_total(), Decimal::new(1, 2));
        assert!(tracker.verify(&aggregate_balances(&expenses)).is_ok());
    }

    #[test]
    fn settlements_do_not_change_total() {
        let expenses = vec![split(&Expense::dummy_equal("A", 10000, &["A", "B", "C"]))];
        let tracker = BalanceConservation::from_expenses(&expenses);
        let paid = Settlement::new(MemberId::from("B"), MemberId::from("A"), Decimal::new(3333, 2))
            .unwrap();
        let netted = net_settlements(aggregate_balances(&expenses), &[paid]);
        assert!(tracker.verify(&netted).is_ok());
    }

    #[test]
    fn split_over_wrong_amount_is_caught() {
        let mut bad = split(&Expense::dummy_equal("A", 9000, &["A", "B", "C"]));
        bad.expense.amount = Decimal::new(90000, 2);
        let tracker = BalanceConservation::from_expenses(std::slice::from_ref(&bad));
        assert!(tracker.verify(&aggregate_balances(&[bad])).is_err());
    }

    #[test]
    fn rounding_remainder_passes_remainder_check() {
        let expense = split(&Expense::dummy_equal("A", 10000, &["A", "B", "C"]));
        assert!(BalanceConservation::check_remainder(&expense).is_ok());
        let tracker = BalanceConservation::from_expenses(&[expense]);
        assert_eq!(tracker.rounding_bound(), Decimal::new(3, 2));
    }

    #[test]
    fn incomplete_percentages_fail_remainder_check() {
        let expense = split(&Expense::by_percentage(
            "Taxi",
            Decimal::new(10000, 2),
            MemberId::from("A"),
            vec![
                (MemberId::from("A"), Decimal::from(25)),
                (MemberId::from("B"), Decimal::from(25)),
            ],
        ));
        let err = BalanceConservation::check_remainder(&expense).unwrap_err();
        assert!(
            matches!(&err, SplitledgerError::InvalidBalance { reason }
                if reason.contains("50.00 unallocated") && reason.contains("PERCENTAGE")),
            "Expected InvalidBalance, got: {err:?}"
        );
    }

    #[test]
    fn tampered_balances_are_caught() {
        let expenses = vec![split(&Expense::dummy_equal("A", 9000, &["A", "B", "C"]))];
        let tracker = BalanceConservation::from_expenses(&expenses);
        let mut balances = aggregate_balances(&expenses);
        balances.credit(&MemberId::from("B"), Decimal::new(5, 2));
        let err = tracker.verify(&balances).unwrap_err();
        assert!(
            matches!(err, SplitledgerError::ConservationViolation { actual, expected }
                if actual == Decimal::new(5, 2) && expected.is_zero()),
            "Expected ConservationViolation, got: {err:?}"
        );
    }
}
