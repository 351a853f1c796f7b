//! Full recompute: split expenses + recorded settlements → transfer plan.
//!
//! ```text
//! plan(expenses, prior) = simplify(net(aggregate(expenses), prior))
//! ```
//!
//! Every split must be fully allocated up to its rounding bound. The
//! conservation check then runs after aggregation and again after netting,
//! and the remaining unallocated cents go to the simplifier as rounding
//! slack so they are not mistaken for corruption.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_types::{
    Balances, MemberId, Result, Settlement, SimplifyConfig, SplitExpense, money,
};

use crate::{
    aggregate::aggregate_balances, conservation::BalanceConservation,
    determinism::compute_plan_digest, netting::apply_settlements, simplifier::DebtSimplifier,
};

/// The proposed transfers for one snapshot, plus the balances they settle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Net balances after prior settlements.
    pub balances: Balances,
    /// Proposed transfers in the order the simplifier emitted them.
    pub transfers: Vec<Settlement>,
    /// SHA-256 over `transfers`.
    pub digest: [u8; 32],
    /// Rounding remainder the splits left unallocated.
    pub unallocated: Decimal,
}

impl SettlementPlan {
    /// Whether nothing needs to be paid.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Transfers `member` has to pay.
    pub fn payments_by<'a>(
        &'a self,
        member: &'a MemberId,
    ) -> impl Iterator<Item = &'a Settlement> {
        self.transfers.iter().filter(move |t| &t.from == member)
    }

    /// Transfers `member` will receive.
    pub fn payments_to<'a>(
        &'a self,
        member: &'a MemberId,
    ) -> impl Iterator<Item = &'a Settlement> {
        self.transfers.iter().filter(move |t| &t.to == member)
    }

    /// Sum of all proposed transfers.
    #[must_use]
    pub fn total_transferred(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Runs aggregate → net → simplify over a snapshot.
#[derive(Debug, Clone, Default)]
pub struct SettlementPlanner {
    config: SimplifyConfig,
}

impl SettlementPlanner {
    #[must_use]
    pub fn new(config: SimplifyConfig) -> Self {
        Self { config }
    }

    /// Compute the transfer plan for `expenses` given already-recorded
    /// `prior` settlements.
    ///
    /// # Errors
    /// - `InvalidBalance` if a split leaves more unallocated than rounding
    ///   explains (incomplete percentages, non-positive share totals)
    /// - `ConservationViolation` if balances do not sum to the unallocated
    ///   remainder
    /// - `InvalidBalance` if the simplifier is left with more residual than
    ///   tolerance and rounding slack allow
    pub fn plan(
        &self,
        expenses: &[SplitExpense],
        prior: &[Settlement],
    ) -> Result<SettlementPlan> {
        for expense in expenses {
            BalanceConservation::check_remainder(expense)?;
        }
        let conservation = BalanceConservation::from_expenses(expenses);

        let mut balances = aggregate_balances(expenses);
        conservation.verify(&balances)?;

        apply_settlements(&mut balances, prior);
        conservation.verify(&balances)?;

        let unallocated = conservation.expected_total();
        let transfers = DebtSimplifier::new(self.config.clone())
            .with_rounding_slack(unallocated)
            .simplify(&balances)?;

        Ok(SettlementPlan {
            digest: compute_plan_digest(&transfers),
            balances,
            transfers,
            unallocated,
        })
    }

    /// Whether `member`'s balance in `plan` is within tolerance of zero.
    #[must_use]
    pub fn is_member_settled(&self, plan: &SettlementPlan, member: &MemberId) -> bool {
        money::is_negligible(plan.balances.get(member), self.config.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use splitledger_split::split_expense;
    use splitledger_types::{Expense, SplitledgerError};

    use super::*;

    fn split(expense: &Expense) -> SplitExpense {
        split_expense(expense).unwrap()
    }

    fn stl(from: &str, to: &str, cents: i64) -> Settlement {
        Settlement::new(MemberId::from(from), MemberId::from(to), Decimal::new(cents, 2)).unwrap()
    }

    #[test]
    fn empty_snapshot_is_settled() {
        let plan = SettlementPlanner::default().plan(&[], &[]).unwrap();
        assert!(plan.is_settled());
        assert!(plan.balances.is_empty());
        assert_eq!(plan.unallocated, Decimal::ZERO);
    }

    #[test]
    fn plan_nets_prior_settlements() {
        let expenses = vec![split(&Expense::dummy_equal("A", 9000, &["A", "B", "C"]))];
        let plan = SettlementPlanner::default()
            .plan(&expenses, &[stl("B", "A", 3000)])
            .unwrap();
        assert_eq!(plan.transfers, vec![stl("C", "A", 3000)]);
        assert_eq!(plan.total_transferred(), Decimal::new(3000, 2));
        assert!(SettlementPlanner::default().is_member_settled(&plan, &MemberId::from("B")));
        assert_eq!(plan.payments_by(&MemberId::from("C")).count(), 1);
        assert_eq!(plan.payments_to(&MemberId::from("A")).count(), 1);
        assert_eq!(plan.digest_hex().len(), 64);
    }

    #[test]
    fn accumulated_remainders_are_not_corruption() {
        // Thirty 100.00/3 expenses leave 0.30 unallocated with A as payer,
        // more than tolerance × participants alone would allow.
        let expenses: Vec<SplitExpense> = (0..30)
            .map(|_| split(&Expense::dummy_equal("A", 10000, &["A", "B", "C"])))
            .collect();
        let plan = SettlementPlanner::default().plan(&expenses, &[]).unwrap();
        assert_eq!(plan.unallocated, Decimal::new(30, 2));
        assert_eq!(
            plan.transfers,
            vec![stl("B", "A", 99990), stl("C", "A", 99990)]
        );
    }

    #[test]
    fn incomplete_percentages_are_reported() {
        // Only 50 of 100 percent assigned: A would keep an unmatched 50.00.
        let expense = Expense::by_percentage(
            "Taxi",
            Decimal::new(10000, 2),
            MemberId::from("A"),
            vec![
                (MemberId::from("A"), Decimal::from(25)),
                (MemberId::from("B"), Decimal::from(25)),
            ],
        );
        let err = SettlementPlanner::default()
            .plan(&[split(&expense)], &[])
            .unwrap_err();
        assert!(
            matches!(&err, SplitledgerError::InvalidBalance { reason } if reason.contains("50.00")),
            "Expected InvalidBalance, got: {err:?}"
        );
    }

    #[test]
    fn non_positive_share_total_is_reported() {
        let expense = Expense::by_shares(
            "Gift",
            Decimal::new(9000, 2),
            MemberId::from("A"),
            vec![
                (MemberId::from("A"), Decimal::ONE),
                (MemberId::from("B"), Decimal::from(-3)),
            ],
        );
        let err = SettlementPlanner::default()
            .plan(&[split(&expense)], &[])
            .unwrap_err();
        assert!(matches!(err, SplitledgerError::InvalidBalance { .. }));
    }

    #[test]
    fn plan_serializes() {
        let expenses = vec![split(&Expense::dummy_equal("A", 9000, &["A", "B", "C"]))];
        let plan = SettlementPlanner::default().plan(&expenses, &[]).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        let back: SettlementPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back.transfers, plan.transfers);
        assert_eq!(back.digest, plan.digest);
        assert_eq!(back.balances, plan.balances);
    }

    #[test]
    fn corrupted_split_is_rejected() {
        let mut bad = split(&Expense::dummy_equal("A", 9000, &["A", "B", "C"]));
        // Shares claim 90.00 was split but the payer is credited 900.00.
        bad.expense.amount = Decimal::new(90000, 2);
        let err = SettlementPlanner::default().plan(&[bad], &[]).unwrap_err();
        assert!(
            matches!(err, SplitledgerError::ConservationViolation { .. }),
            "Expected ConservationViolation, got: {err:?}"
        );
    }
}
