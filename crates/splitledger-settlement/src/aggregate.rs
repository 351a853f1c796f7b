//! Balance aggregation over split expenses.

use splitledger_types::{Balances, SplitExpense};

/// Fold split expenses into net balances.
///
/// For each expense every participant is debited their share, then the
/// payer is credited the full amount. Members are registered (at zero) the
/// first time they appear, in input order, which fixes the order the
/// simplifier later walks them in.
#[must_use]
pub fn aggregate_balances(expenses: &[SplitExpense]) -> Balances {
    let mut balances = Balances::new();
    for expense in expenses {
        for (member, share) in expense.split.iter() {
            balances.debit(member, share);
        }
        balances.credit(expense.payer(), expense.amount());
    }
    balances
}
