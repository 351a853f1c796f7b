//! Netting recorded settlements against raw balances.
//!
//! A recorded settlement `(from, to, amount)` means `from` already paid
//! `to`. Netting moves the debtor's balance up by `amount` and the
//! creditor's down by `amount`, so paid debts are not proposed again.
//! Runs after aggregation and before simplification.

use splitledger_types::{Balances, Settlement};

/// Apply `prior` settlements to `balances` in place.
pub fn apply_settlements(balances: &mut Balances, prior: &[Settlement]) {
    for settlement in prior {
        balances.credit(&settlement.from, settlement.amount);
        balances.debit(&settlement.to, settlement.amount);
    }
}

/// Balances after netting out `prior` settlements.
#[must_use]
pub fn net_settlements(mut balances: Balances, prior: &[Settlement]) -> Balances {
    apply_settlements(&mut balances, prior);
    balances
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use splitledger_types::MemberId;

    use super::*;

    fn stl(from: &str, to: &str, cents: i64) -> Settlement {
        Settlement::new(MemberId::from(from), MemberId::from(to), Decimal::new(cents, 2)).unwrap()
    }

    #[test]
    fn no_settlements_is_identity() {
        let b = Balances::from_cents(&[("A", 6000), ("B", -3000), ("C", -3000)]);
        assert_eq!(net_settlements(b.clone(), &[]), b);
    }

    #[test]
    fn paid_debt_moves_both_sides_toward_zero() {
        let b = Balances::from_cents(&[("A", 6000), ("B", -3000), ("C", -3000)]);
        let netted = net_settlements(b, &[stl("B", "A", 3000)]);
        assert_eq!(netted, Balances::from_cents(&[("A", 3000), ("B", 0), ("C", -3000)]));
    }

    #[test]
    fn overpayment_flips_sign() {
        let b = Balances::from_cents(&[("A", 1000), ("B", -1000)]);
        let netted = net_settlements(b, &[stl("B", "A", 1500)]);
        assert_eq!(netted, Balances::from_cents(&[("A", -500), ("B", 500)]));
    }

    #[test]
    fn unknown_members_are_added() {
        let netted = net_settlements(Balances::new(), &[stl("X", "Y", 700)]);
        assert_eq!(netted, Balances::from_cents(&[("X", 700), ("Y", -700)]));
        assert_eq!(netted.total(), Decimal::ZERO);
    }

    #[test]
    fn netting_composes() {
        let b = Balances::from_cents(&[("A", 9000), ("B", -4000), ("C", -5000)]);
        let s1 = vec![stl("B", "A", 1000), stl("C", "A", 2500)];
        let s2 = vec![stl("B", "A", 3000), stl("A", "C", 100)];
        let stepwise = net_settlements(net_settlements(b.clone(), &s1), &s2);
        let combined: Vec<Settlement> = s1.iter().chain(&s2).cloned().collect();
        assert_eq!(stepwise, net_settlements(b, &combined));
    }

    #[test]
    fn netting_preserves_total() {
        let b = Balances::from_cents(&[("A", 101), ("B", -100)]);
        let netted = net_settlements(b.clone(), &[stl("B", "A", 50), stl("C", "B", 20)]);
        assert_eq!(netted.total(), b.total());
    }
}
