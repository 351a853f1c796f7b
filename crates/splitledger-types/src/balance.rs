//! Net balance model.
//!
//! Positive balance: the member is owed money (creditor).
//! Negative balance: the member owes money (debtor).
//! Balances are always derived from expenses and settlements, never stored.

use std::{collections::HashMap, fmt};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MemberId, money};

/// Where a member stands, given a settle tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Others owe this member money.
    Owed,
    /// This member owes others money.
    Owes,
    /// Within tolerance of zero.
    Settled,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owed => write!(f, "OWED"),
            Self::Owes => write!(f, "OWES"),
            Self::Settled => write!(f, "SETTLED"),
        }
    }
}

/// Signed net balance per member, iterated in first-seen order.
///
/// The iteration order is what the debt simplifier uses to pick creditor
/// and debtor pairs, so it has to be deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(
    from = "Vec<(MemberId, Decimal)>",
    into = "Vec<(MemberId, Decimal)>"
)]
pub struct Balances {
    order: Vec<MemberId>,
    amounts: HashMap<MemberId, Decimal>,
}

impl Balances {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `member` with a zero balance if not yet present.
    pub fn ensure(&mut self, member: &MemberId) {
        if !self.amounts.contains_key(member) {
            self.order.push(member.clone());
            self.amounts.insert(member.clone(), Decimal::ZERO);
        }
    }

    /// Increase `member`'s balance (they are owed more).
    pub fn credit(&mut self, member: &MemberId, amount: Decimal) {
        self.ensure(member);
        if let Some(balance) = self.amounts.get_mut(member) {
            *balance += amount;
        }
    }

    /// Decrease `member`'s balance (they owe more).
    pub fn debit(&mut self, member: &MemberId, amount: Decimal) {
        self.credit(member, -amount);
    }

    /// Balance of `member`; zero for unknown members.
    #[must_use]
    pub fn get(&self, member: &MemberId) -> Decimal {
        self.amounts.get(member).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn contains(&self, member: &MemberId) -> bool {
        self.amounts.contains_key(member)
    }

    /// `(member, balance)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, Decimal)> {
        self.order
            .iter()
            .map(|m| (m, self.amounts.get(m).copied().unwrap_or(Decimal::ZERO)))
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberId> {
        self.order.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of all balances. Zero for a closed system, up to rounding
    /// remainders left unallocated by splits.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.amounts.values().copied().sum()
    }

    #[must_use]
    pub fn position(&self, member: &MemberId, tolerance: Decimal) -> Position {
        let balance = self.get(member);
        if money::is_negligible(balance, tolerance) {
            Position::Settled
        } else if balance > Decimal::ZERO {
            Position::Owed
        } else {
            Position::Owes
        }
    }

    /// Members owed more than `tolerance`, in first-seen order.
    #[must_use]
    pub fn creditors(&self, tolerance: Decimal) -> Vec<(&MemberId, Decimal)> {
        self.iter().filter(|(_, b)| *b > tolerance).collect()
    }

    /// Members owing more than `tolerance`, in first-seen order. Amounts
    /// stay negative.
    #[must_use]
    pub fn debtors(&self, tolerance: Decimal) -> Vec<(&MemberId, Decimal)> {
        self.iter().filter(|(_, b)| *b < -tolerance).collect()
    }

    /// Whether every balance is within `tolerance` of zero.
    #[must_use]
    pub fn is_settled(&self, tolerance: Decimal) -> bool {
        self.amounts
            .values()
            .all(|b| money::is_negligible(*b, tolerance))
    }
}

/// Balances compare as maps: order is ignored, so are members whose
/// balance is exactly zero on one side and absent on the other.
impl PartialEq for Balances {
    fn eq(&self, other: &Self) -> bool {
        let covers = |a: &Self, b: &Self| a.iter().all(|(m, bal)| b.get(m) == bal);
        covers(self, other) && covers(other, self)
    }
}

impl Eq for Balances {}

impl FromIterator<(MemberId, Decimal)> for Balances {
    fn from_iter<I: IntoIterator<Item = (MemberId, Decimal)>>(iter: I) -> Self {
        let mut balances = Self::new();
        for (member, amount) in iter {
            balances.credit(&member, amount);
        }
        balances
    }
}

impl From<Vec<(MemberId, Decimal)>> for Balances {
    fn from(pairs: Vec<(MemberId, Decimal)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<Balances> for Vec<(MemberId, Decimal)> {
    fn from(balances: Balances) -> Self {
        let Balances { order, mut amounts } = balances;
        order
            .into_iter()
            .map(|m| {
                let amount = amounts.remove(&m).unwrap_or(Decimal::ZERO);
                (m, amount)
            })
            .collect()
    }
}

impl fmt::Display for Balances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (member, balance) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{member}: {balance}")?;
        }
        Ok(())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Balances {
    /// Build balances from `(member, cents)` pairs.
    pub fn from_cents(pairs: &[(&str, i64)]) -> Self {
        pairs
            .iter()
            .map(|(m, cents)| (MemberId::from(*m), Decimal::new(*cents, 2)))
            .collect()
    }

    /// `members` random cent balances that sum to exactly zero.
    pub fn random_zero_sum<R: rand::Rng>(rng: &mut R, members: usize) -> Self {
        let mut balances = Self::new();
        let mut running = 0i64;
        for i in 0..members {
            let cents = if i + 1 == members {
                -running
            } else {
                rng.gen_range(-50_000..=50_000)
            };
            running += cents;
            balances.credit(&MemberId::new(format!("m{i}")), Decimal::new(cents, 2));
        }
        balances
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::constants::SETTLE_TOLERANCE;

    #[test]
    fn keeps_first_seen_order() {
        let mut b = Balances::new();
        b.debit(&MemberId::from("carol"), Decimal::ONE);
        b.credit(&MemberId::from("alice"), Decimal::TWO);
        b.credit(&MemberId::from("carol"), Decimal::ONE);
        let members: Vec<&str> = b.members().map(MemberId::as_str).collect();
        assert_eq!(members, ["carol", "alice"]);
        assert_eq!(b.get(&MemberId::from("carol")), Decimal::ZERO);
    }

    #[test]
    fn unknown_member_is_zero() {
        let b = Balances::new();
        assert_eq!(b.get(&MemberId::from("ghost")), Decimal::ZERO);
        assert!(!b.contains(&MemberId::from("ghost")));
        assert!(b.is_empty());
    }

    #[test]
    fn positions_respect_tolerance() {
        let b = Balances::from_cents(&[("a", 6000), ("b", -3000), ("c", 1), ("d", -1)]);
        assert_eq!(b.position(&MemberId::from("a"), SETTLE_TOLERANCE), Position::Owed);
        assert_eq!(b.position(&MemberId::from("b"), SETTLE_TOLERANCE), Position::Owes);
        assert_eq!(b.position(&MemberId::from("c"), SETTLE_TOLERANCE), Position::Settled);
        assert_eq!(b.position(&MemberId::from("d"), SETTLE_TOLERANCE), Position::Settled);
        assert_eq!(b.creditors(SETTLE_TOLERANCE).len(), 1);
        assert_eq!(b.debtors(SETTLE_TOLERANCE).len(), 1);
        assert!(!b.is_settled(SETTLE_TOLERANCE));
    }

    #[test]
    fn equality_ignores_order_and_explicit_zeros() {
        let a = Balances::from_cents(&[("a", 100), ("b", -100), ("c", 0)]);
        let b = Balances::from_cents(&[("b", -100), ("a", 100)]);
        assert_eq!(a, b);
        let c = Balances::from_cents(&[("a", 100), ("b", -99)]);
        assert_ne!(a, c);
    }

    #[test]
    fn random_zero_sum_sums_to_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..20 {
            let b = Balances::random_zero_sum(&mut rng, n);
            assert_eq!(b.len(), n);
            assert_eq!(b.total(), Decimal::ZERO);
        }
    }

    #[test]
    fn serde_preserves_order() {
        let b = Balances::from_cents(&[("z", 250), ("a", -250)]);
        let json = serde_json::to_string(&b).unwrap();
        let back: Balances = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
        let members: Vec<&str> = back.members().map(MemberId::as_str).collect();
        assert_eq!(members, ["z", "a"]);
    }

    #[test]
    fn display_lists_members() {
        let b = Balances::from_cents(&[("a", 6000), ("b", -6000)]);
        assert_eq!(b.to_string(), "a: 60.00, b: -60.00");
    }
}
