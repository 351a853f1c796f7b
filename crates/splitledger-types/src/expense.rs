//! Expense model.
//!
//! An [`Expense`] is immutable once created. Corrections are modeled as new
//! expenses; there is no update path.

use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ExpenseId, MemberId, Result, Scope, SplitledgerError};

/// How an expense amount is divided among its participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitPolicy {
    /// Everyone pays the same rounded share. Raw inputs are ignored.
    Equal,
    /// Raw inputs are share counts; each member pays `share / Σ shares`.
    Shares,
    /// Raw inputs are percentages of the amount.
    Percentage,
}

impl SplitPolicy {
    /// Whether this policy reads per-member raw inputs.
    #[must_use]
    pub fn uses_raw_inputs(self) -> bool {
        !matches!(self, Self::Equal)
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "EQUAL"),
            Self::Shares => write!(f, "SHARES"),
            Self::Percentage => write!(f, "PERCENTAGE"),
        }
    }
}

/// A shared expense paid by one member on behalf of a set of participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    /// Total paid, in currency units with cent precision.
    pub amount: Decimal,
    /// The member who paid the full amount.
    pub payer: MemberId,
    pub policy: SplitPolicy,
    /// Members the expense is split between, in display order.
    pub participants: Vec<MemberId>,
    /// Share counts or percentages, depending on `policy`.
    pub raw_inputs: HashMap<MemberId, Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create an expense stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        payer: MemberId,
        policy: SplitPolicy,
        participants: Vec<MemberId>,
        raw_inputs: HashMap<MemberId, Decimal>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            description: description.into(),
            amount,
            payer,
            policy,
            participants,
            raw_inputs,
            created_at: Utc::now(),
        }
    }

    /// An expense split equally between `participants`.
    #[must_use]
    pub fn equal(
        description: impl Into<String>,
        amount: Decimal,
        payer: MemberId,
        participants: Vec<MemberId>,
    ) -> Self {
        Self::new(
            description,
            amount,
            payer,
            SplitPolicy::Equal,
            participants,
            HashMap::new(),
        )
    }

    /// An expense split by share counts. Participants are taken from
    /// `shares` in the given order.
    #[must_use]
    pub fn by_shares(
        description: impl Into<String>,
        amount: Decimal,
        payer: MemberId,
        shares: Vec<(MemberId, Decimal)>,
    ) -> Self {
        let participants = shares.iter().map(|(m, _)| m.clone()).collect();
        Self::new(
            description,
            amount,
            payer,
            SplitPolicy::Shares,
            participants,
            shares.into_iter().collect(),
        )
    }

    /// An expense split by percentages. Participants are taken from
    /// `percentages` in the given order.
    #[must_use]
    pub fn by_percentage(
        description: impl Into<String>,
        amount: Decimal,
        payer: MemberId,
        percentages: Vec<(MemberId, Decimal)>,
    ) -> Self {
        let participants = percentages.iter().map(|(m, _)| m.clone()).collect();
        Self::new(
            description,
            amount,
            payer,
            SplitPolicy::Percentage,
            participants,
            percentages.into_iter().collect(),
        )
    }

    /// Check that the payer and every participant belong to `scope`.
    ///
    /// A pair scope can only settle debts between its two members, so an
    /// expense involving anyone else could never be paid off there.
    ///
    /// # Errors
    /// Returns [`SplitledgerError::InvalidSplit`] naming the first outsider.
    pub fn ensure_within(&self, scope: &Scope) -> Result<()> {
        let outsider = std::iter::once(&self.payer)
            .chain(&self.participants)
            .find(|member| !scope.involves(member));
        match outsider {
            Some(member) => Err(SplitledgerError::invalid_split(format!(
                "{} involves {member}, who is outside {scope}",
                self.id
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Expense[{}] {} {} paid by {} ({}, {} participants)",
            self.id,
            self.description,
            self.amount,
            self.payer,
            self.policy,
            self.participants.len(),
        )
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Expense {
    /// Equal split over `participants`, amount given in cents.
    pub fn dummy_equal(payer: &str, amount_cents: i64, participants: &[&str]) -> Self {
        Self::equal(
            "dummy",
            Decimal::new(amount_cents, 2),
            MemberId::from(payer),
            participants.iter().map(|m| MemberId::from(*m)).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_display() {
        assert_eq!(format!("{}", SplitPolicy::Equal), "EQUAL");
        assert_eq!(format!("{}", SplitPolicy::Percentage), "PERCENTAGE");
        assert!(!SplitPolicy::Equal.uses_raw_inputs());
        assert!(SplitPolicy::Shares.uses_raw_inputs());
    }

    #[test]
    fn by_shares_keeps_participant_order() {
        let e = Expense::by_shares(
            "rent",
            Decimal::new(90, 0),
            MemberId::from("b"),
            vec![
                (MemberId::from("b"), Decimal::ONE),
                (MemberId::from("a"), Decimal::TWO),
            ],
        );
        assert_eq!(e.participants, vec![MemberId::from("b"), MemberId::from("a")]);
        assert_eq!(e.raw_inputs[&MemberId::from("a")], Decimal::TWO);
        assert_eq!(e.policy, SplitPolicy::Shares);
    }

    #[test]
    fn pair_scope_rejects_outsiders() {
        let pair = Scope::pair(MemberId::from("a"), MemberId::from("b"));
        assert!(Expense::dummy_equal("a", 9000, &["a", "b"]).ensure_within(&pair).is_ok());

        let err = Expense::dummy_equal("a", 9000, &["a", "b", "c"])
            .ensure_within(&pair)
            .unwrap_err();
        assert!(
            matches!(&err, SplitledgerError::InvalidSplit { reason } if reason.contains("c, who is outside pair:a+b")),
            "Expected InvalidSplit, got: {err:?}"
        );

        // An outside payer is caught even when every participant is inside.
        let outside_payer = Expense::dummy_equal("c", 9000, &["a", "b"]);
        assert!(outside_payer.ensure_within(&pair).is_err());

        // Groups admit everyone.
        let group = Scope::group("trip");
        assert!(Expense::dummy_equal("c", 9000, &["a", "b", "c"]).ensure_within(&group).is_ok());
    }

    #[test]
    fn expense_display() {
        let e = Expense::dummy_equal("alice", 9000, &["alice", "bob", "carol"]);
        let s = format!("{e}");
        assert!(s.contains("90.00"));
        assert!(s.contains("alice"));
        assert!(s.contains("3 participants"));
    }

    #[test]
    fn expense_serde_roundtrip() {
        let e = Expense::by_percentage(
            "dinner",
            Decimal::new(20000, 2),
            MemberId::from("a"),
            vec![
                (MemberId::from("a"), Decimal::new(25, 0)),
                (MemberId::from("b"), Decimal::new(75, 0)),
            ],
        );
        let json = serde_json::to_string(&e).unwrap();
        let back: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, e.id);
        assert_eq!(back.amount, e.amount);
        assert_eq!(back.raw_inputs, e.raw_inputs);
        assert_eq!(back.participants, e.participants);
    }
}
