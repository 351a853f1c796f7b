//! Storage port.
//!
//! The engine never talks to a database directly. Whatever holds the
//! expense and settlement logs (a document store, SQL, or
//! [`InMemoryLedger`](crate::InMemoryLedger)) implements [`LedgerStore`].

use splitledger_types::{Expense, Result, Scope, Settlement};

/// Persistence capabilities the settle-up flow consumes.
///
/// Implementations return the full current snapshot on every load; the
/// service does not expect deltas.
pub trait LedgerStore {
    /// All expenses recorded in `scope`, in the order they were added.
    fn load_expenses(&self, scope: &Scope) -> Result<Vec<Expense>>;

    /// All settlements already recorded in `scope`.
    fn load_prior_settlements(&self, scope: &Scope) -> Result<Vec<Settlement>>;

    /// Append `settlement` to the scope's settlement log.
    ///
    /// This is a plain append. Duplicate suppression happens in
    /// [`SettleUpService::record_settlement`](crate::SettleUpService::record_settlement),
    /// which consults [`contains_settlement`](Self::contains_settlement) first.
    fn append_settlement(&mut self, scope: &Scope, settlement: Settlement) -> Result<()>;

    /// Whether an equivalent `(from, to, amount)` settlement is already
    /// recorded in `scope`.
    ///
    /// The default scans the full log. Stores that keep an index should
    /// override it.
    fn contains_settlement(&self, scope: &Scope, settlement: &Settlement) -> Result<bool> {
        Ok(self
            .load_prior_settlements(scope)?
            .iter()
            .any(|recorded| recorded.is_equivalent(settlement)))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use splitledger_types::MemberId;

    use super::*;

    /// Store that only implements the required methods.
    #[derive(Default)]
    struct LogOnly {
        settlements: Vec<Settlement>,
    }

    impl LedgerStore for LogOnly {
        fn load_expenses(&self, _scope: &Scope) -> Result<Vec<Expense>> {
            Ok(Vec::new())
        }

        fn load_prior_settlements(&self, _scope: &Scope) -> Result<Vec<Settlement>> {
            Ok(self.settlements.clone())
        }

        fn append_settlement(&mut self, _scope: &Scope, settlement: Settlement) -> Result<()> {
            self.settlements.push(settlement);
            Ok(())
        }
    }

    #[test]
    fn default_contains_scans_log() {
        let scope = Scope::group("trip");
        let mut store = LogOnly::default();
        let paid = Settlement::new(MemberId::from("B"), MemberId::from("A"), Decimal::new(30, 0))
            .unwrap();
        assert!(!store.contains_settlement(&scope, &paid).unwrap());

        store.append_settlement(&scope, paid).unwrap();

        // Same value at a different scale is still the same settlement.
        let rescaled =
            Settlement::new(MemberId::from("B"), MemberId::from("A"), Decimal::new(3000, 2))
                .unwrap();
        assert!(store.contains_settlement(&scope, &rescaled).unwrap());

        let reversed =
            Settlement::new(MemberId::from("A"), MemberId::from("B"), Decimal::new(30, 0))
                .unwrap();
        assert!(!store.contains_settlement(&scope, &reversed).unwrap());
    }
}
