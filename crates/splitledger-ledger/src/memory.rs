//! In-memory [`LedgerStore`].
//!
//! Each scope keeps an append-only expense log, an append-only settlement
//! log, and a set of [`SettlementKey`]s so duplicate checks do not scan
//! the log.
//!
//! A scope exists once it has been opened with [`InMemoryLedger::open_scope`]
//! or has received its first expense. Loading or appending to any other
//! scope returns [`SplitledgerError::ScopeNotFound`].

use std::collections::{HashMap, HashSet};

use splitledger_types::{Expense, Result, Scope, Settlement, SettlementKey, SplitledgerError};

use crate::ports::LedgerStore;

#[derive(Debug, Default)]
struct ScopeLog {
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
    keys: HashSet<SettlementKey>,
}

/// Reference store for tests and embedders with no persistence needs.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    scopes: HashMap<Scope, ScopeLog>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `scope` known to the store. Opening an existing scope is a no-op.
    pub fn open_scope(&mut self, scope: Scope) {
        self.scopes.entry(scope).or_default();
    }

    /// Append an expense, opening the scope if needed.
    ///
    /// # Errors
    /// Returns [`SplitledgerError::InvalidSplit`] if the payer or a
    /// participant is outside a pair scope. Nothing is stored in that case.
    pub fn add_expense(&mut self, scope: &Scope, expense: Expense) -> Result<()> {
        expense.ensure_within(scope)?;
        tracing::debug!(%scope, expense = %expense.id, amount = %expense.amount, "Expense added");
        self.scopes
            .entry(scope.clone())
            .or_default()
            .expenses
            .push(expense);
        Ok(())
    }

    #[must_use]
    pub fn has_scope(&self, scope: &Scope) -> bool {
        self.scopes.contains_key(scope)
    }

    /// All known scopes, sorted.
    #[must_use]
    pub fn scopes(&self) -> Vec<&Scope> {
        let mut scopes: Vec<&Scope> = self.scopes.keys().collect();
        scopes.sort();
        scopes
    }

    /// Number of recorded settlements in `scope`, or 0 if unknown.
    #[must_use]
    pub fn settlement_count(&self, scope: &Scope) -> usize {
        self.scopes.get(scope).map_or(0, |log| log.settlements.len())
    }

    fn log(&self, scope: &Scope) -> Result<&ScopeLog> {
        self.scopes
            .get(scope)
            .ok_or_else(|| SplitledgerError::ScopeNotFound(scope.clone()))
    }
}

impl LedgerStore for InMemoryLedger {
    fn load_expenses(&self, scope: &Scope) -> Result<Vec<Expense>> {
        Ok(self.log(scope)?.expenses.clone())
    }

    fn load_prior_settlements(&self, scope: &Scope) -> Result<Vec<Settlement>> {
        Ok(self.log(scope)?.settlements.clone())
    }

    fn append_settlement(&mut self, scope: &Scope, settlement: Settlement) -> Result<()> {
        let log = self
            .scopes
            .get_mut(scope)
            .ok_or_else(|| SplitledgerError::ScopeNotFound(scope.clone()))?;
        log.keys.insert(settlement.key());
        log.settlements.push(settlement);
        Ok(())
    }

    fn contains_settlement(&self, scope: &Scope, settlement: &Settlement) -> Result<bool> {
        Ok(self.log(scope)?.keys.contains(&settlement.key()))
    }
}
