//! Settle-up service.
//!
//! Recompute flow, run on every call:
//! 1. Load the scope's full expense and settlement logs
//! 2. Check every expense stays inside the scope, then split it with the
//!    configured calculator
//! 3. Aggregate, verify conservation, net prior settlements
//! 4. Simplify into proposed transfers and digest them
//!
//! Recording flow:
//! 1. Validate the settlement against the scope
//! 2. Skip it if an equivalent row is already in the log
//! 3. Otherwise append it

use splitledger_settlement::{SettlementPlan, SettlementPlanner};
use splitledger_split::SplitCalculator;
use splitledger_types::{
    EngineConfig, Result, Scope, Settlement, SplitExpense, SplitledgerError,
};

use crate::ports::LedgerStore;

/// What [`SettleUpService::record_settlement`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordOutcome {
    /// A new row was appended.
    Recorded,
    /// An equivalent row already existed; nothing was written.
    AlreadyRecorded,
}

impl RecordOutcome {
    #[must_use]
    pub fn is_new(self) -> bool {
        matches!(self, Self::Recorded)
    }
}

/// Ties a [`LedgerStore`] to the split calculator and settlement planner.
#[derive(Debug)]
pub struct SettleUpService<S> {
    store: S,
    calculator: SplitCalculator,
    planner: SettlementPlanner,
}

impl<S: LedgerStore> SettleUpService<S> {
    /// Create a service over `store`.
    ///
    /// # Errors
    /// Returns [`SplitledgerError::Configuration`] if `config` fails
    /// validation.
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            calculator: SplitCalculator::new(config.split),
            planner: SettlementPlanner::new(config.simplify),
        })
    }

    /// Service with the default configuration.
    #[must_use]
    pub fn with_defaults(store: S) -> Self {
        Self {
            store,
            calculator: SplitCalculator::default(),
            planner: SettlementPlanner::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Compute the current transfer plan for `scope` from its full snapshot.
    ///
    /// # Errors
    /// - Store errors from loading the snapshot
    /// - `InvalidSplit` if any stored expense cannot be split or involves
    ///   someone outside a pair scope
    /// - `ConservationViolation` / `InvalidBalance` if the snapshot is
    ///   internally inconsistent
    pub fn recompute(&self, scope: &Scope) -> Result<SettlementPlan> {
        let expenses = self.store.load_expenses(scope)?;
        let prior = self.store.load_prior_settlements(scope)?;

        let split: Vec<SplitExpense> = expenses
            .iter()
            .map(|expense| {
                expense.ensure_within(scope)?;
                self.calculator.split_expense(expense)
            })
            .collect::<Result<_>>()?;
        let plan = self.planner.plan(&split, &prior)?;

        tracing::info!(
            %scope,
            expenses = expenses.len(),
            settlements = prior.len(),
            transfers = plan.transfers.len(),
            digest = %plan.digest_hex(),
            "Settle-up plan recomputed"
        );
        Ok(plan)
    }

    /// Record a paid transfer. Recording an equivalent transfer twice is a
    /// no-op that reports [`RecordOutcome::AlreadyRecorded`].
    ///
    /// # Errors
    /// - `InvalidSettlement` if the amount is not positive, the transfer is
    ///   to oneself, or a pair scope does not involve both members
    /// - Store errors, including `ScopeNotFound`
    pub fn record_settlement(
        &mut self,
        scope: &Scope,
        settlement: Settlement,
    ) -> Result<RecordOutcome> {
        // Fields are public, so re-run the constructor checks.
        let settlement = Settlement::new(settlement.from, settlement.to, settlement.amount)?;
        if !scope.involves(&settlement.from) || !scope.involves(&settlement.to) {
            return Err(SplitledgerError::invalid_settlement(format!(
                "{settlement} is outside {scope}"
            )));
        }

        if self.store.contains_settlement(scope, &settlement)? {
            tracing::warn!(
                %scope,
                key = %settlement.key(),
                %settlement,
                "Equivalent settlement already recorded, skipping"
            );
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        tracing::debug!(%scope, key = %settlement.key(), %settlement, "Settlement recorded");
        self.store.append_settlement(scope, settlement)?;
        Ok(RecordOutcome::Recorded)
    }

    /// Record the `index`-th proposed transfer of `plan` as paid.
    ///
    /// # Errors
    /// Returns [`SplitledgerError::TransferNotInPlan`] if `index` is out of
    /// range, otherwise whatever [`record_settlement`](Self::record_settlement)
    /// returns.
    pub fn mark_paid(
        &mut self,
        scope: &Scope,
        plan: &SettlementPlan,
        index: usize,
    ) -> Result<RecordOutcome> {
        let transfer = plan
            .transfers
            .get(index)
            .cloned()
            .ok_or(SplitledgerError::TransferNotInPlan {
                index,
                len: plan.transfers.len(),
            })?;
        self.record_settlement(scope, transfer)
    }
}
