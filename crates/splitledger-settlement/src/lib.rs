//! # splitledger-settlement
//!
//! **Settlement engine**: turns split expenses and recorded settlements
//! into a list of transfers that settles every debt.
//!
//! ## Pipeline
//!
//! ```text
//! [SplitExpense] ──aggregate──▶ Balances ──net prior settlements──▶ Balances
//!                                                                     │
//!                         [Settlement] proposals ◀──greedy simplify───┘
//! ```
//!
//! 1. [`aggregate_balances`]: payer credited the full amount, every
//!    participant debited their share
//! 2. [`net_settlements`]: already-paid transfers moved back toward zero
//! 3. [`simplify_debts`]: creditors matched against debtors until one side
//!    runs out
//!
//! Every stage is a pure function of its inputs. Callers recompute from a
//! full snapshot whenever expenses or settlements change.
//!
//! ## Invariants
//!
//! - **Conservation**: Σ balances equals the rounding remainder the splits
//!   left unallocated (zero when every split is exact). Netting never
//!   changes the total. See [`BalanceConservation`].
//! - **Termination**: each simplifier step fully settles at least one
//!   party, so at most `n` transfers are emitted for `n` participants.

pub mod aggregate;
pub mod conservation;
pub mod determinism;
pub mod netting;
pub mod planner;
pub mod simplifier;

pub use aggregate::aggregate_balances;
pub use conservation::BalanceConservation;
pub use determinism::{compute_plan_digest, verify_plan_digest};
pub use netting::{apply_settlements, net_settlements};
pub use planner::{SettlementPlan, SettlementPlanner};
pub use simplifier::{DebtSimplifier, simplify_debts};
