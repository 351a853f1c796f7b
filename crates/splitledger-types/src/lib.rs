//! # splitledger-types
//!
//! Shared types, errors, and configuration for the **SplitLedger**
//! expense splitting and debt settlement engine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`MemberId`], [`GroupId`], [`ExpenseId`], [`Scope`]
//! - **Expense model**: [`Expense`], [`SplitPolicy`]
//! - **Split model**: [`SplitResult`], [`MemberShare`], [`SplitExpense`]
//! - **Settlement model**: [`Settlement`], [`SettlementKey`]
//! - **Balance model**: [`Balances`], [`Position`]
//! - **Configuration**: [`EngineConfig`], [`SplitConfig`], [`SimplifyConfig`]
//! - **Errors**: [`SplitledgerError`] with `SL_ERR_` prefix codes
//! - **Money helpers**: half-up rounding to currency precision

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod expense;
pub mod ids;
pub mod money;
pub mod settlement;
pub mod split;

pub use balance::*;
pub use config::*;
pub use error::*;
pub use expense::*;
pub use ids::*;
pub use settlement::*;
pub use split::*;

// Constants and money helpers are accessed via their module paths
// (`splitledger_types::constants::FOO`, `splitledger_types::money::round_currency`).
