//! # splitledger-split
//!
//! **Split calculator** for SplitLedger.
//!
//! Turns one expense's raw split inputs into per-member owed amounts:
//!
//! - **Equal**: `round(amount / n)` for every member
//! - **Shares**: `round(round(share / Σ shares, 10) × amount)`
//! - **Percentage**: `round(percent / 100 × amount)`
//!
//! Rounding is half-up to cents. The computation is pure: no I/O, no
//! shared state, same inputs → same split.

pub mod calculator;

pub use calculator::{SplitCalculator, compute_split, split_expense};
