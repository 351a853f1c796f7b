//! # splitledger-ledger
//!
//! Where the pure engine meets storage.
//!
//! - [`LedgerStore`]: what the engine needs from persistence (load a
//!   scope's expenses and settlements, append a settlement)
//! - [`InMemoryLedger`]: reference store backed by per-scope logs
//! - [`SettleUpService`]: recomputes a scope's plan from a full snapshot
//!   and records paid transfers exactly once
//!
//! Every recompute reads the whole current snapshot. Nothing is cached
//! between calls, so the plan always reflects the latest log.

pub mod memory;
pub mod ports;
pub mod service;

pub use memory::InMemoryLedger;
pub use ports::LedgerStore;
pub use service::{RecordOutcome, SettleUpService};
