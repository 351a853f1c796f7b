//! Settlement types.
//!
//! A [`Settlement`] is a transfer between two members. The simplifier
//! emits them as proposals; once a user marks one as paid, the same value
//! is appended to the settlement log and never changes again.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{MemberId, Result, SplitledgerError};

/// A transfer of `amount` from debtor `from` to creditor `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settlement {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
}

impl Settlement {
    /// Create a validated settlement.
    ///
    /// # Errors
    /// Returns [`SplitledgerError::InvalidSettlement`] if `amount` is not
    /// positive or if `from == to`.
    pub fn new(from: MemberId, to: MemberId, amount: Decimal) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(SplitledgerError::invalid_settlement(format!(
                "amount must be positive, got {amount}"
            )));
        }
        if from == to {
            return Err(SplitledgerError::invalid_settlement(format!(
                "{from} cannot settle with themselves"
            )));
        }
        Ok(Self { from, to, amount })
    }

    /// Deterministic fingerprint of `(from, to, amount)`.
    #[must_use]
    pub fn key(&self) -> SettlementKey {
        SettlementKey::of(self)
    }

    /// Whether `other` moves the same amount between the same two members
    /// in the same direction. Amount scale is ignored (`30` ≡ `30.00`).
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.amount == other.amount
    }

    /// Whether `member` pays or receives in this settlement.
    #[must_use]
    pub fn involves(&self, member: &MemberId) -> bool {
        &self.from == member || &self.to == member
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

// ---------------------------------------------------------------------------
// SettlementKey
// ---------------------------------------------------------------------------

/// SHA-256 fingerprint identifying equivalent settlements.
///
/// Two settlements share a key iff [`Settlement::is_equivalent`] holds, so
/// stores can index recorded rows by key and check for duplicates before
/// inserting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SettlementKey(pub [u8; 32]);

impl SettlementKey {
    #[must_use]
    pub fn of(settlement: &Settlement) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"splitledger:settlement:v1:");
        hasher.update(settlement.from.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(settlement.to.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(settlement.amount.normalize().to_string().as_bytes());
        let digest = hasher.finalize();
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self(key)
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for SettlementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stl:{}", hex::encode(&self.0[..8]))
    }
}
