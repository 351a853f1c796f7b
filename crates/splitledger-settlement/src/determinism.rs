//! Plan digests for detecting changed proposals.
//!
//! A recompute over the same snapshot yields the same transfers in the
//! same order, so a digest over the list lets callers tell whether the
//! plan shown to a user is still current without comparing it field by
//! field.

use sha2::{Digest, Sha256};
use splitledger_types::Settlement;

/// Hash an ordered list of transfers.
///
/// Depends on each transfer's debtor, creditor and normalized amount, and
/// on their order.
#[must_use]
pub fn compute_plan_digest(transfers: &[Settlement]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"splitledger:plan:v1:");
    hasher.update((transfers.len() as u64).to_le_bytes());

    for transfer in transfers {
        hasher.update(transfer.key().0);
    }

    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

/// Whether `transfers` still hash to `expected`.
#[must_use]
pub fn verify_plan_digest(transfers: &[Settlement], expected: &[u8; 32]) -> bool {
    compute_plan_digest(transfers) == *expected
}
