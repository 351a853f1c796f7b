//! Greedy debt simplifier.
//!
//! ```text
//! simplify_debts(Balances) -> [Settlement]
//! ```
//!
//! ## Algorithm
//!
//! 1. Drop every balance with `|balance| <= tolerance`
//! 2. Queue creditors (`balance > tolerance`) and debtors
//!    (`balance < -tolerance`)
//! 3. Take one creditor and one debtor; transfer
//!    `min(credit, debt)` from the debtor to the creditor
//! 4. A party still beyond tolerance goes back to the front of its queue
//! 5. Stop when either queue is empty
//!
//! With [`MatchingOrder::InsertionOrder`] the queues follow the balances'
//! first-seen order, so the result is valid but not necessarily the
//! smallest possible transfer list. [`MatchingOrder::LargestFirst`] always
//! pairs the largest creditor with the largest debtor instead.
//!
//! Anything left in a queue at the end is residual. Residual up to
//! `tolerance × participants` plus the caller's rounding slack is accepted;
//! more than that means the balances never summed to zero.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, VecDeque},
};

use rust_decimal::Decimal;
use splitledger_types::{
    Balances, MatchingOrder, MemberId, Result, Settlement, SimplifyConfig, SplitledgerError,
};

/// Greedy creditor/debtor matcher.
#[derive(Debug, Clone, Default)]
pub struct DebtSimplifier {
    config: SimplifyConfig,
    rounding_slack: Decimal,
}

impl DebtSimplifier {
    #[must_use]
    pub fn new(config: SimplifyConfig) -> Self {
        Self {
            config,
            rounding_slack: Decimal::ZERO,
        }
    }

    /// Accept this much extra residual, typically the rounding remainder
    /// splits left unallocated.
    #[must_use]
    pub fn with_rounding_slack(mut self, slack: Decimal) -> Self {
        self.rounding_slack = slack.abs();
        self
    }

    #[must_use]
    pub fn config(&self) -> &SimplifyConfig {
        &self.config
    }

    /// Produce transfers that bring every balance within tolerance of zero.
    ///
    /// # Errors
    /// Returns [`SplitledgerError::InvalidBalance`] if the unmatched
    /// residual exceeds the allowance.
    pub fn simplify(&self, balances: &Balances) -> Result<Vec<Settlement>> {
        let tolerance = self.config.tolerance;

        let mut creditors = WorkQueue::new(self.config.order);
        let mut debtors = WorkQueue::new(self.config.order);
        for (seq, (member, balance)) in balances.iter().enumerate() {
            if balance > tolerance {
                creditors.push(Party::new(member, balance, seq));
            } else if balance < -tolerance {
                debtors.push(Party::new(member, -balance, seq));
            }
        }

        let mut transfers = Vec::new();
        loop {
            let Some(mut creditor) = creditors.pop() else {
                break;
            };
            let Some(mut debtor) = debtors.pop() else {
                creditors.push(creditor);
                break;
            };

            let amount = creditor.remaining.min(debtor.remaining);
            tracing::debug!(
                debtor = %debtor.member,
                creditor = %creditor.member,
                %amount,
                "Transfer proposed"
            );
            transfers.push(Settlement {
                from: debtor.member.clone(),
                to: creditor.member.clone(),
                amount,
            });

            creditor.remaining -= amount;
            debtor.remaining -= amount;
            if creditor.remaining > tolerance {
                creditors.push(creditor);
            }
            if debtor.remaining > tolerance {
                debtors.push(debtor);
            }
        }

        self.check_residual(balances, creditors, debtors)?;
        Ok(transfers)
    }

    fn check_residual(
        &self,
        balances: &Balances,
        creditors: WorkQueue,
        debtors: WorkQueue,
    ) -> Result<()> {
        let mut leftover = creditors.into_vec();
        leftover.extend(debtors.into_vec());
        if leftover.is_empty() {
            return Ok(());
        }

        let residual: Decimal = leftover.iter().map(|p| p.remaining).sum();
        let allowance =
            self.config.tolerance * Decimal::from(balances.len()) + self.rounding_slack;
        if residual > allowance {
            let parties: Vec<String> = leftover
                .iter()
                .map(|p| format!("{}={}", p.member, p.remaining))
                .collect();
            return Err(SplitledgerError::InvalidBalance {
                reason: format!(
                    "unmatched residual {residual} exceeds allowance {allowance} ({})",
                    parties.join(", ")
                ),
            });
        }

        tracing::warn!(
            %residual,
            %allowance,
            parties = leftover.len(),
            "Rounding residual left unmatched"
        );
        Ok(())
    }
}

/// Simplify with the default configuration and no rounding slack.
pub fn simplify_debts(balances: &Balances) -> Result<Vec<Settlement>> {
    DebtSimplifier::default().simplify(balances)
}

// ---------------------------------------------------------------------------
// Work queues
// ---------------------------------------------------------------------------

/// One side of a pending transfer. `remaining` is always positive.
#[derive(Debug, Clone)]
struct Party {
    member: MemberId,
    remaining: Decimal,
    seq: usize,
}

impl Party {
    fn new(member: &MemberId, remaining: Decimal, seq: usize) -> Self {
        Self {
            member: member.clone(),
            remaining,
            seq,
        }
    }
}

// Max-heap order: larger remaining first, then earlier first-seen position.
impl Ord for Party {
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Party {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Party {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Party {}

enum WorkQueue {
    /// Pops from the front; partially settled parties return to the front.
    Fifo(VecDeque<Party>),
    Largest(BinaryHeap<Party>),
}

impl WorkQueue {
    fn new(order: MatchingOrder) -> Self {
        match order {
            MatchingOrder::InsertionOrder => Self::Fifo(VecDeque::new()),
            MatchingOrder::LargestFirst => Self::Largest(BinaryHeap::new()),
        }
    }

    fn push(&mut self, party: Party) {
        match self {
            Self::Fifo(queue) => {
                // Initial fill arrives in ascending `seq`; a returning party
                // has the smallest `seq` still queued, so it lands in front.
                if queue.front().is_some_and(|front| party.seq < front.seq) {
                    queue.push_front(party);
                } else {
                    queue.push_back(party);
                }
            }
            Self::Largest(heap) => heap.push(party),
        }
    }

    fn pop(&mut self) -> Option<Party> {
        match self {
            Self::Fifo(queue) => queue.pop_front(),
            Self::Largest(heap) => heap.pop(),
        }
    }

    fn into_vec(self) -> Vec<Party> {
        match self {
            Self::Fifo(queue) => queue.into(),
            Self::Largest(heap) => heap.into_vec(),
        }
    }
}
