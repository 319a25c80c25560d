//! Pluggable bank-selection policies for the channel dispatch loop.
//!
//! A scheduler only proposes which bank's head command to consider next;
//! timing legality is enforced uniformly by the channel afterwards, so the
//! choice of policy affects fairness and worst-case latency but never
//! correctness.

use crate::config::SchedulerPolicy;
use crate::mem::rank::Rank;

/// Bank-selection policy, with any cursor state in the variant payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheduler {
    /// Selects the bank whose head command has the earliest creation
    /// cycle; ties go to the first bank encountered.
    OldestFirst,
    /// Keeps a persistent cursor over the rank/bank grid and advances it
    /// one bank per probe, wrapping bank first, then rank.
    RankBankRoundRobin { rank: usize, bank: usize },
}

impl Scheduler {
    pub fn new(policy: SchedulerPolicy) -> Self {
        match policy {
            SchedulerPolicy::OldestFirst => Scheduler::OldestFirst,
            SchedulerPolicy::RankBankRoundRobin => Scheduler::RankBankRoundRobin { rank: 0, bank: 0 },
        }
    }

    /// Proposes the next bank to consider, as `(rank, bank)` indices.
    ///
    /// Returns `None` when every bank queue under the channel is empty.
    /// The round-robin cursor advances before probing, so a full sweep of
    /// the grid visits every bank exactly once.
    pub fn find_next(&mut self, ranks: &[Rank]) -> Option<(usize, usize)> {
        match self {
            Scheduler::OldestFirst => {
                let mut best: Option<(usize, usize, u64)> = None;
                for (r, rank) in ranks.iter().enumerate() {
                    for (b, bank) in rank.banks().iter().enumerate() {
                        let Some(head) = bank.head() else { continue };
                        let better = match best {
                            None => true,
                            Some((_, _, oldest)) => head.created_at() < oldest,
                        };
                        if better {
                            best = Some((r, b, head.created_at()));
                        }
                    }
                }
                best.map(|(r, b, _)| (r, b))
            }
            Scheduler::RankBankRoundRobin { rank, bank } => {
                let num_ranks = ranks.len();
                let num_banks = ranks[0].banks().len();
                for _ in 0..num_ranks * num_banks {
                    *bank += 1;
                    if *bank == num_banks {
                        *bank = 0;
                        *rank = (*rank + 1) % num_ranks;
                    }
                    if ranks[*rank].bank(*bank).head().is_some() {
                        return Some((*rank, *bank));
                    }
                }
                None
            }
        }
    }
}
