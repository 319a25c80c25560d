//! Channel: timing-constraint resolution and dispatch bookkeeping.
//!
//! The channel owns its ranks and one scheduler, and is where a candidate
//! command's earliest legal dispatch cycle is resolved against everything
//! previously scheduled under the channel. The dispatch loop itself is
//! driven by the controller as a self-re-arming event; the channel tracks
//! the armed flag and the outstanding-command count that decide whether
//! the loop keeps running.

use crate::config::SchedulerPolicy;
use crate::mem::command::{Command, CommandKind};
use crate::mem::rank::Rank;
use crate::mem::scheduler::Scheduler;
use crate::mem::timing::{Location, TimingMatrix};

/// One memory channel: a fixed set of ranks plus a scheduler.
#[derive(Debug)]
pub struct Channel {
    id: usize,
    controller: usize,
    ranks: Vec<Rank>,
    scheduler: Scheduler,
    outstanding: usize,
    armed: bool,
}

impl Channel {
    pub fn new(
        id: usize,
        controller: usize,
        num_ranks: usize,
        num_banks: usize,
        policy: SchedulerPolicy,
    ) -> Self {
        Self {
            id,
            controller,
            ranks: (0..num_ranks).map(|r| Rank::new(r, num_banks)).collect(),
            scheduler: Scheduler::new(policy),
            outstanding: 0,
            armed: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Index of the owning controller.
    pub fn controller(&self) -> usize {
        self.controller
    }

    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    pub fn rank(&self, index: usize) -> &Rank {
        &self.ranks[index]
    }

    pub fn rank_mut(&mut self, index: usize) -> &mut Rank {
        &mut self.ranks[index]
    }

    /// Commands queued across all banks and not yet dispatched.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Accounts for `n` commands newly queued under this channel.
    pub fn add_outstanding(&mut self, n: usize) {
        self.outstanding += n;
    }

    /// Marks the dispatch loop armed; returns `true` if it was idle and an
    /// event must be scheduled. Keeps a loop from being armed twice.
    pub(crate) fn try_arm_scheduler(&mut self) -> bool {
        if self.armed {
            false
        } else {
            self.armed = true;
            true
        }
    }

    pub(crate) fn disarm_scheduler(&mut self) {
        self.armed = false;
    }

    /// Asks the scheduler for the next candidate bank.
    pub fn find_next(&mut self) -> Option<(usize, usize)> {
        self.scheduler.find_next(&self.ranks)
    }

    /// Earliest cycle at which `command` may legally dispatch.
    ///
    /// For the command's kind, every previously scheduled kind is examined
    /// at three locations: the same bank, a different bank of the same
    /// rank (tracked at rank granularity) and every other rank. Each
    /// defined matrix cell contributes `last scheduled cycle + gap`; the
    /// result is the maximum of those and `now`. Undefined cells impose no
    /// constraint, and negative gaps are absorbed by the `now` floor.
    pub fn ready_cycle(&self, command: &Command, matrix: &TimingMatrix, now: u64) -> u64 {
        let next = command.kind();
        let home_rank = &self.ranks[command.rank()];
        let home_bank = home_rank.bank(command.bank());

        let mut ready = now as i64;
        for prev in CommandKind::ALL {
            if let (Some(last), Some(gap)) = (
                home_bank.last_scheduled(prev),
                matrix.gap(prev, next, Location::SameBank),
            ) {
                ready = ready.max(last as i64 + gap);
            }
            if let (Some(last), Some(gap)) = (
                home_rank.last_scheduled(prev),
                matrix.gap(prev, next, Location::SameRankDifferentBank),
            ) {
                ready = ready.max(last as i64 + gap);
            }
            for (r, rank) in self.ranks.iter().enumerate() {
                if r == command.rank() {
                    continue;
                }
                if let (Some(last), Some(gap)) = (
                    rank.last_scheduled(prev),
                    matrix.gap(prev, next, Location::DifferentRank),
                ) {
                    ready = ready.max(last as i64 + gap);
                }
            }
        }
        ready as u64
    }

    /// Dispatches the head command of `(rank, bank)` at `now`.
    ///
    /// Records the dispatch in the bank's and the rank's last-scheduled
    /// tables and hands the command back for completion scheduling.
    pub fn dispatch(&mut self, rank: usize, bank: usize, now: u64) -> Command {
        let command = self.ranks[rank].bank_mut(bank).run_front_command(now);
        self.ranks[rank].note_scheduled(command.kind(), now);
        self.outstanding -= 1;
        command
    }
}
