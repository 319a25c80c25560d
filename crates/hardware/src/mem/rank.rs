//! Rank: a fixed set of banks plus cross-bank timing bookkeeping.

use crate::mem::bank::Bank;
use crate::mem::command::CommandKind;

/// One rank of DRAM devices.
///
/// Mirrors the per-kind last-scheduled table at rank granularity so the
/// channel can resolve same-rank and cross-rank constraints without
/// walking every bank.
#[derive(Debug)]
pub struct Rank {
    id: usize,
    banks: Vec<Bank>,
    last_scheduled: [Option<u64>; CommandKind::COUNT],
}

impl Rank {
    pub fn new(id: usize, num_banks: usize) -> Self {
        Self {
            id,
            banks: (0..num_banks).map(|b| Bank::new(b, id)).collect(),
            last_scheduled: [None; CommandKind::COUNT],
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn bank(&self, index: usize) -> &Bank {
        &self.banks[index]
    }

    pub fn bank_mut(&mut self, index: usize) -> &mut Bank {
        &mut self.banks[index]
    }

    /// Cycle of the last dispatched command of `kind` on any bank of this
    /// rank.
    pub fn last_scheduled(&self, kind: CommandKind) -> Option<u64> {
        self.last_scheduled[kind.index()]
    }

    pub(crate) fn note_scheduled(&mut self, kind: CommandKind, cycle: u64) {
        self.last_scheduled[kind.index()] = Some(cycle);
    }

    /// Commands queued across all banks of this rank.
    pub fn pending(&self) -> usize {
        self.banks.iter().map(Bank::pending).sum()
    }
}
