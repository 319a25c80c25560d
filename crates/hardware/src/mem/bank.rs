//! Bank row-buffer state machine and request decomposition.
//!
//! A bank is the smallest independently addressable unit: it can hold at
//! most one open row. Incoming requests are decomposed into the protocol
//! commands needed to serve them given the bank's row state, and queued in
//! FIFO order until the channel's dispatch loop drains them.

use std::collections::VecDeque;
use std::rc::Rc;

use log::trace;

use crate::config::PagePolicy;
use crate::mem::command::{Command, CommandKind};
use crate::mem::request::{AccessKind, Request};
use crate::stats::SimStats;

/// One DRAM bank: a command queue plus open/closed row state.
#[derive(Debug)]
pub struct Bank {
    id: usize,
    rank: usize,
    queue: VecDeque<Command>,
    current_active_row: Option<u64>,
    future_active_row: Option<u64>,
    last_scheduled: [Option<u64>; CommandKind::COUNT],
}

impl Bank {
    pub fn new(id: usize, rank: usize) -> Self {
        Self {
            id,
            rank,
            queue: VecDeque::new(),
            current_active_row: None,
            future_active_row: None,
            last_scheduled: [None; CommandKind::COUNT],
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Index of the owning rank within its channel.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The row currently held open, if any.
    pub fn current_active_row(&self) -> Option<u64> {
        self.current_active_row
    }

    /// The row that will be open once the queue drains, if any.
    pub fn future_active_row(&self) -> Option<u64> {
        self.future_active_row
    }

    /// Head of the command queue.
    pub fn head(&self) -> Option<&Command> {
        self.queue.front()
    }

    /// Commands queued and not yet dispatched.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queued commands in dispatch order.
    pub fn queue(&self) -> impl Iterator<Item = &Command> {
        self.queue.iter()
    }

    /// Cycle of the last dispatched command of `kind` on this bank.
    pub fn last_scheduled(&self, kind: CommandKind) -> Option<u64> {
        self.last_scheduled[kind.index()]
    }

    /// Decomposes `request` into protocol commands and queues them.
    ///
    /// Row state drives the structural commands: a precharged bank needs an
    /// Activate, an open bank on the wrong row needs a Precharge and an
    /// Activate, an open bank on the right row needs nothing. The access
    /// command itself always follows, and a Closed page policy appends a
    /// trailing Precharge. Returns the number of commands enqueued.
    ///
    /// # Panics
    ///
    /// Panics if the structural commands leave `future_active_row` out of
    /// step with the requested row. That cannot result from bad input and
    /// would corrupt every timing decision after it.
    pub fn process_request(
        &mut self,
        request: &Rc<Request>,
        now: u64,
        policy: PagePolicy,
        next_id: &mut u64,
        stats: &mut SimStats,
    ) -> usize {
        let row = request.address().row();
        let before = self.queue.len();

        match self.future_active_row {
            None => {
                stats.row_misses += 1;
                self.enqueue(CommandKind::Activate, request, now, next_id);
                self.future_active_row = Some(row);
            }
            Some(open) if open != row => {
                stats.row_misses += 1;
                self.enqueue(CommandKind::Precharge, request, now, next_id);
                self.enqueue(CommandKind::Activate, request, now, next_id);
                self.future_active_row = Some(row);
            }
            Some(_) => {
                stats.row_hits += 1;
            }
        }

        if self.future_active_row != Some(row) {
            panic!(
                "bank {}.{}: future active row {:?} does not match requested row {} after decomposition",
                self.rank, self.id, self.future_active_row, row
            );
        }

        let access = match request.kind() {
            AccessKind::Read => CommandKind::Read,
            AccessKind::Write => CommandKind::Write,
        };
        self.enqueue(access, request, now, next_id);

        if policy == PagePolicy::Closed {
            self.enqueue(CommandKind::Precharge, request, now, next_id);
            self.future_active_row = None;
        }

        self.queue.len() - before
    }

    fn enqueue(&mut self, kind: CommandKind, request: &Rc<Request>, now: u64, next_id: &mut u64) {
        let id = *next_id;
        *next_id += 1;
        request.begin_command();
        trace!(
            "bank {}.{}: enqueue {} #{} for {:#x} at cycle {}",
            self.rank,
            self.id,
            kind,
            id,
            request.address().encoded(),
            now
        );
        self.queue
            .push_back(Command::new(id, kind, Rc::clone(request), self.rank, self.id, now));
    }

    /// Pops the head command and records it as dispatched at `now`.
    ///
    /// Row bookkeeping happens here: an Activate opens its row, a Precharge
    /// closes the bank. The caller owns completion scheduling.
    pub fn run_front_command(&mut self, now: u64) -> Command {
        let command = self
            .queue
            .pop_front()
            .expect("dispatch from an empty bank queue");
        self.note_scheduled(command.kind(), now);
        match command.kind() {
            CommandKind::Activate => self.current_active_row = Some(command.row()),
            CommandKind::Precharge => self.current_active_row = None,
            CommandKind::Read | CommandKind::Write => {}
        }
        command
    }

    pub(crate) fn note_scheduled(&mut self, kind: CommandKind, cycle: u64) {
        self.last_scheduled[kind.index()] = Some(cycle);
    }
}
