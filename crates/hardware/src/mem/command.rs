//! DRAM protocol commands.

use std::fmt;
use std::rc::Rc;

use crate::mem::request::Request;

/// One DRAM protocol operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Close the bank's open row.
    Precharge,
    /// Open a row into the bank's row buffer.
    Activate,
    /// Column read from the open row.
    Read,
    /// Column write into the open row.
    Write,
}

impl CommandKind {
    /// Number of command kinds; sizes the timing tables.
    pub const COUNT: usize = 4;

    /// All kinds, in table order.
    pub const ALL: [CommandKind; CommandKind::COUNT] = [
        CommandKind::Precharge,
        CommandKind::Activate,
        CommandKind::Read,
        CommandKind::Write,
    ];

    /// Table index of this kind.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Precharge => "Precharge",
            CommandKind::Activate => "Activate",
            CommandKind::Read => "Read",
            CommandKind::Write => "Write",
        };
        f.write_str(name)
    }
}

/// One protocol operation derived from a request, bound to one bank.
///
/// Holds a shared handle on its request; the request stays alive until the
/// last of its commands completes, regardless of what the caller does with
/// its own handle.
#[derive(Debug)]
pub struct Command {
    id: u64,
    kind: CommandKind,
    request: Rc<Request>,
    rank: usize,
    bank: usize,
    created_at: u64,
}

impl Command {
    pub fn new(
        id: u64,
        kind: CommandKind,
        request: Rc<Request>,
        rank: usize,
        bank: usize,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            kind,
            request,
            rank,
            bank,
            created_at,
        }
    }

    /// Unique, monotonically increasing per controller.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn request(&self) -> &Rc<Request> {
        &self.request
    }

    /// Rank index within the owning channel.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Bank index within the rank.
    pub fn bank(&self) -> usize {
        self.bank
    }

    /// Cycle at which the command was enqueued.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Row targeted by the command's request.
    pub fn row(&self) -> u64 {
        self.request.address().row()
    }
}

/// Record of one dispatched command, kept when command recording is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub id: u64,
    pub kind: CommandKind,
    pub controller: usize,
    pub channel: usize,
    pub rank: usize,
    pub bank: usize,
    pub row: u64,
    pub created_at: u64,
    pub dispatched_at: u64,
}

impl CommandRecord {
    pub fn new(command: &Command, controller: usize, channel: usize, dispatched_at: u64) -> Self {
        Self {
            id: command.id(),
            kind: command.kind(),
            controller,
            channel,
            rank: command.rank(),
            bank: command.bank(),
            row: command.row(),
            created_at: command.created_at(),
            dispatched_at,
        }
    }
}
