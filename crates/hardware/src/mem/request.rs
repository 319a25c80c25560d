//! Read/write requests and their shared handles.
//!
//! A request is created at the system entry point and shared by reference
//! between the caller and every command it decomposes into. The in-flight
//! counter tracks commands that have been generated but not yet completed;
//! the request retires on the counter's single transition to zero.

use std::cell::Cell;
use std::rc::Rc;

use crate::mem::address::Address;

/// Direction of a memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// One read or write operation against a decoded address.
#[derive(Debug)]
pub struct Request {
    kind: AccessKind,
    address: Address,
    in_flight: Cell<u32>,
    completed_at: Cell<Option<u64>>,
}

impl Request {
    /// Wraps an access into a shared request handle.
    pub fn new(kind: AccessKind, address: Address) -> Rc<Self> {
        Rc::new(Self {
            kind,
            address,
            in_flight: Cell::new(0),
            completed_at: Cell::new(None),
        })
    }

    pub fn kind(&self) -> AccessKind {
        self.kind
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Commands generated but not yet completed.
    pub fn in_flight(&self) -> u32 {
        self.in_flight.get()
    }

    /// Whether every generated command has completed.
    pub fn is_complete(&self) -> bool {
        self.completed_at.get().is_some()
    }

    /// The cycle the last in-flight command completed, once retired.
    pub fn completed_at(&self) -> Option<u64> {
        self.completed_at.get()
    }

    /// Accounts for a newly generated command.
    pub(crate) fn begin_command(&self) {
        self.in_flight.set(self.in_flight.get() + 1);
    }

    /// Accounts for a completed command; returns `true` on the transition
    /// that retires the request.
    pub(crate) fn command_done(&self, now: u64) -> bool {
        let n = self.in_flight.get();
        assert!(n > 0, "command completion with no commands in flight");
        self.in_flight.set(n - 1);
        if n == 1 {
            debug_assert!(self.completed_at.get().is_none());
            self.completed_at.set(Some(now));
            true
        } else {
            false
        }
    }
}
