//! Top-level system: owns the controllers, the event queue and the
//! caller-facing entry points.
//!
//! A `System` is built once from a validated [`Config`] and threaded
//! through explicitly wherever it is needed. Construction computes the
//! global address field widths from the maximum component counts across
//! all controllers, so every address decoded afterwards sees the same
//! layout.

use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::common::error::{AccessError, ConfigError};
use crate::config::Config;
use crate::mem::address::{Address, AddressSizes};
use crate::mem::command::CommandRecord;
use crate::mem::controller::Controller;
use crate::mem::request::{AccessKind, Request};
use crate::sim::engine::{Event, EventQueue};
use crate::stats::SimStats;

/// The whole simulated memory subsystem.
#[derive(Debug)]
pub struct System {
    controllers: Vec<Controller>,
    sizes: AddressSizes,
    events: EventQueue,
    stats: SimStats,
    record_commands: bool,
    records: Vec<CommandRecord>,
}

impl System {
    /// Builds the subsystem described by `config`.
    ///
    /// Validates the configuration, constructs every controller, then
    /// derives the global address field widths. The widths must exist
    /// before any address is decoded, which this ordering guarantees.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let controllers = config
            .controllers
            .iter()
            .enumerate()
            .map(|(id, section)| Controller::new(id, section))
            .collect::<Result<Vec<_>, _>>()?;
        let sizes = address_sizes(&controllers);
        Ok(Self {
            controllers,
            sizes,
            events: EventQueue::new(),
            stats: SimStats::new(),
            record_commands: config.general.record_commands,
            records: Vec::new(),
        })
    }

    /// The global address field widths.
    pub fn address_sizes(&self) -> &AddressSizes {
        &self.sizes
    }

    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Commands dispatched so far, when recording is enabled.
    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    /// The current virtual cycle.
    pub fn now(&self) -> u64 {
        self.events.now()
    }

    /// Issues a read of `addr`.
    ///
    /// Returns the shared request handle; the caller can poll
    /// `is_complete`/`completed_at` on it as the simulation advances.
    pub fn read(&mut self, addr: u64) -> Result<Rc<Request>, AccessError> {
        self.access(AccessKind::Read, addr)
    }

    /// Issues a write of `addr`.
    pub fn write(&mut self, addr: u64) -> Result<Rc<Request>, AccessError> {
        self.access(AccessKind::Write, addr)
    }

    fn access(&mut self, kind: AccessKind, addr: u64) -> Result<Rc<Request>, AccessError> {
        let address = self.decode_checked(addr)?;
        let request = Request::new(kind, address);
        self.stats.note_request(kind);
        debug!(
            "accept {:?} {:#x} at cycle {}",
            kind,
            addr,
            self.events.now()
        );

        let physical = address.physical() as usize;
        let controller = &mut self.controllers[physical];
        controller.push_request(Rc::clone(&request));
        if controller.arm_processor() {
            self.events.schedule(
                0,
                Event::ProcessRequests {
                    controller: physical,
                },
            );
        }
        Ok(request)
    }

    /// Decodes `addr` and validates every field against the configured
    /// geometry. An out-of-range literal is rejected here rather than
    /// silently truncated by the field masks.
    fn decode_checked(&self, addr: u64) -> Result<Address, AccessError> {
        if !self.sizes.contains(addr) {
            return Err(AccessError::InvalidAddress {
                addr,
                field: "encoded bits",
                value: u64::BITS.saturating_sub(addr.leading_zeros()) as u64,
                limit: self.sizes.total_bits() as u64,
            });
        }
        let address = Address::decode(addr, &self.sizes);
        if address.physical() >= self.controllers.len() as u64 {
            return Err(AccessError::InvalidAddress {
                addr,
                field: "controller",
                value: address.physical(),
                limit: self.controllers.len() as u64,
            });
        }
        let geometry = self.controllers[address.physical() as usize].geometry();
        let checks = [
            ("channel", address.logical(), geometry.num_channels as u64),
            ("rank", address.rank(), geometry.num_ranks as u64),
            ("bank", address.bank(), geometry.num_banks as u64),
            ("row", address.row(), geometry.num_rows),
            ("column", address.column(), geometry.num_columns),
        ];
        for (field, value, limit) in checks {
            if value >= limit {
                return Err(AccessError::InvalidAddress {
                    addr,
                    field,
                    value,
                    limit,
                });
            }
        }
        Ok(address)
    }

    /// Fires the next pending event. Returns `false` when the queue is
    /// empty.
    pub fn step(&mut self) -> bool {
        let Some(event) = self.events.pop_next() else {
            return false;
        };
        self.dispatch(event);
        true
    }

    /// Fires every event due at or before `cycle`, then advances the clock
    /// to `cycle`.
    pub fn run_until(&mut self, cycle: u64) {
        while self.events.next_time().is_some_and(|t| t <= cycle) {
            self.step();
        }
        self.events.advance_to(cycle);
    }

    /// Runs until no events remain; returns the final cycle.
    pub fn run_to_idle(&mut self) -> u64 {
        while self.step() {}
        self.events.now()
    }

    fn dispatch(&mut self, event: Event) {
        match event {
            Event::ProcessRequests { controller } => {
                let Self {
                    controllers,
                    events,
                    stats,
                    ..
                } = self;
                controllers[controller].process_one(events, stats);
            }
            Event::RunScheduler {
                controller,
                channel,
            } => {
                let Self {
                    controllers,
                    events,
                    stats,
                    record_commands,
                    records,
                    ..
                } = self;
                let record = if *record_commands {
                    Some(&mut *records)
                } else {
                    None
                };
                controllers[controller].run_scheduler(channel, events, stats, record);
            }
            Event::CompleteCommand { command } => {
                let now = self.events.now();
                let retired = command.request().command_done(now);
                self.stats.commands_completed += 1;
                if retired {
                    self.stats.requests_retired += 1;
                    debug!(
                        "request {:#x} retired at cycle {}",
                        command.request().address().encoded(),
                        now
                    );
                }
            }
        }
    }
}

/// Global field widths: the ceiling log of the largest count of each unit
/// across all controllers.
fn address_sizes(controllers: &[Controller]) -> AddressSizes {
    let max = |f: fn(&Controller) -> u64| controllers.iter().map(f).max().unwrap_or(0);
    AddressSizes::from_counts(
        controllers.len() as u64,
        max(|c| c.geometry().num_channels as u64),
        max(|c| c.geometry().num_ranks as u64),
        max(|c| c.geometry().num_banks as u64),
        max(|c| c.geometry().num_rows),
        max(|c| c.geometry().num_columns),
    )
}

impl fmt::Display for System {
    /// Hierarchical debug dump of controller, channel, rank, bank and
    /// queue state. Not a stable format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "system: {} controller(s), cycle {}",
            self.controllers.len(),
            self.events.now()
        )?;
        for controller in &self.controllers {
            let g = controller.geometry();
            writeln!(
                f,
                "  {}: {}ch x {}rk x {}ba x {}row x {}col x {}bit ({} MiB), \
                 page policy {:?}, backlog {}",
                controller.name(),
                g.num_channels,
                g.num_ranks,
                g.num_banks,
                g.num_rows,
                g.num_columns,
                g.num_bits,
                g.capacity_bytes() >> 20,
                controller.page_policy(),
                controller.backlog(),
            )?;
            for channel in controller.channels() {
                writeln!(
                    f,
                    "    channel {}: {} outstanding",
                    channel.id(),
                    channel.outstanding()
                )?;
                for rank in channel.ranks() {
                    for bank in rank.banks() {
                        if bank.pending() == 0 && bank.current_active_row().is_none() {
                            continue;
                        }
                        write!(
                            f,
                            "      rank {} bank {}: row {:?} (future {:?}), queue [",
                            rank.id(),
                            bank.id(),
                            bank.current_active_row(),
                            bank.future_active_row()
                        )?;
                        for (i, command) in bank.queue().enumerate() {
                            if i > 0 {
                                write!(f, ", ")?;
                            }
                            write!(f, "{}#{}", command.kind(), command.id())?;
                        }
                        writeln!(f, "]")?;
                    }
                }
            }
        }
        Ok(())
    }
}
