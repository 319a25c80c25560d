//! Memory controller: timing tables, request routing and the dispatch
//! loops.
//!
//! The controller derives its constraint matrix and duration table from
//! the configured timing parameters at construction, queues incoming
//! requests, and hosts the two self-re-arming loops of the model: the
//! request processor, which routes one request per cycle to its target
//! bank, and the per-channel scheduler loop, which dispatches commands as
//! their timing constraints allow. Both loops re-arm by scheduling a
//! future event and returning, never by recursing.

use std::collections::VecDeque;
use std::rc::Rc;

use log::{debug, trace};

use crate::common::error::ConfigError;
use crate::config::{ControllerConfig, GeometryConfig, PagePolicy};
use crate::mem::command::CommandRecord;
use crate::mem::channel::Channel;
use crate::mem::request::Request;
use crate::mem::timing::{CommandDurations, TimingMatrix, TimingParameters};
use crate::sim::engine::{Event, EventQueue};
use crate::stats::SimStats;

/// One memory controller and everything beneath it.
#[derive(Debug)]
pub struct Controller {
    id: usize,
    name: String,
    geometry: GeometryConfig,
    page_policy: PagePolicy,
    channels: Vec<Channel>,
    incoming: VecDeque<Rc<Request>>,
    timings: TimingMatrix,
    durations: CommandDurations,
    parameters: TimingParameters,
    armed: bool,
    next_command_id: u64,
}

impl Controller {
    /// Builds a controller from its configuration section.
    pub fn new(id: usize, config: &ControllerConfig) -> Result<Self, ConfigError> {
        let parameters = config.resolve_timing(id)?;
        let geometry = config.geometry.clone();
        let channels = (0..geometry.num_channels)
            .map(|c| {
                Channel::new(
                    c,
                    id,
                    geometry.num_ranks,
                    geometry.num_banks,
                    config.scheduler,
                )
            })
            .collect();
        Ok(Self {
            id,
            name: config.display_name(id),
            timings: TimingMatrix::derive(&parameters),
            durations: CommandDurations::derive(&parameters),
            parameters,
            geometry,
            page_policy: config.page_policy,
            channels,
            incoming: VecDeque::new(),
            armed: false,
            next_command_id: 0,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    pub fn page_policy(&self) -> PagePolicy {
        self.page_policy
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn timings(&self) -> &TimingMatrix {
        &self.timings
    }

    pub fn durations(&self) -> &CommandDurations {
        &self.durations
    }

    pub fn parameters(&self) -> &TimingParameters {
        &self.parameters
    }

    /// Requests accepted but not yet routed to a bank.
    pub fn backlog(&self) -> usize {
        self.incoming.len()
    }

    /// Queues an incoming request for the request processor.
    pub fn push_request(&mut self, request: Rc<Request>) {
        self.incoming.push_back(request);
    }

    /// Marks the request processor armed; returns `true` if it was idle
    /// and an event must be scheduled.
    pub fn arm_processor(&mut self) -> bool {
        if self.armed {
            false
        } else {
            self.armed = true;
            true
        }
    }

    /// Request-processor body: routes one request to its target bank.
    ///
    /// The address was decoded and validated at the system entry point, so
    /// routing is a straight index into the hierarchy. While the incoming
    /// queue is non-empty the processor re-arms itself one cycle out;
    /// otherwise it disarms until the next request arrives.
    pub fn process_one(&mut self, events: &mut EventQueue, stats: &mut SimStats) {
        let now = events.now();
        let Some(request) = self.incoming.pop_front() else {
            self.armed = false;
            return;
        };

        let addr = request.address();
        let (c, r, b) = (
            addr.logical() as usize,
            addr.rank() as usize,
            addr.bank() as usize,
        );
        debug!(
            "{}: route {:#x} to channel {} rank {} bank {} at cycle {}",
            self.name,
            addr.encoded(),
            c,
            r,
            b,
            now
        );

        let Self {
            id,
            page_policy,
            channels,
            next_command_id,
            ..
        } = self;
        let channel = &mut channels[c];
        let enqueued = channel.rank_mut(r).bank_mut(b).process_request(
            &request,
            now,
            *page_policy,
            next_command_id,
            stats,
        );
        channel.add_outstanding(enqueued);
        stats.commands_enqueued += enqueued as u64;

        if channel.try_arm_scheduler() {
            events.schedule(
                0,
                Event::RunScheduler {
                    controller: *id,
                    channel: c,
                },
            );
        }

        if self.incoming.is_empty() {
            self.armed = false;
        } else {
            events.schedule(1, Event::ProcessRequests { controller: self.id });
        }
    }

    /// Scheduler-loop body for one channel.
    ///
    /// Asks the channel's scheduler for a candidate bank and resolves its
    /// head command's ready cycle. A ready command is dispatched and the
    /// loop re-arms one cycle later; a not-yet-ready command re-arms the
    /// loop at its ready cycle instead of polling every cycle. With no
    /// outstanding work the loop disarms until a new command is enqueued.
    pub fn run_scheduler(
        &mut self,
        channel: usize,
        events: &mut EventQueue,
        stats: &mut SimStats,
        record: Option<&mut Vec<CommandRecord>>,
    ) {
        let now = events.now();
        let Self {
            id,
            channels,
            timings,
            durations,
            ..
        } = self;
        let ch = &mut channels[channel];

        if ch.outstanding() == 0 {
            ch.disarm_scheduler();
            return;
        }
        let Some((r, b)) = ch.find_next() else {
            ch.disarm_scheduler();
            return;
        };

        let head = ch
            .rank(r)
            .bank(b)
            .head()
            .expect("scheduler proposed a bank with an empty queue");
        let ready = ch.ready_cycle(head, timings, now);

        if ready <= now {
            let command = ch.dispatch(r, b, now);
            debug_assert!(command.created_at() <= now);
            trace!(
                "mc{}.{}: dispatch {} #{} (rank {} bank {}) at cycle {}",
                id,
                channel,
                command.kind(),
                command.id(),
                r,
                b,
                now
            );
            stats.note_dispatch(command.kind());
            if let Some(records) = record {
                records.push(CommandRecord::new(&command, *id, channel, now));
            }
            events.schedule(durations.of(command.kind()), Event::CompleteCommand { command });
            events.schedule(
                1,
                Event::RunScheduler {
                    controller: *id,
                    channel,
                },
            );
        } else {
            events.schedule(
                ready - now,
                Event::RunScheduler {
                    controller: *id,
                    channel,
                },
            );
        }
    }
}
