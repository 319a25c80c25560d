//! Simulation statistics collection and reporting.

use std::time::Instant;

use crate::mem::command::CommandKind;
use crate::mem::request::AccessKind;

/// Counters accumulated over one simulation run.
pub struct SimStats {
    start_time: Instant,

    pub reads_issued: u64,
    pub writes_issued: u64,
    pub requests_retired: u64,

    pub commands_enqueued: u64,
    pub commands_completed: u64,

    pub precharges: u64,
    pub activates: u64,
    pub column_reads: u64,
    pub column_writes: u64,

    pub row_hits: u64,
    pub row_misses: u64,
}

impl SimStats {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            reads_issued: 0,
            writes_issued: 0,
            requests_retired: 0,
            commands_enqueued: 0,
            commands_completed: 0,
            precharges: 0,
            activates: 0,
            column_reads: 0,
            column_writes: 0,
            row_hits: 0,
            row_misses: 0,
        }
    }

    pub(crate) fn note_request(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Read => self.reads_issued += 1,
            AccessKind::Write => self.writes_issued += 1,
        }
    }

    pub(crate) fn note_dispatch(&mut self, kind: CommandKind) {
        match kind {
            CommandKind::Precharge => self.precharges += 1,
            CommandKind::Activate => self.activates += 1,
            CommandKind::Read => self.column_reads += 1,
            CommandKind::Write => self.column_writes += 1,
        }
    }

    pub fn commands_dispatched(&self) -> u64 {
        self.precharges + self.activates + self.column_reads + self.column_writes
    }

    /// Prints a run summary to stdout.
    pub fn print(&self, cycles: u64, frequency_mhz: u64) {
        let simulated_us = cycles as f64 / frequency_mhz as f64;
        println!();
        println!("=== simulation summary ===");
        println!("cycles simulated     : {cycles}");
        println!("simulated time       : {simulated_us:.3} us @ {frequency_mhz} MHz");
        println!(
            "requests             : {} reads, {} writes, {} retired",
            self.reads_issued, self.writes_issued, self.requests_retired
        );
        println!(
            "commands             : {} enqueued, {} dispatched, {} completed",
            self.commands_enqueued,
            self.commands_dispatched(),
            self.commands_completed
        );
        println!(
            "  precharge/activate : {} / {}",
            self.precharges, self.activates
        );
        println!(
            "  column read/write  : {} / {}",
            self.column_reads, self.column_writes
        );
        let lookups = self.row_hits + self.row_misses;
        if lookups > 0 {
            println!(
                "row buffer           : {} hits, {} misses ({:.1}% hit rate)",
                self.row_hits,
                self.row_misses,
                100.0 * self.row_hits as f64 / lookups as f64
            );
        }
        println!("host time            : {:.2?}", self.start_time.elapsed());
    }
}

impl Default for SimStats {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimStats")
            .field("reads_issued", &self.reads_issued)
            .field("writes_issued", &self.writes_issued)
            .field("requests_retired", &self.requests_retired)
            .field("commands_enqueued", &self.commands_enqueued)
            .field("commands_completed", &self.commands_completed)
            .field("row_hits", &self.row_hits)
            .field("row_misses", &self.row_misses)
            .finish()
    }
}
