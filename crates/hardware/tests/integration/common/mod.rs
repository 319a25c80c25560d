//! Shared harness for integration tests.

use dramsim::config::{
    Config, ControllerConfig, GeneralConfig, GeometryConfig, PagePolicy, SchedulerPolicy,
};
use dramsim::mem::address::Address;
use dramsim::mem::command::{CommandKind, CommandRecord};
use dramsim::mem::system::System;
use dramsim::mem::timing::TimingParameters;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A geometry small enough to reason about by hand.
pub fn small_geometry() -> GeometryConfig {
    GeometryConfig {
        num_channels: 1,
        num_ranks: 2,
        num_banks: 4,
        num_rows: 64,
        num_columns: 64,
        num_bits: 8,
    }
}

/// Timing values chosen so every scenario gap is hand-computable.
pub fn tight_timing() -> TimingParameters {
    TimingParameters {
        t_rc: 8,
        t_rrd: 1,
        t_rp: 3,
        t_rfc: 64,
        t_ccd: 1,
        t_rtrs: 4,
        t_cwd: 1,
        t_wtr: 1,
        t_cas: 3,
        t_rcd: 2,
        t_ost: 1,
        t_ras: 5,
        t_wr: 2,
        t_rtp: 1,
        t_burst: 8,
    }
}

/// Single-controller configuration with command recording enabled.
pub fn config(
    page_policy: PagePolicy,
    scheduler: SchedulerPolicy,
    timing: TimingParameters,
) -> Config {
    Config {
        general: GeneralConfig {
            record_commands: true,
            frequency_mhz: 800,
        },
        controllers: vec![ControllerConfig {
            name: None,
            geometry: small_geometry(),
            page_policy,
            scheduler,
            timing_profile: None,
            timing: Some(timing),
        }],
    }
}

pub fn build(config: &Config) -> System {
    init_logging();
    System::new(config).expect("valid test configuration")
}

/// Encodes `(rank, bank, row, column)` for a single-controller system.
pub fn addr(system: &System, rank: u64, bank: u64, row: u64, column: u64) -> u64 {
    Address::encode(system.address_sizes(), 0, 0, rank, bank, row, column)
}

pub fn kinds(records: &[CommandRecord]) -> Vec<CommandKind> {
    records.iter().map(|record| record.kind).collect()
}

/// Records of one kind, in dispatch order.
pub fn of_kind(records: &[CommandRecord], kind: CommandKind) -> Vec<CommandRecord> {
    records
        .iter()
        .filter(|record| record.kind == kind)
        .cloned()
        .collect()
}
