//! JEDEC timing parameters and the derived command-constraint tables.
//!
//! A [`TimingParameters`] record holds the 15 named timing constants of a
//! DRAM part. From it a controller derives two tables:
//! [`TimingMatrix`], the minimum cycle gap required between two commands
//! given their kinds and relative location, and [`CommandDurations`], the
//! fixed cycle count each command occupies once dispatched.

use serde::Deserialize;

use crate::mem::command::CommandKind;

/// The 15 JEDEC-style timing constants, in command-clock cycles.
///
/// `t_rfc` (refresh cycle time) is parsed and carried so profiles stay
/// complete, but no refresh commands are ever generated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingParameters {
    /// Row cycle: activate-to-activate on the same bank.
    #[serde(default = "profiles::ddr3_1600_t_rc")]
    pub t_rc: u64,

    /// Activate-to-activate across banks of the same rank.
    #[serde(default = "profiles::ddr3_1600_t_rrd")]
    pub t_rrd: u64,

    /// Row precharge time.
    #[serde(default = "profiles::ddr3_1600_t_rp")]
    pub t_rp: u64,

    /// Refresh cycle time. Recognized but never scheduled.
    #[serde(default = "profiles::ddr3_1600_t_rfc")]
    pub t_rfc: u64,

    /// Column-to-column delay.
    #[serde(default = "profiles::ddr3_1600_t_ccd")]
    pub t_ccd: u64,

    /// Rank-to-rank switching time.
    #[serde(default = "profiles::ddr3_1600_t_rtrs")]
    pub t_rtrs: u64,

    /// Column write delay (write command to first data).
    #[serde(default = "profiles::ddr3_1600_t_cwd")]
    pub t_cwd: u64,

    /// Write-to-read turnaround.
    #[serde(default = "profiles::ddr3_1600_t_wtr")]
    pub t_wtr: u64,

    /// Column access strobe latency.
    #[serde(default = "profiles::ddr3_1600_t_cas")]
    pub t_cas: u64,

    /// Row-to-column delay (activate to first column command).
    #[serde(default = "profiles::ddr3_1600_t_rcd")]
    pub t_rcd: u64,

    /// On-die-termination switching time.
    #[serde(default = "profiles::ddr3_1600_t_ost")]
    pub t_ost: u64,

    /// Row active time (activate to precharge).
    #[serde(default = "profiles::ddr3_1600_t_ras")]
    pub t_ras: u64,

    /// Write recovery time.
    #[serde(default = "profiles::ddr3_1600_t_wr")]
    pub t_wr: u64,

    /// Read-to-precharge delay.
    #[serde(default = "profiles::ddr3_1600_t_rtp")]
    pub t_rtp: u64,

    /// Data burst length on the command bus.
    #[serde(default = "profiles::ddr3_1600_t_burst")]
    pub t_burst: u64,
}

mod profiles {
    pub fn ddr3_1600_t_rc() -> u64 {
        49
    }
    pub fn ddr3_1600_t_rrd() -> u64 {
        5
    }
    pub fn ddr3_1600_t_rp() -> u64 {
        11
    }
    pub fn ddr3_1600_t_rfc() -> u64 {
        128
    }
    pub fn ddr3_1600_t_ccd() -> u64 {
        4
    }
    pub fn ddr3_1600_t_rtrs() -> u64 {
        1
    }
    pub fn ddr3_1600_t_cwd() -> u64 {
        5
    }
    pub fn ddr3_1600_t_wtr() -> u64 {
        6
    }
    pub fn ddr3_1600_t_cas() -> u64 {
        11
    }
    pub fn ddr3_1600_t_rcd() -> u64 {
        11
    }
    pub fn ddr3_1600_t_ost() -> u64 {
        1
    }
    pub fn ddr3_1600_t_ras() -> u64 {
        28
    }
    pub fn ddr3_1600_t_wr() -> u64 {
        12
    }
    pub fn ddr3_1600_t_rtp() -> u64 {
        6
    }
    pub fn ddr3_1600_t_burst() -> u64 {
        4
    }
}

impl TimingParameters {
    /// DDR3-1600 (11-11-11-28) at the 800 MHz command clock.
    pub fn ddr3_1600() -> Self {
        Self {
            t_rc: profiles::ddr3_1600_t_rc(),
            t_rrd: profiles::ddr3_1600_t_rrd(),
            t_rp: profiles::ddr3_1600_t_rp(),
            t_rfc: profiles::ddr3_1600_t_rfc(),
            t_ccd: profiles::ddr3_1600_t_ccd(),
            t_rtrs: profiles::ddr3_1600_t_rtrs(),
            t_cwd: profiles::ddr3_1600_t_cwd(),
            t_wtr: profiles::ddr3_1600_t_wtr(),
            t_cas: profiles::ddr3_1600_t_cas(),
            t_rcd: profiles::ddr3_1600_t_rcd(),
            t_ost: profiles::ddr3_1600_t_ost(),
            t_ras: profiles::ddr3_1600_t_ras(),
            t_wr: profiles::ddr3_1600_t_wr(),
            t_rtp: profiles::ddr3_1600_t_rtp(),
            t_burst: profiles::ddr3_1600_t_burst(),
        }
    }

    /// Looks up a named timing profile.
    pub fn profile(name: &str) -> Option<Self> {
        match name {
            "DDR3_1600" => Some(Self::ddr3_1600()),
            _ => None,
        }
    }
}

impl Default for TimingParameters {
    fn default() -> Self {
        Self::ddr3_1600()
    }
}

/// Relative location of two commands under the same channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Both commands target the same bank.
    SameBank,
    /// Same rank, different banks.
    SameRankDifferentBank,
    /// Different ranks.
    DifferentRank,
}

/// Minimum cycle gaps between command kinds by relative location.
///
/// Cells are indexed `[previous kind][next kind][rank relation][bank
/// relation]` with relation 0 = same, 1 = different. An unset cell means
/// no constraint between that pair at that location. Gaps are signed: some
/// derivations (write-to-read across banks) legitimately come out negative
/// and are clamped by the current cycle at lookup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingMatrix {
    cells: [[[[Option<i64>; 2]; 2]; CommandKind::COUNT]; CommandKind::COUNT],
}

const SAME: usize = 0;
const DIFFERENT: usize = 1;

impl TimingMatrix {
    /// Derives the full constraint matrix from a timing record.
    ///
    /// "Any" rules populate all four location cells for their command pair;
    /// the same-bank and different-bank rules then overwrite their specific
    /// cell.
    pub fn derive(p: &TimingParameters) -> Self {
        use CommandKind::{Activate, Precharge, Read, Write};

        let mut m = Self {
            cells: [[[[None; 2]; 2]; CommandKind::COUNT]; CommandKind::COUNT],
        };

        let burst_or_ccd = p.t_burst.max(p.t_ccd) as i64;

        // Activate
        m.set_same_bank(Activate, Activate, p.t_rc as i64);
        m.set_diff_bank(Activate, Activate, p.t_rrd as i64);
        m.set_same_bank(Precharge, Activate, p.t_rp as i64);
        m.set_same_bank(Activate, Read, p.t_rcd as i64);
        m.set_same_bank(Activate, Write, p.t_rcd as i64);

        // Read
        m.set_any(Read, Read, burst_or_ccd);
        m.set_diff_bank(Read, Read, (p.t_burst + p.t_rtrs) as i64);
        m.set_same_bank(Write, Read, (p.t_cwd + p.t_burst + p.t_wtr) as i64);
        m.set_diff_bank(
            Write,
            Read,
            (p.t_cwd + p.t_burst + p.t_rtrs) as i64 - p.t_cas as i64,
        );

        // Write
        m.set_any(
            Read,
            Write,
            (p.t_cas + p.t_burst + p.t_rtrs) as i64 - p.t_cwd as i64,
        );
        m.set_any(Write, Write, burst_or_ccd);
        m.set_diff_bank(Write, Write, (p.t_burst + p.t_ost) as i64);

        // Precharge
        m.set_same_bank(Activate, Precharge, p.t_ras as i64);
        m.set_same_bank(Read, Precharge, (p.t_burst + p.t_rtp) as i64 - p.t_ccd as i64);
        m.set_same_bank(Write, Precharge, (p.t_cwd + p.t_burst + p.t_wr) as i64);

        m
    }

    fn set_same_bank(&mut self, prev: CommandKind, next: CommandKind, gap: i64) {
        self.cells[prev.index()][next.index()][SAME][SAME] = Some(gap);
    }

    fn set_diff_bank(&mut self, prev: CommandKind, next: CommandKind, gap: i64) {
        self.cells[prev.index()][next.index()][SAME][DIFFERENT] = Some(gap);
    }

    fn set_any(&mut self, prev: CommandKind, next: CommandKind, gap: i64) {
        for rank_rel in [SAME, DIFFERENT] {
            for bank_rel in [SAME, DIFFERENT] {
                self.cells[prev.index()][next.index()][rank_rel][bank_rel] = Some(gap);
            }
        }
    }

    /// The minimum gap required after a `prev` command before a `next`
    /// command at the given relative location, or `None` when the pair is
    /// unconstrained there.
    pub fn gap(&self, prev: CommandKind, next: CommandKind, location: Location) -> Option<i64> {
        let (rank_rel, bank_rel) = match location {
            Location::SameBank => (SAME, SAME),
            Location::SameRankDifferentBank => (SAME, DIFFERENT),
            Location::DifferentRank => (DIFFERENT, DIFFERENT),
        };
        self.cells[prev.index()][next.index()][rank_rel][bank_rel]
    }
}

/// Fixed execution duration of each command kind, in cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDurations([u64; CommandKind::COUNT]);

impl CommandDurations {
    /// Derives the duration table from a timing record.
    pub fn derive(p: &TimingParameters) -> Self {
        let mut durations = [0; CommandKind::COUNT];
        durations[CommandKind::Precharge.index()] = p.t_rp;
        durations[CommandKind::Activate.index()] = p.t_rcd;
        durations[CommandKind::Read.index()] = p.t_cas + p.t_burst;
        durations[CommandKind::Write.index()] = p.t_cwd + p.t_burst + p.t_wtr;
        Self(durations)
    }

    /// Cycles a command of `kind` occupies once dispatched.
    pub fn of(&self, kind: CommandKind) -> u64 {
        self.0[kind.index()]
    }
}
