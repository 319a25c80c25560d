//! Ready-cycle resolution tests.
//!
//! Drives a channel by hand: decompose requests into bank queues, dispatch
//! commands at chosen cycles and check the earliest legal cycle computed
//! for the next candidate.

use crate::common;
use dramsim::config::{PagePolicy, SchedulerPolicy};
use dramsim::mem::channel::Channel;
use dramsim::mem::request::AccessKind;
use dramsim::mem::timing::{TimingMatrix, TimingParameters};
use dramsim::stats::SimStats;
use pretty_assertions::assert_eq;

fn channel() -> Channel {
    Channel::new(0, 0, 2, 4, SchedulerPolicy::OldestFirst)
}

fn enqueue(channel: &mut Channel, kind: AccessKind, rank: u64, bank: u64, row: u64) {
    let request = common::request(kind, rank, bank, row, 0);
    let mut next_id = 0;
    let mut stats = SimStats::new();
    let n = channel
        .rank_mut(rank as usize)
        .bank_mut(bank as usize)
        .process_request(&request, 0, PagePolicy::Open, &mut next_id, &mut stats);
    channel.add_outstanding(n);
}

fn matrix() -> TimingMatrix {
    TimingMatrix::derive(&common::tight_timing())
}

#[test]
fn unconstrained_command_is_ready_now() {
    let mut ch = channel();
    enqueue(&mut ch, AccessKind::Read, 0, 0, 5);
    let matrix = matrix();

    let head = ch.rank(0).bank(0).head().unwrap();
    assert_eq!(ch.ready_cycle(head, &matrix, 0), 0);
    assert_eq!(ch.ready_cycle(head, &matrix, 7), 7);
}

#[test]
fn read_waits_for_activate_on_the_same_bank() {
    let mut ch = channel();
    enqueue(&mut ch, AccessKind::Read, 0, 0, 5);
    let matrix = matrix();
    let t = common::tight_timing();

    ch.dispatch(0, 0, 0); // Activate at cycle 0
    let head = ch.rank(0).bank(0).head().unwrap();
    assert_eq!(ch.ready_cycle(head, &matrix, 1), t.t_rcd);
}

#[test]
fn read_waits_for_a_read_on_a_sibling_bank() {
    let mut ch = channel();
    enqueue(&mut ch, AccessKind::Read, 0, 0, 5);
    enqueue(&mut ch, AccessKind::Read, 0, 1, 5);
    let matrix = matrix();
    let t = common::tight_timing();

    ch.dispatch(0, 0, 0); // bank 0 Activate
    ch.dispatch(0, 0, t.t_rcd); // bank 0 Read
    ch.dispatch(0, 1, t.t_rcd + 1); // bank 1 Activate

    // Bank 1's Read is gated by the sibling-bank read gap, not by its own
    // Activate.
    let head = ch.rank(0).bank(1).head().unwrap();
    let expected = t.t_rcd + t.t_burst + t.t_rtrs;
    assert_eq!(ch.ready_cycle(head, &matrix, t.t_rcd + 2), expected);
}

#[test]
fn cross_rank_gaps_use_the_any_rows_only() {
    let mut ch = channel();
    enqueue(&mut ch, AccessKind::Write, 0, 0, 5);
    enqueue(&mut ch, AccessKind::Read, 1, 0, 5);
    let t = common::tight_timing();
    let matrix = matrix();

    ch.dispatch(0, 0, 0); // rank 0 Activate
    ch.dispatch(0, 0, t.t_rcd); // rank 0 Write
    ch.dispatch(1, 0, t.t_rcd + 1); // rank 1 Activate

    // Write-to-Read has no cross-rank entry, so rank 1's Read sees only
    // its own Activate.
    let head = ch.rank(1).bank(0).head().unwrap();
    assert_eq!(
        ch.ready_cycle(head, &matrix, t.t_rcd + 2),
        t.t_rcd + 1 + t.t_rcd
    );
}

#[test]
fn activate_spacing_within_a_rank_uses_trrd() {
    let mut ch = channel();
    enqueue(&mut ch, AccessKind::Read, 0, 0, 5);
    enqueue(&mut ch, AccessKind::Read, 0, 1, 5);
    let mut p = common::tight_timing();
    p.t_rrd = 6;
    let matrix = TimingMatrix::derive(&p);

    ch.dispatch(0, 0, 0); // bank 0 Activate
    let head = ch.rank(0).bank(1).head().unwrap();
    assert_eq!(ch.ready_cycle(head, &matrix, 1), 6);
}

#[test]
fn negative_gaps_are_clamped_by_the_current_cycle() {
    // Write-to-Read across banks derives tCWD + tBURST + tRTRS - tCAS,
    // which is negative here. The constraint must never pull the ready
    // cycle below now.
    let p = TimingParameters {
        t_cas: 20,
        ..common::tight_timing()
    };
    let matrix = TimingMatrix::derive(&p);

    let mut ch = channel();
    enqueue(&mut ch, AccessKind::Write, 0, 0, 5);
    enqueue(&mut ch, AccessKind::Read, 0, 1, 5);

    ch.dispatch(0, 0, 0); // bank 0 Activate
    ch.dispatch(0, 0, p.t_rcd); // bank 0 Write
    ch.dispatch(0, 1, p.t_rcd + 1); // bank 1 Activate

    let head = ch.rank(0).bank(1).head().unwrap();
    let now = p.t_rcd + 1 + p.t_rcd;
    assert_eq!(ch.ready_cycle(head, &matrix, now), now);
}
