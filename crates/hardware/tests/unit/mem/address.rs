//! Address codec tests.

use dramsim::mem::address::{Address, AddressSizes, ceil_log2};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn ceil_log2_matches_hand_values() {
    assert_eq!(ceil_log2(0), 0);
    assert_eq!(ceil_log2(1), 0);
    assert_eq!(ceil_log2(2), 1);
    assert_eq!(ceil_log2(3), 2);
    assert_eq!(ceil_log2(4), 2);
    assert_eq!(ceil_log2(5), 3);
    assert_eq!(ceil_log2(1024), 10);
    assert_eq!(ceil_log2(1025), 11);
}

#[test]
fn widths_come_from_counts() {
    let sizes = AddressSizes::from_counts(4, 2, 2, 8, 16384, 1024);
    assert_eq!(sizes.physical, 2);
    assert_eq!(sizes.logical, 1);
    assert_eq!(sizes.rank, 1);
    assert_eq!(sizes.bank, 3);
    assert_eq!(sizes.row, 14);
    assert_eq!(sizes.column, 10);
    assert_eq!(sizes.total_bits(), 31);
}

#[test]
fn fields_are_sliced_least_significant_first() {
    let sizes = AddressSizes::from_counts(2, 2, 2, 4, 16, 8);
    // column 3 bits, row 4 bits, bank 2 bits, rank 1, logical 1, physical 1.
    let encoded = 0b1_0_1_10_0110_101;
    let address = Address::decode(encoded, &sizes);
    assert_eq!(address.column(), 0b101);
    assert_eq!(address.row(), 0b0110);
    assert_eq!(address.bank(), 0b10);
    assert_eq!(address.rank(), 0b1);
    assert_eq!(address.logical(), 0b0);
    assert_eq!(address.physical(), 0b1);
    assert_eq!(address.encoded(), encoded);
}

#[test]
fn zero_width_fields_decode_to_zero() {
    // Single controller, single channel: those fields take no bits.
    let sizes = AddressSizes::from_counts(1, 1, 2, 8, 64, 64);
    let address = Address::decode(0x3F, &sizes);
    assert_eq!(address.physical(), 0);
    assert_eq!(address.logical(), 0);
    assert_eq!(address.column(), 0x3F);
}

#[test]
fn contains_rejects_bits_above_the_total_width() {
    let sizes = AddressSizes::from_counts(1, 1, 2, 4, 16, 8);
    assert_eq!(sizes.total_bits(), 10);
    assert!(sizes.contains(0x3FF));
    assert!(!sizes.contains(0x400));
}

proptest! {
    #[test]
    fn encode_decode_round_trips(
        physical in 0u64..4,
        logical in 0u64..2,
        rank in 0u64..2,
        bank in 0u64..8,
        row in 0u64..16384,
        column in 0u64..1024,
    ) {
        let sizes = AddressSizes::from_counts(4, 2, 2, 8, 16384, 1024);
        let encoded = Address::encode(&sizes, physical, logical, rank, bank, row, column);
        let address = Address::decode(encoded, &sizes);
        prop_assert_eq!(address.physical(), physical);
        prop_assert_eq!(address.logical(), logical);
        prop_assert_eq!(address.rank(), rank);
        prop_assert_eq!(address.bank(), bank);
        prop_assert_eq!(address.row(), row);
        prop_assert_eq!(address.column(), column);
    }
}
