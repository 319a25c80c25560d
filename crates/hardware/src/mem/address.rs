//! Linear-address codec.
//!
//! A 64-bit linear address is split into six fields by successive
//! bit-slicing from the least-significant end: column, row, bank, rank,
//! logical (channel) and physical (controller). Field widths are fixed for
//! the lifetime of a system: each is the base-2 ceiling log of the largest
//! count of that unit across all controllers.

/// Per-field address bit widths, computed once per system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddressSizes {
    /// Bits selecting the controller.
    pub physical: u32,
    /// Bits selecting the channel within a controller.
    pub logical: u32,
    /// Bits selecting the rank within a channel.
    pub rank: u32,
    /// Bits selecting the bank within a rank.
    pub bank: u32,
    /// Bits selecting the row within a bank.
    pub row: u32,
    /// Bits selecting the column within a row.
    pub column: u32,
}

impl AddressSizes {
    /// Computes field widths from the maximum count of each unit across
    /// the whole system.
    pub fn from_counts(
        controllers: u64,
        channels: u64,
        ranks: u64,
        banks: u64,
        rows: u64,
        columns: u64,
    ) -> Self {
        Self {
            physical: ceil_log2(controllers),
            logical: ceil_log2(channels),
            rank: ceil_log2(ranks),
            bank: ceil_log2(banks),
            row: ceil_log2(rows),
            column: ceil_log2(columns),
        }
    }

    /// Total width of all six fields.
    pub fn total_bits(&self) -> u32 {
        self.physical + self.logical + self.rank + self.bank + self.row + self.column
    }

    /// Whether `encoded` fits within the total field width.
    pub fn contains(&self, encoded: u64) -> bool {
        let total = self.total_bits();
        total >= u64::BITS || encoded >> total == 0
    }
}

/// A decoded linear address.
///
/// Immutable once decoded; carries both the original encoded value and the
/// six sliced fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    encoded: u64,
    physical: u64,
    logical: u64,
    rank: u64,
    bank: u64,
    row: u64,
    column: u64,
}

impl Address {
    /// Slices `encoded` into fields, least-significant first.
    ///
    /// Performs no range validation; bits above the total field width are
    /// simply left over and must be rejected by the caller (the system
    /// entry point does this).
    pub fn decode(encoded: u64, sizes: &AddressSizes) -> Self {
        let mut rest = encoded;
        let column = take_field(&mut rest, sizes.column);
        let row = take_field(&mut rest, sizes.row);
        let bank = take_field(&mut rest, sizes.bank);
        let rank = take_field(&mut rest, sizes.rank);
        let logical = take_field(&mut rest, sizes.logical);
        let physical = take_field(&mut rest, sizes.physical);
        Self {
            encoded,
            physical,
            logical,
            rank,
            bank,
            row,
            column,
        }
    }

    /// Composes an encoded address from field values.
    ///
    /// Inverse of [`Address::decode`] for field values within the
    /// configured widths.
    pub fn encode(
        sizes: &AddressSizes,
        physical: u64,
        logical: u64,
        rank: u64,
        bank: u64,
        row: u64,
        column: u64,
    ) -> u64 {
        let mut encoded = physical;
        encoded = (encoded << sizes.logical) | logical;
        encoded = (encoded << sizes.rank) | rank;
        encoded = (encoded << sizes.bank) | bank;
        encoded = (encoded << sizes.row) | row;
        encoded = (encoded << sizes.column) | column;
        encoded
    }

    /// The original encoded value.
    pub fn encoded(&self) -> u64 {
        self.encoded
    }

    /// Controller index.
    pub fn physical(&self) -> u64 {
        self.physical
    }

    /// Channel index within the controller.
    pub fn logical(&self) -> u64 {
        self.logical
    }

    /// Rank index within the channel.
    pub fn rank(&self) -> u64 {
        self.rank
    }

    /// Bank index within the rank.
    pub fn bank(&self) -> u64 {
        self.bank
    }

    /// Row index within the bank.
    pub fn row(&self) -> u64 {
        self.row
    }

    /// Column index within the row.
    pub fn column(&self) -> u64 {
        self.column
    }
}

/// Extracts the low `width` bits of `*rest` and shifts them out.
fn take_field(rest: &mut u64, width: u32) -> u64 {
    if width == 0 {
        return 0;
    }
    if width >= u64::BITS {
        return std::mem::take(rest);
    }
    let value = *rest & ((1u64 << width) - 1);
    *rest >>= width;
    value
}

/// Smallest width in bits able to index `count` distinct values.
pub fn ceil_log2(count: u64) -> u32 {
    if count <= 1 {
        0
    } else {
        u64::BITS - (count - 1).leading_zeros()
    }
}
