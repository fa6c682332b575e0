//! Row partitioning into full blocks and a remainder.

use core::ops::Range;

/// Split of a row of length `k` into `full_blocks` blocks of
/// `block_size` plus a `remainder` in `[0, block_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// Elements per block.
    pub block_size: usize,
    /// Number of complete blocks (`k / block_size`).
    pub full_blocks: usize,
    /// Trailing elements that do not fill a block.
    pub remainder: usize,
}

impl Partition {
    /// Partition a row of `len` elements.
    ///
    /// # Panics
    /// Panics if `block_size` is zero.
    #[inline]
    pub const fn new(len: usize, block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be non-zero");
        let full_blocks = len / block_size;
        Partition {
            block_size,
            full_blocks,
            remainder: len - full_blocks * block_size,
        }
    }

    /// Number of records the row occupies (`ceil(len / block_size)`).
    #[inline]
    pub const fn block_count(&self) -> usize {
        self.full_blocks + (self.remainder > 0) as usize
    }

    /// True when the last block is partial and needs padding.
    #[inline]
    pub const fn has_remainder(&self) -> bool {
        self.remainder > 0
    }

    /// Elements covered by full blocks.
    #[inline]
    pub const fn full_len(&self) -> usize {
        self.full_blocks * self.block_size
    }

    /// Logical row length.
    #[inline]
    pub const fn row_len(&self) -> usize {
        self.full_len() + self.remainder
    }

    /// Element range of block `index`, clipped to the row.
    pub fn block_range(&self, index: usize) -> Range<usize> {
        let start = (index * self.block_size).min(self.row_len());
        let end = (start + self.block_size).min(self.row_len());
        start..end
    }

    /// Element range of the remainder; empty when the row is block aligned.
    pub fn tail_range(&self) -> Range<usize> {
        self.full_len()..self.row_len()
    }
}
