//! Scratch blocks for the partial tail of a row.
//!
//! Strategies only ever see full blocks. On encode the tail is copied
//! into a zero-padded scratch block; on decode the record is decoded into
//! a scratch block and only the valid prefix is copied out.

use lowbit_core::Scheme;

/// Largest block size of any scheme.
pub const MAX_BLOCK_SIZE: usize = max_block_size();

const fn max_block_size() -> usize {
    let t = Scheme::Ternary.block_size();
    let q = Scheme::Quaternary.block_size();
    if t > q {
        t
    } else {
        q
    }
}

/// Stack scratch buffer holding one block.
///
/// Local to a single row call; never shared between rows.
#[derive(Clone)]
pub struct ScratchBlock {
    buf: [f32; MAX_BLOCK_SIZE],
    len: usize,
}

impl ScratchBlock {
    /// Zero-filled scratch of `block_size` values.
    ///
    /// # Panics
    /// Panics if `block_size` exceeds [`MAX_BLOCK_SIZE`].
    pub fn zeroed(block_size: usize) -> Self {
        assert!(
            block_size <= MAX_BLOCK_SIZE,
            "block size {block_size} exceeds scratch capacity {MAX_BLOCK_SIZE}"
        );
        ScratchBlock {
            buf: [0.0; MAX_BLOCK_SIZE],
            len: block_size,
        }
    }

    /// Copy `tail` into a zero-padded block of `block_size` values.
    pub fn padded(tail: &[f32], block_size: usize) -> Self {
        debug_assert!(tail.len() < block_size, "tail must be a partial block");
        let mut scratch = Self::zeroed(block_size);
        scratch.buf[..tail.len()].copy_from_slice(tail);
        scratch
    }

    /// Full block view.
    pub fn as_slice(&self) -> &[f32] {
        &self.buf[..self.len]
    }

    /// Full block view, writable.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.buf[..self.len]
    }

    /// Copy the first `dst.len()` values into `dst`.
    pub fn copy_prefix_to(&self, dst: &mut [f32]) {
        dst.copy_from_slice(&self.buf[..dst.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_covers_all_schemes() {
        assert!(MAX_BLOCK_SIZE >= Scheme::Ternary.block_size());
        assert!(MAX_BLOCK_SIZE >= Scheme::Quaternary.block_size());
    }

    #[test]
    fn test_padded_tail() {
        let tail = [1.5f32, -2.0, 3.25];
        let scratch = ScratchBlock::padded(&tail, 32);

        assert_eq!(scratch.as_slice().len(), 32);
        assert_eq!(&scratch.as_slice()[..3], &tail);
        assert!(scratch.as_slice()[3..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_copy_prefix() {
        let mut scratch = ScratchBlock::zeroed(8);
        for (i, v) in scratch.as_mut_slice().iter_mut().enumerate() {
            *v = i as f32;
        }

        let mut out = [9.0f32; 3];
        scratch.copy_prefix_to(&mut out);
        assert_eq!(out, [0.0, 1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "exceeds scratch capacity")]
    fn test_oversized_block_panics() {
        let _ = ScratchBlock::zeroed(MAX_BLOCK_SIZE + 1);
    }
}
