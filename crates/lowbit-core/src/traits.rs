//! Core traits for block quantization.
//!
//! ## Trait Roles
//!
//! ```text
//! QuantBlock        fixed-layout record for one block of one scheme
//!       ↑
//! row quantizer / dequantizer  (partition, pad, fallback)
//!       ↓
//! CodebookStrategy  per-block encode/decode, supplied by the caller
//! ```

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::error::Result;
use crate::types::{BlockMeta, Scheme};

/// Per-block codebook quantizer and dequantizer.
///
/// Implementations map exactly `meta.block_size` floats to packed codes
/// and back. The row layer always passes full-size slices; it never
/// hands a strategy a partial block. Returning `Err` signals failure for
/// that block only.
///
/// Strategies must be reentrant: the row layer may call them from
/// several threads at once.
pub trait CodebookStrategy: Send + Sync {
    /// Short identifier used in errors and logs.
    fn name(&self) -> &'static str;

    /// Encode one block.
    ///
    /// # Arguments
    /// * `values` - `meta.block_size` input values
    /// * `codes` - packed code storage of the record being written
    /// * `meta` - block parameters; `scale` and `zero_point` are outputs
    fn encode(&self, values: &[f32], codes: &mut [u8], meta: &mut BlockMeta) -> Result<()>;

    /// Decode one block.
    ///
    /// # Arguments
    /// * `codes` - packed codes of a stored record
    /// * `meta` - block parameters read from the record
    /// * `output` - `meta.block_size` reconstructed values
    fn decode(&self, codes: &[u8], meta: &BlockMeta, output: &mut [f32]) -> Result<()>;
}

impl<T: CodebookStrategy + ?Sized> CodebookStrategy for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encode(&self, values: &[f32], codes: &mut [u8], meta: &mut BlockMeta) -> Result<()> {
        (**self).encode(values, codes, meta)
    }

    fn decode(&self, codes: &[u8], meta: &BlockMeta, output: &mut [f32]) -> Result<()> {
        (**self).decode(codes, meta, output)
    }
}

impl<T: CodebookStrategy + ?Sized> CodebookStrategy for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encode(&self, values: &[f32], codes: &mut [u8], meta: &mut BlockMeta) -> Result<()> {
        (**self).encode(values, codes, meta)
    }

    fn decode(&self, codes: &[u8], meta: &BlockMeta, output: &mut [f32]) -> Result<()> {
        (**self).decode(codes, meta, output)
    }
}

impl<T: CodebookStrategy + ?Sized> CodebookStrategy for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encode(&self, values: &[f32], codes: &mut [u8], meta: &mut BlockMeta) -> Result<()> {
        (**self).encode(values, codes, meta)
    }

    fn decode(&self, codes: &[u8], meta: &BlockMeta, output: &mut [f32]) -> Result<()> {
        (**self).decode(codes, meta, output)
    }
}

/// Fixed-layout block record of a single scheme.
///
/// Records are plain `#[repr(C)]` values (`scale`, `zero_point`, codes)
/// so a row of them has a stable memory image. The all-zero bit pattern
/// is the fallback record.
pub trait QuantBlock: Pod + Zeroable + Send + Sync {
    /// Scheme this record belongs to.
    const SCHEME: Scheme;

    /// Elements covered by one record.
    const BLOCK_SIZE: usize = Self::SCHEME.block_size();

    /// Per-block scale factor.
    fn scale(&self) -> f32;

    /// Per-block zero point.
    fn zero_point(&self) -> f32;

    /// Store the parameters produced by an encode call.
    fn set_params(&mut self, scale: f32, zero_point: f32);

    /// Packed codes.
    fn codes(&self) -> &[u8];

    /// Packed codes, writable.
    fn codes_mut(&mut self) -> &mut [u8];

    /// Decode metadata for this record.
    fn meta(&self) -> BlockMeta {
        BlockMeta::with_params(Self::SCHEME, self.scale(), self.zero_point())
    }

    /// Check whether this is the all-zero fallback record.
    fn is_zeroed(&self) -> bool {
        bytemuck::bytes_of(self).iter().all(|&b| b == 0)
    }
}
