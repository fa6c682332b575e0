//! # Lowbit
//!
//! Block-based ternary and quaternary codecs for weight rows.
//!
//! A row of `k` f32 values is split into fixed-size blocks. Each block is
//! encoded by a pluggable [`CodebookStrategy`] into packed codes plus a
//! scale and zero point, stored in a fixed-layout record. A partial last
//! block is zero-padded on encode and truncated on decode, so strategies
//! only ever see full blocks.
//!
//! ## Schemes
//!
//! | Scheme     | Block | Codebook | Record   |
//! |------------|-------|----------|----------|
//! | ternary    | 32    | 3        | 16 bytes |
//! | quaternary | 64    | 4        | 24 bytes |
//!
//! ## Failure Handling
//!
//! When a strategy fails on a block, that block alone is zero-filled
//! (`scale = 0`, `zero_point = 0`, codes zero, or zero floats on decode)
//! and the row still completes. Failed block indices are reported in
//! [`RowStats`]; [`FallbackPolicy::Propagate`] turns them into an error.
//!
//! ## Example
//!
//! ```ignore
//! use lowbit::{AffineCodebook, BlockTernary, quantize_row_ternary, dequantize_row_ternary};
//!
//! let weights: Vec<f32> = load_row();
//! let mut blocks = vec![BlockTernary::default(); lowbit::blocks_for::<BlockTernary>(weights.len())];
//! let stats = quantize_row_ternary(&AffineCodebook, &weights, &mut blocks)?;
//!
//! let mut restored = vec![0.0; weights.len()];
//! dequantize_row_ternary(&AffineCodebook, &blocks, &mut restored)?;
//! ```

pub mod block;
pub mod codec;
pub mod fallback;
pub mod layout;
pub mod pack;
pub mod padding;
pub mod partition;
pub mod reference;
pub mod row;

// Re-export main types
pub use block::{BlockQuaternary, BlockTernary, QK_QUATERNARY, QK_TERNARY};
pub use codec::{QuaternaryCodec, RowCodec, TernaryCodec};
pub use partition::Partition;
pub use reference::AffineCodebook;
pub use row::{
    blocks_for, dequantize_row, dequantize_row_quaternary, dequantize_row_ternary, quantize_row,
    quantize_row_quaternary, quantize_row_ternary,
};

pub use lowbit_core::{
    BlockMeta, CodebookStrategy, Error, FallbackPolicy, Metrics, QualityReport, QuantBlock, Result,
    RowConfig, RowStats, Scheme, StorageRatio,
};
