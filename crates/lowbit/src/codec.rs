//! Row codec (strategy + configuration bound to one scheme).

use core::marker::PhantomData;

use bytes::Bytes;
use lowbit_core::{CodebookStrategy, QualityReport, QuantBlock, Result, RowConfig, RowStats};

use crate::block::{BlockQuaternary, BlockTernary};
use crate::layout;
use crate::reference::AffineCodebook;
use crate::row::{blocks_for, dequantize_row, quantize_row};

/// Row codec for records of type `B`, backed by strategy `S`.
#[derive(Debug, Clone)]
pub struct RowCodec<B, S = AffineCodebook> {
    strategy: S,
    config: RowConfig,
    _block: PhantomData<fn() -> B>,
}

/// Ternary (1.28-bit) row codec.
pub type TernaryCodec<S = AffineCodebook> = RowCodec<BlockTernary, S>;

/// Quaternary (1.58-bit) row codec.
pub type QuaternaryCodec<S = AffineCodebook> = RowCodec<BlockQuaternary, S>;

impl<B: QuantBlock, S: CodebookStrategy> RowCodec<B, S> {
    /// Create a codec with default configuration.
    pub fn new(strategy: S) -> Self {
        Self::with_config(strategy, RowConfig::default())
    }

    /// Create a codec with the given configuration.
    pub fn with_config(strategy: S, config: RowConfig) -> Self {
        RowCodec {
            strategy,
            config,
            _block: PhantomData,
        }
    }

    /// Get the strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Get the configuration.
    pub fn config(&self) -> &RowConfig {
        &self.config
    }

    /// Records needed for a row of `len` values.
    pub fn blocks_for(&self, len: usize) -> usize {
        blocks_for::<B>(len)
    }

    /// Quantize into caller-provided records.
    pub fn quantize_to(&self, row: &[f32], output: &mut [B]) -> Result<RowStats> {
        quantize_row(&self.strategy, row, output, &self.config)
    }

    /// Quantize into a new record vector.
    pub fn quantize(&self, row: &[f32]) -> Result<Vec<B>> {
        let mut blocks = vec![B::zeroed(); blocks_for::<B>(row.len())];
        self.quantize_to(row, &mut blocks)?;
        Ok(blocks)
    }

    /// Dequantize into a caller-provided row; its length is the row length.
    pub fn dequantize_to(&self, blocks: &[B], output: &mut [f32]) -> Result<RowStats> {
        dequantize_row(&self.strategy, blocks, output, &self.config)
    }

    /// Dequantize a row of `len` values.
    pub fn dequantize(&self, blocks: &[B], len: usize) -> Result<Vec<f32>> {
        let mut row = vec![0.0f32; len];
        self.dequantize_to(blocks, &mut row)?;
        Ok(row)
    }

    /// Quantize and serialize in the persisted record layout.
    pub fn encode(&self, row: &[f32]) -> Result<Bytes> {
        Ok(layout::encode_row(&self.quantize(row)?))
    }

    /// Parse serialized records and dequantize a row of `len` values.
    pub fn decode(&self, data: &[u8], len: usize) -> Result<Vec<f32>> {
        let blocks = layout::decode_row_prefix::<B>(data, len)?;
        self.dequantize(&blocks, len)
    }

    /// Quantize then dequantize, returning reconstruction error.
    pub fn measure(&self, row: &[f32]) -> Result<QualityReport> {
        let blocks = self.quantize(row)?;
        let restored = self.dequantize(&blocks, row.len())?;
        Ok(QualityReport::compute(row, &restored))
    }
}

impl<B: QuantBlock> RowCodec<B, AffineCodebook> {
    /// Codec backed by the reference affine codebook.
    pub fn reference() -> Self {
        Self::new(AffineCodebook)
    }
}

impl<B: QuantBlock, S: CodebookStrategy + Default> Default for RowCodec<B, S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
