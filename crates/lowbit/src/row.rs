//! Row quantization and dequantization.
//!
//! A row of `k` values maps to `ceil(k / BLOCK_SIZE)` records. Full
//! blocks are handed to the strategy in place; the partial tail goes
//! through a zero-padded [`ScratchBlock`]. Every block gets exactly one
//! strategy call, and a failed call zero-fills that block only.

use std::time::Instant;

use lowbit_core::{BlockMeta, CodebookStrategy, Error, QuantBlock, Result, RowConfig, RowStats};
use tracing::debug;

use crate::block::{BlockQuaternary, BlockTernary};
use crate::fallback::{self, Direction};
use crate::padding::ScratchBlock;
use crate::partition::Partition;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Number of `B` records needed for a row of `len` values.
#[inline]
pub fn blocks_for<B: QuantBlock>(len: usize) -> usize {
    Partition::new(len, B::BLOCK_SIZE).block_count()
}

/// Quantize a row into block records.
///
/// Writes exactly `blocks_for::<B>(x.len())` records at the front of `y`
/// and leaves the rest of `y` untouched.
///
/// # Errors
/// `Error::BufferTooSmall` if `y` cannot hold the row (nothing is
/// written), `Error::InvalidConfig` for a bad config, and
/// `Error::BlocksFailed` only under `FallbackPolicy::Propagate`.
pub fn quantize_row<B, S>(strategy: &S, x: &[f32], y: &mut [B], config: &RowConfig) -> Result<RowStats>
where
    B: QuantBlock,
    S: CodebookStrategy + ?Sized,
{
    config.validate()?;
    let start = Instant::now();
    let part = Partition::new(x.len(), B::BLOCK_SIZE);
    let count = part.block_count();
    if y.len() < count {
        return Err(Error::too_few_blocks(count, y.len()));
    }

    let mut stats = RowStats::for_row(B::SCHEME, x.len());
    let (full_in, tail_in) = x.split_at(part.full_len());
    let (full_out, tail_out) = y[..count].split_at_mut(part.full_blocks);

    stats.parallel = encode_full_blocks(strategy, full_in, full_out, config, &mut stats.failed_blocks);

    if let Some(record) = tail_out.first_mut() {
        let scratch = ScratchBlock::padded(tail_in, B::BLOCK_SIZE);
        if !encode_block(strategy, scratch.as_slice(), record, part.full_blocks, config) {
            stats.failed_blocks.push(part.full_blocks);
        }
        stats.padded_tail = true;
    }

    stats.blocks_processed = count;
    stats.time_us = start.elapsed().as_micros() as u64;
    debug!(
        scheme = B::SCHEME.name(),
        strategy = strategy.name(),
        elements = x.len(),
        blocks = count,
        failed = stats.failure_count(),
        "quantized row"
    );
    fallback::conclude(config, B::SCHEME, stats)
}

/// Reconstruct a row of `y.len()` values from block records.
///
/// Reads the first `blocks_for::<B>(y.len())` records of `x`. Values of
/// the padded tail beyond the row length are discarded.
///
/// # Errors
/// Same as [`quantize_row`], with `x` as the record buffer.
pub fn dequantize_row<B, S>(strategy: &S, x: &[B], y: &mut [f32], config: &RowConfig) -> Result<RowStats>
where
    B: QuantBlock,
    S: CodebookStrategy + ?Sized,
{
    config.validate()?;
    let start = Instant::now();
    let part = Partition::new(y.len(), B::BLOCK_SIZE);
    let count = part.block_count();
    if x.len() < count {
        return Err(Error::too_few_blocks(count, x.len()));
    }

    let mut stats = RowStats::for_row(B::SCHEME, y.len());
    let (full_in, tail_in) = x[..count].split_at(part.full_blocks);
    let (full_out, tail_out) = y.split_at_mut(part.full_len());

    stats.parallel = decode_full_blocks(strategy, full_in, full_out, config, &mut stats.failed_blocks);

    if let Some(record) = tail_in.first() {
        // Decode into scratch: only the first `remainder` values are valid.
        let mut scratch = ScratchBlock::zeroed(B::BLOCK_SIZE);
        match strategy.decode(record.codes(), &record.meta(), scratch.as_mut_slice()) {
            Ok(()) => scratch.copy_prefix_to(tail_out),
            Err(err) => {
                fallback::zero_values(tail_out);
                fallback::report(config, B::SCHEME, Direction::Decode, part.full_blocks, &err);
                stats.failed_blocks.push(part.full_blocks);
            }
        }
        stats.padded_tail = true;
    }

    stats.blocks_processed = count;
    stats.time_us = start.elapsed().as_micros() as u64;
    debug!(
        scheme = B::SCHEME.name(),
        strategy = strategy.name(),
        elements = y.len(),
        blocks = count,
        failed = stats.failure_count(),
        "dequantized row"
    );
    fallback::conclude(config, B::SCHEME, stats)
}

/// Encode one full-size block into `record`. Returns false if it fell back.
fn encode_block<B, S>(strategy: &S, values: &[f32], record: &mut B, index: usize, config: &RowConfig) -> bool
where
    B: QuantBlock,
    S: CodebookStrategy + ?Sized,
{
    let mut meta = BlockMeta::for_encode(B::SCHEME);
    match strategy.encode(values, record.codes_mut(), &mut meta) {
        Ok(()) => {
            record.set_params(meta.scale, meta.zero_point);
            true
        }
        Err(err) => {
            fallback::zero_record(record);
            fallback::report(config, B::SCHEME, Direction::Encode, index, &err);
            false
        }
    }
}

/// Decode one record into a full-size block of `output`. Returns false if it fell back.
fn decode_block<B, S>(strategy: &S, record: &B, output: &mut [f32], index: usize, config: &RowConfig) -> bool
where
    B: QuantBlock,
    S: CodebookStrategy + ?Sized,
{
    match strategy.decode(record.codes(), &record.meta(), output) {
        Ok(()) => true,
        Err(err) => {
            fallback::zero_values(output);
            fallback::report(config, B::SCHEME, Direction::Decode, index, &err);
            false
        }
    }
}

/// Encode all full blocks, in parallel above the configured threshold.
/// Returns whether the parallel path was taken.
fn encode_full_blocks<B, S>(
    strategy: &S,
    input: &[f32],
    output: &mut [B],
    config: &RowConfig,
    failed: &mut Vec<usize>,
) -> bool
where
    B: QuantBlock,
    S: CodebookStrategy + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        if output.len() >= config.parallel_threshold {
            let mut par_failed: Vec<usize> = input
                .par_chunks_exact(B::BLOCK_SIZE)
                .zip(output.par_iter_mut())
                .enumerate()
                .filter_map(|(i, (values, record))| {
                    (!encode_block(strategy, values, record, i, config)).then_some(i)
                })
                .collect();
            failed.append(&mut par_failed);
            return true;
        }
    }

    for (i, (values, record)) in input
        .chunks_exact(B::BLOCK_SIZE)
        .zip(output.iter_mut())
        .enumerate()
    {
        if !encode_block(strategy, values, record, i, config) {
            failed.push(i);
        }
    }
    false
}

/// Decode all full blocks, in parallel above the configured threshold.
/// Returns whether the parallel path was taken.
fn decode_full_blocks<B, S>(
    strategy: &S,
    input: &[B],
    output: &mut [f32],
    config: &RowConfig,
    failed: &mut Vec<usize>,
) -> bool
where
    B: QuantBlock,
    S: CodebookStrategy + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        if input.len() >= config.parallel_threshold {
            let mut par_failed: Vec<usize> = input
                .par_iter()
                .zip(output.par_chunks_exact_mut(B::BLOCK_SIZE))
                .enumerate()
                .filter_map(|(i, (record, values))| {
                    (!decode_block(strategy, record, values, i, config)).then_some(i)
                })
                .collect();
            failed.append(&mut par_failed);
            return true;
        }
    }

    for (i, (record, values)) in input
        .iter()
        .zip(output.chunks_exact_mut(B::BLOCK_SIZE))
        .enumerate()
    {
        if !decode_block(strategy, record, values, i, config) {
            failed.push(i);
        }
    }
    false
}

/// Quantize a row with the ternary (1.28-bit) scheme and default config.
pub fn quantize_row_ternary<S>(strategy: &S, x: &[f32], y: &mut [BlockTernary]) -> Result<RowStats>
where
    S: CodebookStrategy + ?Sized,
{
    quantize_row(strategy, x, y, &RowConfig::default())
}

/// Dequantize a ternary (1.28-bit) row with default config.
pub fn dequantize_row_ternary<S>(strategy: &S, x: &[BlockTernary], y: &mut [f32]) -> Result<RowStats>
where
    S: CodebookStrategy + ?Sized,
{
    dequantize_row(strategy, x, y, &RowConfig::default())
}

/// Quantize a row with the quaternary (1.58-bit) scheme and default config.
pub fn quantize_row_quaternary<S>(strategy: &S, x: &[f32], y: &mut [BlockQuaternary]) -> Result<RowStats>
where
    S: CodebookStrategy + ?Sized,
{
    quantize_row(strategy, x, y, &RowConfig::default())
}

/// Dequantize a quaternary (1.58-bit) row with default config.
pub fn dequantize_row_quaternary<S>(strategy: &S, x: &[BlockQuaternary], y: &mut [f32]) -> Result<RowStats>
where
    S: CodebookStrategy + ?Sized,
{
    dequantize_row(strategy, x, y, &RowConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::AffineCodebook;
    use lowbit_core::FallbackPolicy;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| (i as f32 * 0.37).sin()).collect()
    }

    #[test]
    fn test_blocks_for() {
        assert_eq!(blocks_for::<BlockTernary>(0), 0);
        assert_eq!(blocks_for::<BlockTernary>(40), 2);
        assert_eq!(blocks_for::<BlockQuaternary>(64), 1);
        assert_eq!(blocks_for::<BlockQuaternary>(65), 2);
    }

    #[test]
    fn test_forty_value_ternary_row() {
        let x = ramp(40);
        let mut blocks = vec![BlockTernary::default(); 2];

        let stats = quantize_row_ternary(&AffineCodebook, &x, &mut blocks).unwrap();
        assert_eq!(stats.blocks_processed, 2);
        assert!(stats.padded_tail);
        assert!(stats.is_clean());

        let mut y = vec![f32::NAN; 40];
        dequantize_row_ternary(&AffineCodebook, &blocks, &mut y).unwrap();
        assert!(y.iter().all(|v| v.is_finite()));

        // The tail matches a direct decode of the padded remainder record.
        let mut padded = [0.0f32; 32];
        AffineCodebook
            .decode(blocks[1].codes(), &blocks[1].meta(), &mut padded)
            .unwrap();
        assert_eq!(&y[32..], &padded[..8]);
    }

    #[test]
    fn test_extra_records_untouched() {
        let x = ramp(10);
        let sentinel = BlockQuaternary {
            scale: 7.0,
            zero_point: 7.0,
            qs: [7; 16],
        };
        let mut blocks = vec![sentinel; 3];

        quantize_row_quaternary(&AffineCodebook, &x, &mut blocks).unwrap();
        assert_ne!(blocks[0], sentinel);
        assert_eq!(blocks[1], sentinel);
        assert_eq!(blocks[2], sentinel);
    }

    #[test]
    fn test_short_buffers_rejected() {
        let x = ramp(65);
        let mut blocks = vec![BlockQuaternary::default(); 1];
        let err = quantize_row_quaternary(&AffineCodebook, &x, &mut blocks).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { required: 2, provided: 1, .. }));
        assert!(blocks[0].is_zeroed());

        let mut y = vec![0.0f32; 65];
        let err = dequantize_row_quaternary(&AffineCodebook, &blocks, &mut y).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { required: 2, provided: 1, .. }));
    }

    #[test]
    fn test_empty_row() {
        let mut blocks: Vec<BlockTernary> = Vec::new();
        let stats = quantize_row_ternary(&AffineCodebook, &[], &mut blocks).unwrap();
        assert_eq!(stats.blocks_processed, 0);
        assert!(!stats.padded_tail);

        let mut y: Vec<f32> = Vec::new();
        let stats = dequantize_row_ternary(&AffineCodebook, &blocks, &mut y).unwrap();
        assert_eq!(stats.blocks_processed, 0);
    }

    #[test]
    fn test_non_finite_block_falls_back() {
        let mut x = ramp(96);
        x[40] = f32::NAN;
        let mut blocks = vec![BlockTernary::default(); 3];

        let stats = quantize_row_ternary(&AffineCodebook, &x, &mut blocks).unwrap();
        assert_eq!(stats.failed_blocks, vec![1]);
        assert!(blocks[1].is_zeroed());
        assert!(!blocks[0].is_zeroed());
        assert!(!blocks[2].is_zeroed());

        let config = RowConfig::new().with_fallback(FallbackPolicy::Propagate);
        let err = quantize_row(&AffineCodebook, &x, &mut blocks, &config).unwrap_err();
        assert!(matches!(err, Error::BlocksFailed { ref failed, total: 3, .. } if failed == &vec![1]));
        assert!(blocks[1].is_zeroed());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RowConfig::new().with_parallel_threshold(0);
        let mut blocks = vec![BlockTernary::default(); 1];
        let err = quantize_row(&AffineCodebook, &ramp(8), &mut blocks, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
