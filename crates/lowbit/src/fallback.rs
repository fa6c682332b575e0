//! Zero-fill fallback for blocks a strategy could not handle.

use lowbit_core::{Error, FallbackPolicy, QuantBlock, Result, RowConfig, RowStats, Scheme};
use tracing::warn;

/// Direction of the failed strategy call, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Encode,
    Decode,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Encode => "encode",
            Direction::Decode => "decode",
        }
    }
}

/// Reset a record to `scale = 0`, `zero_point = 0`, all codes zero.
#[inline]
pub fn zero_record<B: QuantBlock>(record: &mut B) {
    *record = B::zeroed();
}

/// Reset decoded values to zero.
#[inline]
pub fn zero_values(values: &mut [f32]) {
    values.fill(0.0);
}

/// Log a block that fell back.
pub(crate) fn report(
    config: &RowConfig,
    scheme: Scheme,
    direction: Direction,
    block: usize,
    error: &Error,
) {
    if config.warn_on_fallback {
        warn!(
            scheme = scheme.name(),
            block,
            direction = direction.as_str(),
            category = error.category(),
            "block fell back to zero: {}",
            error
        );
    }
}

/// Apply the row-level policy once every block has been processed.
pub(crate) fn conclude(config: &RowConfig, scheme: Scheme, mut stats: RowStats) -> Result<RowStats> {
    stats.failed_blocks.sort_unstable();
    match config.fallback {
        FallbackPolicy::ZeroFill => Ok(stats),
        FallbackPolicy::Propagate if stats.is_clean() => Ok(stats),
        FallbackPolicy::Propagate => Err(Error::BlocksFailed {
            scheme,
            total: stats.blocks_processed,
            failed: stats.failed_blocks,
        }),
    }
}
