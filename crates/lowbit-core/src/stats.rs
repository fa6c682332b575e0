//! Statistics and metrics for row operations.

use crate::types::{Scheme, StorageRatio};

/// Statistics from a single row quantize/dequantize call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowStats {
    /// Scheme used.
    pub scheme: Option<Scheme>,

    /// Logical row length in values.
    pub elements: usize,

    /// Block records written or read.
    pub blocks_processed: usize,

    /// Whether the final block went through the padding path.
    pub padded_tail: bool,

    /// Indices of blocks that fell back to zero, ascending.
    pub failed_blocks: Vec<usize>,

    /// Time taken in microseconds.
    pub time_us: u64,

    /// Whether full blocks were spread across threads.
    pub parallel: bool,
}

impl RowStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for a row of `elements` values of `scheme`, before any work.
    pub fn for_row(scheme: Scheme, elements: usize) -> Self {
        RowStats {
            scheme: Some(scheme),
            elements,
            ..Default::default()
        }
    }

    /// Number of blocks that fell back.
    pub fn failure_count(&self) -> usize {
        self.failed_blocks.len()
    }

    /// True when every block went through the strategy successfully.
    pub fn is_clean(&self) -> bool {
        self.failed_blocks.is_empty()
    }

    /// Storage ratio of the quantized row.
    pub fn storage(&self) -> StorageRatio {
        let record = self.scheme.map_or(0, Scheme::record_size);
        StorageRatio::new(self.elements, self.blocks_processed * record)
    }

    /// Effective bits per value, metadata and padding included.
    pub fn bits_per_value(&self) -> f64 {
        self.storage().bits_per_value()
    }

    /// Get throughput in values per second.
    pub fn throughput_vps(&self) -> f64 {
        if self.time_us == 0 {
            return 0.0;
        }
        self.elements as f64 * 1_000_000.0 / self.time_us as f64
    }

    /// Merge stats from another row. Failed block indices of `other` are
    /// shifted by the blocks already counted, as if the rows were
    /// concatenated.
    pub fn merge(&mut self, other: &RowStats) {
        let offset = self.blocks_processed;
        self.failed_blocks
            .extend(other.failed_blocks.iter().map(|&b| b + offset));
        self.elements += other.elements;
        self.blocks_processed += other.blocks_processed;
        self.time_us += other.time_us;
        self.padded_tail = other.padded_tail;
        self.parallel |= other.parallel;
        if self.scheme.is_none() {
            self.scheme = other.scheme;
        }
    }
}

/// Metrics collector for aggregate statistics across many rows.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Total rows processed.
    pub total_rows: u64,

    /// Total values processed.
    pub total_elements: u64,

    /// Total block records processed.
    pub total_blocks: u64,

    /// Blocks that fell back to zero.
    pub failed_blocks: u64,

    /// Total time spent in microseconds.
    pub total_time_us: u64,
}

impl Metrics {
    /// Create new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed row.
    pub fn record(&mut self, stats: &RowStats) {
        self.total_rows += 1;
        self.total_elements += stats.elements as u64;
        self.total_blocks += stats.blocks_processed as u64;
        self.failed_blocks += stats.failure_count() as u64;
        self.total_time_us += stats.time_us;
    }

    /// Fraction of blocks that fell back (0.0 to 1.0).
    pub fn failure_rate(&self) -> f64 {
        if self.total_blocks == 0 {
            return 0.0;
        }
        self.failed_blocks as f64 / self.total_blocks as f64
    }

    /// Get average throughput in millions of values per second.
    pub fn average_throughput_mvps(&self) -> f64 {
        if self.total_time_us == 0 {
            return 0.0;
        }
        self.total_elements as f64 / self.total_time_us as f64
    }

    /// Reset all metrics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get metrics summary as string.
    pub fn summary(&self) -> String {
        format!(
            "Rows: {}, Values: {}, Blocks: {} ({} failed, {:.2}%), Throughput: {:.1} Mvalues/s",
            self.total_rows,
            self.total_elements,
            self.total_blocks,
            self.failed_blocks,
            self.failure_rate() * 100.0,
            self.average_throughput_mvps(),
        )
    }
}

/// Reconstruction error between an original row and its decoded form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityReport {
    /// Mean squared error
    pub mse: f32,
    /// Mean absolute error
    pub mae: f32,
    /// Signal-to-noise ratio (dB)
    pub snr_db: f32,
    /// Maximum absolute error
    pub max_error: f32,
}

impl QualityReport {
    /// Compute metrics between original and reconstructed values.
    ///
    /// Only the common prefix is compared.
    pub fn compute(original: &[f32], reconstructed: &[f32]) -> Self {
        let mut sum_sq_error = 0.0f64;
        let mut sum_abs_error = 0.0f64;
        let mut sum_sq_signal = 0.0f64;
        let mut max_error = 0.0f32;

        for (o, r) in original.iter().zip(reconstructed) {
            let error = (o - r).abs();
            sum_sq_error += (error * error) as f64;
            sum_abs_error += error as f64;
            sum_sq_signal += (o * o) as f64;
            max_error = max_error.max(error);
        }

        let n = original.len().min(reconstructed.len()).max(1) as f64;
        let snr_db = if sum_sq_error > 0.0 {
            (10.0 * (sum_sq_signal / sum_sq_error).log10()) as f32
        } else {
            f32::INFINITY
        };

        QualityReport {
            mse: (sum_sq_error / n) as f32,
            mae: (sum_abs_error / n) as f32,
            snr_db,
            max_error,
        }
    }
}
