//! Row codec configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a row call does when a codebook strategy fails on a block.
///
/// Either way the failed block is zero-filled and the rest of the row is
/// still processed, so the output layout never depends on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Zero-fill and report success; failures only show up in the stats.
    #[default]
    ZeroFill,
    /// Zero-fill, finish the row, then return `Error::BlocksFailed`.
    Propagate,
}

/// Configuration for row quantization and dequantization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowConfig {
    /// Failure handling for individual blocks.
    pub fallback: FallbackPolicy,

    /// Minimum number of full blocks before work is spread across threads
    /// (default: 64). Only used with the `parallel` feature.
    pub parallel_threshold: usize,

    /// Emit a `warn` event for every block that falls back.
    pub warn_on_fallback: bool,
}

impl Default for RowConfig {
    fn default() -> Self {
        RowConfig {
            fallback: FallbackPolicy::ZeroFill,
            parallel_threshold: 64,
            warn_on_fallback: true,
        }
    }
}

impl RowConfig {
    /// Create config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set the parallel threshold in blocks.
    pub fn with_parallel_threshold(mut self, blocks: usize) -> Self {
        self.parallel_threshold = blocks;
        self
    }

    /// Never spread a row across threads.
    pub fn sequential(self) -> Self {
        self.with_parallel_threshold(usize::MAX)
    }

    /// Toggle per-block fallback warnings.
    pub fn with_fallback_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_fallback = enabled;
        self
    }

    /// Check the configuration for values the row layer cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(Error::InvalidConfig(
                "parallel_threshold must be at least 1 block".into(),
            ));
        }
        Ok(())
    }
}
