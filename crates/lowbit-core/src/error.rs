//! Error types for low-bit row quantization.

use thiserror::Error;

use crate::types::Scheme;

/// Result type alias for quantization operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Quantization error types.
#[derive(Debug, Error)]
pub enum Error {
    /// A codebook strategy could not encode a block.
    #[error("{strategy} failed to encode block: {message}")]
    Encode {
        strategy: &'static str,
        message: String,
    },

    /// A codebook strategy could not decode a block.
    #[error("{strategy} failed to decode block: {message}")]
    Decode {
        strategy: &'static str,
        message: String,
    },

    /// Input contains a NaN or infinity.
    #[error("non-finite value {value} at index {index}")]
    NonFinite { index: usize, value: f32 },

    /// Slice length disagrees with the block size carried in the metadata.
    #[error("block size mismatch: expected {expected}, got {actual}")]
    BlockSizeMismatch { expected: usize, actual: usize },

    /// Codebook size the strategy does not implement.
    #[error("unsupported codebook size {0}")]
    UnsupportedCodebook(u32),

    /// Caller-provided buffer too small for the row.
    #[error("buffer too small: need {required} {unit}, got {provided}")]
    BufferTooSmall {
        required: usize,
        provided: usize,
        unit: &'static str,
    },

    /// Serialized row bytes are malformed.
    #[error("corrupted data: {message}")]
    CorruptedData { message: String },

    /// One or more blocks fell back to zero under a propagating policy.
    #[error("{scheme}: {} of {total} blocks failed (first: {})", .failed.len(), .failed.first().copied().unwrap_or(0))]
    BlocksFailed {
        scheme: Scheme,
        failed: Vec<usize>,
        total: usize,
    },

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create an encode failure for the named strategy.
    pub fn encode(strategy: &'static str, message: impl Into<String>) -> Self {
        Error::Encode {
            strategy,
            message: message.into(),
        }
    }

    /// Create a decode failure for the named strategy.
    pub fn decode(strategy: &'static str, message: impl Into<String>) -> Self {
        Error::Decode {
            strategy,
            message: message.into(),
        }
    }

    /// Create a block size mismatch error.
    pub fn block_size_mismatch(expected: usize, actual: usize) -> Self {
        Error::BlockSizeMismatch { expected, actual }
    }

    /// Create a buffer too small error counted in block records.
    pub fn too_few_blocks(required: usize, provided: usize) -> Self {
        Error::BufferTooSmall {
            required,
            provided,
            unit: "blocks",
        }
    }

    /// Create a buffer too small error counted in bytes.
    pub fn too_few_bytes(required: usize, provided: usize) -> Self {
        Error::BufferTooSmall {
            required,
            provided,
            unit: "bytes",
        }
    }

    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::CorruptedData {
            message: message.into(),
        }
    }

    /// Check if the error came from a codebook strategy rather than the caller.
    pub fn is_strategy_failure(&self) -> bool {
        matches!(
            self,
            Error::Encode { .. }
                | Error::Decode { .. }
                | Error::NonFinite { .. }
                | Error::BlockSizeMismatch { .. }
                | Error::UnsupportedCodebook(_)
        )
    }

    /// Get error category for metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Encode { .. } => "encode",
            Error::Decode { .. } => "decode",
            Error::NonFinite { .. } => "non_finite",
            Error::BlockSizeMismatch { .. } => "block_size_mismatch",
            Error::UnsupportedCodebook(_) => "unsupported_codebook",
            Error::BufferTooSmall { .. } => "buffer_too_small",
            Error::CorruptedData { .. } => "corrupted_data",
            Error::BlocksFailed { .. } => "blocks_failed",
            Error::InvalidConfig(_) => "invalid_config",
        }
    }
}
