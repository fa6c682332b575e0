//! # Lowbit Core
//!
//! Core traits, types, and errors for the lowbit row codec.
//!
//! A row of f32 weights is cut into fixed-size blocks. Each block is
//! handed to a [`CodebookStrategy`], which maps it onto a tiny codebook
//! (three symbols for the ternary scheme, four for the quaternary
//! scheme) and reports a per-block scale and zero point. The row layer
//! stores those in fixed-layout [`QuantBlock`] records.
//!
//! ## Core Traits
//!
//! - [`CodebookStrategy`] - Per-block encode/decode, supplied by the caller
//! - [`QuantBlock`] - Fixed-layout block record of one scheme
//!
//! ## Example
//!
//! ```ignore
//! use lowbit::{quantize_row_ternary, AffineCodebook, BlockTernary};
//!
//! let mut blocks = vec![BlockTernary::default(); 2];
//! let stats = quantize_row_ternary(&AffineCodebook, &weights[..40], &mut blocks)?;
//! assert!(stats.is_clean());
//! ```

pub mod config;
pub mod error;
pub mod stats;
pub mod traits;
pub mod types;

pub use config::{FallbackPolicy, RowConfig};
pub use error::{Error, Result};
pub use stats::{Metrics, QualityReport, RowStats};
pub use traits::{CodebookStrategy, QuantBlock};
pub use types::{BlockMeta, Scheme, StorageRatio};
