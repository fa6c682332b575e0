//! Reference min/max affine codebook strategy.
//!
//! Each block is mapped onto `codebook_size` evenly spaced levels between
//! its minimum and maximum:
//!
//! ```text
//! scale      = (max - min) / (codebook_size - 1)
//! zero_point = min
//! code       = clamp(round((v - min) / scale), 0, codebook_size - 1)
//! v'         = code * scale + zero_point
//! ```
//!
//! A constant block gets `scale = 0` and decodes exactly to its value;
//! an all-zero block therefore decodes to exact zeros. This is a local
//! stand-in for an optimized codebook search, not a replacement for one.

use lowbit_core::{BlockMeta, CodebookStrategy, Error, Result, Scheme};

use crate::pack;
use crate::padding::MAX_BLOCK_SIZE;

const NAME: &str = "affine";

/// Min/max affine codebook for both schemes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AffineCodebook;

impl AffineCodebook {
    /// Create the reference strategy.
    pub fn new() -> Self {
        AffineCodebook
    }
}

/// Scheme and block length from the metadata, checked against slice lengths.
fn layout(meta: &BlockMeta, values: usize, codes: usize) -> Result<(Scheme, usize)> {
    let scheme = meta
        .scheme()
        .ok_or(Error::UnsupportedCodebook(meta.codebook_size))?;
    let n = meta.len();
    if n != scheme.block_size() || n > MAX_BLOCK_SIZE {
        return Err(Error::block_size_mismatch(scheme.block_size(), n));
    }
    if values != n {
        return Err(Error::block_size_mismatch(n, values));
    }
    if codes != scheme.code_bytes() {
        return Err(Error::BufferTooSmall {
            required: scheme.code_bytes(),
            provided: codes,
            unit: "code bytes",
        });
    }
    Ok((scheme, n))
}

impl CodebookStrategy for AffineCodebook {
    fn name(&self) -> &'static str {
        NAME
    }

    fn encode(&self, values: &[f32], codes: &mut [u8], meta: &mut BlockMeta) -> Result<()> {
        let (scheme, n) = layout(meta, values.len(), codes.len())?;

        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(Error::NonFinite { index, value });
        }

        let (lo, hi) = values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let levels = (meta.codebook_size - 1) as f32;
        let scale = (hi - lo) / levels;
        if !scale.is_finite() {
            return Err(Error::encode(NAME, format!("range [{lo}, {hi}] overflows f32")));
        }
        let inv_scale = if scale > 0.0 { scale.recip() } else { 0.0 };

        let mut q = [0u8; MAX_BLOCK_SIZE];
        for (q, &v) in q[..n].iter_mut().zip(values) {
            *q = ((v - lo) * inv_scale).round().clamp(0.0, levels) as u8;
        }

        match scheme {
            Scheme::Ternary => pack::pack_trits(&q[..n], codes)?,
            Scheme::Quaternary => pack::pack_crumbs(&q[..n], codes)?,
        }

        meta.scale = scale;
        meta.zero_point = lo;
        Ok(())
    }

    fn decode(&self, codes: &[u8], meta: &BlockMeta, output: &mut [f32]) -> Result<()> {
        let (scheme, n) = layout(meta, output.len(), codes.len())?;

        if !meta.scale.is_finite() || !meta.zero_point.is_finite() {
            return Err(Error::decode(
                NAME,
                format!("non-finite parameters scale={} zero_point={}", meta.scale, meta.zero_point),
            ));
        }

        let mut q = [0u8; MAX_BLOCK_SIZE];
        let unpacked = match scheme {
            Scheme::Ternary => pack::unpack_trits(codes, &mut q[..n]),
            Scheme::Quaternary => pack::unpack_crumbs(codes, &mut q[..n]),
        };
        unpacked.map_err(|e| Error::decode(NAME, e.to_string()))?;

        for (out, &q) in output.iter_mut().zip(&q[..n]) {
            *out = q as f32 * meta.scale + meta.zero_point;
        }
        Ok(())
    }
}
