//! Core type definitions for low-bit row quantization.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Supported low-bit codebook schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Ternary codebook, nominal 1.28 bits per value.
    Ternary,
    /// Quaternary codebook, nominal 1.58 bits per value.
    Quaternary,
}

impl Scheme {
    /// Get scheme name as string.
    pub fn name(self) -> &'static str {
        match self {
            Scheme::Ternary => "ternary-1.28",
            Scheme::Quaternary => "quaternary-1.58",
        }
    }

    /// Elements per block.
    pub const fn block_size(self) -> usize {
        match self {
            Scheme::Ternary => 32,
            Scheme::Quaternary => 64,
        }
    }

    /// Number of symbols in the codebook.
    pub const fn codebook_size(self) -> u32 {
        match self {
            Scheme::Ternary => 3,
            Scheme::Quaternary => 4,
        }
    }

    /// Packed code bytes per block record.
    ///
    /// Ternary packs five trits per byte (3^5 = 243 fits a byte); the
    /// 32 trits of a block use 7 bytes and the 8th is a reserved zero
    /// byte that keeps the record 4-byte aligned.
    pub const fn code_bytes(self) -> usize {
        match self {
            Scheme::Ternary => 8,
            Scheme::Quaternary => 16,
        }
    }

    /// Serialized record size: scale + zero point + codes.
    pub const fn record_size(self) -> usize {
        8 + self.code_bytes()
    }

    /// Nominal bits per value advertised for the scheme.
    pub fn nominal_bits(self) -> f32 {
        match self {
            Scheme::Ternary => 1.28,
            Scheme::Quaternary => 1.58,
        }
    }

    /// Look up the scheme that uses the given codebook size.
    pub fn from_codebook_size(codebook_size: u32) -> Option<Self> {
        match codebook_size {
            3 => Some(Scheme::Ternary),
            4 => Some(Scheme::Quaternary),
            _ => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transient per-block metadata exchanged with a codebook strategy.
///
/// `block_size` and `codebook_size` are scheme constants. `scale` and
/// `zero_point` are produced by encode and consumed by decode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockMeta {
    /// Multiplicative scale factor.
    pub scale: f32,
    /// Additive offset.
    pub zero_point: f32,
    /// Elements in the block; authoritative for slice lengths.
    pub block_size: u32,
    /// Symbols in the codebook (3 or 4).
    pub codebook_size: u32,
}

impl BlockMeta {
    /// Metadata ready for an encode call; scale and zero point start at zero.
    pub fn for_encode(scheme: Scheme) -> Self {
        Self::with_params(scheme, 0.0, 0.0)
    }

    /// Metadata for a decode call, built from a stored record.
    pub fn with_params(scheme: Scheme, scale: f32, zero_point: f32) -> Self {
        BlockMeta {
            scale,
            zero_point,
            block_size: scheme.block_size() as u32,
            codebook_size: scheme.codebook_size(),
        }
    }

    /// Block size as a slice length.
    pub fn len(&self) -> usize {
        self.block_size as usize
    }

    /// True for a zero-sized block.
    pub fn is_empty(&self) -> bool {
        self.block_size == 0
    }

    /// Scheme matching this metadata's codebook size, if any.
    pub fn scheme(&self) -> Option<Scheme> {
        Scheme::from_codebook_size(self.codebook_size)
    }
}

/// Storage cost of a quantized row relative to f32.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageRatio {
    /// Number of logical f32 values in the row.
    pub elements: usize,
    /// Bytes occupied by the row's block records.
    pub stored_bytes: usize,
}

impl StorageRatio {
    /// Create new ratio from sizes.
    pub fn new(elements: usize, stored_bytes: usize) -> Self {
        StorageRatio {
            elements,
            stored_bytes,
        }
    }

    /// Effective bits per value, metadata included.
    pub fn bits_per_value(&self) -> f64 {
        if self.elements == 0 {
            return 0.0;
        }
        (self.stored_bytes * 8) as f64 / self.elements as f64
    }

    /// Compression ratio against f32 storage. Higher is better.
    pub fn ratio(&self) -> f64 {
        if self.stored_bytes == 0 {
            return 0.0;
        }
        (self.elements * 4) as f64 / self.stored_bytes as f64
    }
}
