//! Fixed-layout block records.
//!
//! Each record is `{scale: f32, zero_point: f32, qs: [u8; N]}` with
//! `#[repr(C)]` and no padding, so a slice of records is its own
//! serialized image on little-endian targets.

use bytemuck::{Pod, Zeroable};
use lowbit_core::{QuantBlock, Scheme};

/// Elements per ternary block.
pub const QK_TERNARY: usize = Scheme::Ternary.block_size();

/// Elements per quaternary block.
pub const QK_QUATERNARY: usize = Scheme::Quaternary.block_size();

/// Ternary block: 32 values, 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BlockTernary {
    pub scale: f32,
    pub zero_point: f32,
    /// 32 trits, five per byte in base 3; byte 7 is reserved and zero.
    pub qs: [u8; Scheme::Ternary.code_bytes()],
}

/// Quaternary block: 64 values, 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BlockQuaternary {
    pub scale: f32,
    pub zero_point: f32,
    /// 64 two-bit codes, four per byte, lowest bits first.
    pub qs: [u8; Scheme::Quaternary.code_bytes()],
}

const _: () = assert!(core::mem::size_of::<BlockTernary>() == Scheme::Ternary.record_size());
const _: () = assert!(core::mem::size_of::<BlockQuaternary>() == Scheme::Quaternary.record_size());

macro_rules! impl_quant_block {
    ($block:ty, $scheme:expr) => {
        impl QuantBlock for $block {
            const SCHEME: Scheme = $scheme;

            #[inline]
            fn scale(&self) -> f32 {
                self.scale
            }

            #[inline]
            fn zero_point(&self) -> f32 {
                self.zero_point
            }

            #[inline]
            fn set_params(&mut self, scale: f32, zero_point: f32) {
                self.scale = scale;
                self.zero_point = zero_point;
            }

            #[inline]
            fn codes(&self) -> &[u8] {
                &self.qs
            }

            #[inline]
            fn codes_mut(&mut self) -> &mut [u8] {
                &mut self.qs
            }
        }
    };
}

impl_quant_block!(BlockTernary, Scheme::Ternary);
impl_quant_block!(BlockQuaternary, Scheme::Quaternary);
