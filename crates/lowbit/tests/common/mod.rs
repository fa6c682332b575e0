//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use lowbit::{AffineCodebook, BlockMeta, CodebookStrategy, Error, Result};

/// Input value that makes [`ScriptedStrategy::encode`] fail.
pub const ENCODE_POISON: f32 = 1234.5;

/// Zero point that makes [`ScriptedStrategy::decode`] fail.
pub const DECODE_POISON: f32 = -4321.0;

/// Affine codebook that fails on poisoned blocks and counts its calls.
///
/// Failure is decided by block content, so it behaves the same on the
/// sequential and parallel paths.
#[derive(Debug, Default)]
pub struct ScriptedStrategy {
    pub encode_calls: AtomicUsize,
    pub decode_calls: AtomicUsize,
}

impl ScriptedStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    pub fn decode_calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }
}

impl CodebookStrategy for ScriptedStrategy {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn encode(&self, values: &[f32], codes: &mut [u8], meta: &mut BlockMeta) -> Result<()> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        // Scribble first so the fallback has something to clear.
        codes.fill(0xFF);
        meta.scale = 9.0;
        if values.contains(&ENCODE_POISON) {
            return Err(Error::encode("scripted", "poisoned block"));
        }
        AffineCodebook.encode(values, codes, meta)
    }

    fn decode(&self, codes: &[u8], meta: &BlockMeta, output: &mut [f32]) -> Result<()> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        output.fill(f32::NAN);
        if meta.zero_point == DECODE_POISON {
            return Err(Error::decode("scripted", "poisoned record"));
        }
        AffineCodebook.decode(codes, meta, output)
    }
}

/// Deterministic weight-like row in roughly [-1, 1].
pub fn weights(len: usize, seed: u32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let x = (i as f32 + seed as f32 * 0.61) * 0.173;
            x.sin() * 0.8 + (x * 3.1).cos() * 0.2
        })
        .collect()
}
