//! Bit packing for ternary and quaternary codes.
//!
//! Ternary: five trits per byte, little-endian base 3
//! (`byte = t0 + 3*t1 + 9*t2 + 27*t3 + 81*t4`), so a full byte is at most 242.
//!
//! Quaternary: four 2-bit codes per byte, lowest bits first
//! (`byte = q0 | q1 << 2 | q2 << 4 | q3 << 6`).

use lowbit_core::{Error, Result};

/// Trits stored in one byte.
pub const TRITS_PER_BYTE: usize = 5;

/// Two-bit codes stored in one byte.
pub const CODES_PER_BYTE: usize = 4;

const POW3: [u8; TRITS_PER_BYTE + 1] = [1, 3, 9, 27, 81, 243];

/// Bytes needed for `n` trits.
#[inline]
pub const fn trit_bytes(n: usize) -> usize {
    n.div_ceil(TRITS_PER_BYTE)
}

/// Bytes needed for `n` two-bit codes.
#[inline]
pub const fn crumb_bytes(n: usize) -> usize {
    n.div_ceil(CODES_PER_BYTE)
}

/// Pack trits (each 0..=2) into `out`. Bytes past the packed data are zeroed.
///
/// Fails without writing if `out` is shorter than `trit_bytes(trits.len())`
/// or a trit is out of range.
pub fn pack_trits(trits: &[u8], out: &mut [u8]) -> Result<()> {
    let used = trit_bytes(trits.len());
    if out.len() < used {
        return Err(Error::too_few_bytes(used, out.len()));
    }
    check_symbols(trits, 3)?;

    out.fill(0);
    for (byte, chunk) in out.iter_mut().zip(trits.chunks(TRITS_PER_BYTE)) {
        *byte = chunk.iter().rev().fold(0u8, |acc, &t| acc * 3 + t);
    }
    Ok(())
}

/// Unpack `out.len()` trits from `packed`.
///
/// Fails if a byte holds a value outside its base-3 range or if a byte
/// past the packed data is non-zero.
pub fn unpack_trits(packed: &[u8], out: &mut [u8]) -> Result<()> {
    let used = trit_bytes(out.len());
    if packed.len() < used {
        return Err(Error::corrupted(format!(
            "{} trits need {} bytes, got {}",
            out.len(),
            used,
            packed.len()
        )));
    }

    for (i, (&byte, chunk)) in packed.iter().zip(out.chunks_mut(TRITS_PER_BYTE)).enumerate() {
        if byte >= POW3[chunk.len()] {
            return Err(Error::corrupted(format!("invalid trit byte 0x{byte:02x} at {i}")));
        }
        let mut rest = byte;
        for t in chunk.iter_mut() {
            *t = rest % 3;
            rest /= 3;
        }
    }

    if let Some(offset) = packed[used..].iter().position(|&b| b != 0) {
        return Err(Error::corrupted(format!(
            "reserved byte {} is 0x{:02x}, expected zero",
            used + offset,
            packed[used + offset]
        )));
    }
    Ok(())
}

/// Pack 2-bit codes (each 0..=3) into `out`. Bytes past the packed data are zeroed.
///
/// Fails without writing if `out` is shorter than `crumb_bytes(codes.len())`
/// or a code is out of range.
pub fn pack_crumbs(codes: &[u8], out: &mut [u8]) -> Result<()> {
    let used = crumb_bytes(codes.len());
    if out.len() < used {
        return Err(Error::too_few_bytes(used, out.len()));
    }
    check_symbols(codes, 4)?;

    out.fill(0);
    for (i, &q) in codes.iter().enumerate() {
        out[i / CODES_PER_BYTE] |= q << (2 * (i % CODES_PER_BYTE));
    }
    Ok(())
}

/// Reject any symbol outside `0..levels`.
fn check_symbols(symbols: &[u8], levels: u8) -> Result<()> {
    match symbols.iter().position(|&s| s >= levels) {
        Some(i) => Err(Error::corrupted(format!(
            "symbol {} at {} exceeds codebook of {}",
            symbols[i], i, levels
        ))),
        None => Ok(()),
    }
}

/// Unpack `out.len()` 2-bit codes from `packed`.
pub fn unpack_crumbs(packed: &[u8], out: &mut [u8]) -> Result<()> {
    let used = crumb_bytes(out.len());
    if packed.len() < used {
        return Err(Error::corrupted(format!(
            "{} codes need {} bytes, got {}",
            out.len(),
            used,
            packed.len()
        )));
    }
    for (i, q) in out.iter_mut().enumerate() {
        *q = (packed[i / CODES_PER_BYTE] >> (2 * (i % CODES_PER_BYTE))) & 0b11;
    }
    Ok(())
}
