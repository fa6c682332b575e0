//! Persisted row layout.
//!
//! A serialized row is `block_count` records back to back, each
//! `scale: f32 LE | zero_point: f32 LE | codes`. The padded codes of a
//! partial last block are kept; their values are dropped on decode.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use lowbit_core::{Error, QuantBlock, Result};

use crate::row::blocks_for;

/// Serialized size of one `B` record.
#[inline]
pub fn record_size<B: QuantBlock>() -> usize {
    B::SCHEME.record_size()
}

/// Serialized size of a row of `len` values.
#[inline]
pub fn row_bytes<B: QuantBlock>(len: usize) -> usize {
    blocks_for::<B>(len) * record_size::<B>()
}

/// Append the records to `buf` in little-endian layout.
pub fn write_row<B: QuantBlock>(blocks: &[B], buf: &mut impl BufMut) {
    for block in blocks {
        buf.put_f32_le(block.scale());
        buf.put_f32_le(block.zero_point());
        buf.put_slice(block.codes());
    }
}

/// Serialize records into a new buffer.
pub fn encode_row<B: QuantBlock>(blocks: &[B]) -> Bytes {
    let mut buf = BytesMut::with_capacity(blocks.len() * record_size::<B>());
    write_row(blocks, &mut buf);
    buf.freeze()
}

/// Read every record from `data`.
///
/// # Errors
/// `Error::CorruptedData` if the length is not a whole number of records.
pub fn decode_row<B: QuantBlock>(data: &[u8]) -> Result<Vec<B>> {
    let size = record_size::<B>();
    if data.len() % size != 0 {
        return Err(Error::corrupted(format!(
            "{} bytes is not a multiple of the {}-byte {} record",
            data.len(),
            size,
            B::SCHEME
        )));
    }

    let mut buf = data;
    let mut blocks = Vec::with_capacity(data.len() / size);
    while buf.has_remaining() {
        let mut block = B::zeroed();
        let scale = buf.get_f32_le();
        let zero_point = buf.get_f32_le();
        block.set_params(scale, zero_point);
        buf.copy_to_slice(block.codes_mut());
        blocks.push(block);
    }
    Ok(blocks)
}

/// Read the records of a row of `len` values from the front of `data`.
///
/// # Errors
/// `Error::BufferTooSmall` if `data` is shorter than the row.
pub fn decode_row_prefix<B: QuantBlock>(data: &[u8], len: usize) -> Result<Vec<B>> {
    let needed = row_bytes::<B>(len);
    if data.len() < needed {
        return Err(Error::too_few_bytes(needed, data.len()));
    }
    decode_row(&data[..needed])
}

/// Zero-copy byte view of records in native byte order.
///
/// Identical to [`encode_row`] output on little-endian targets.
pub fn as_bytes<B: QuantBlock>(blocks: &[B]) -> &[u8] {
    bytemuck::cast_slice(blocks)
}

/// Zero-copy record view of native-order bytes.
///
/// # Errors
/// `Error::CorruptedData` if `data` is misaligned or not a whole number of records.
pub fn from_bytes<B: QuantBlock>(data: &[u8]) -> Result<&[B]> {
    bytemuck::try_cast_slice(data)
        .map_err(|e| Error::corrupted(format!("cannot view bytes as {} records: {e}", B::SCHEME)))
}
