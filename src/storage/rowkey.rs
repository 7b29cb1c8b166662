//! Canonical row-key and metadata-value byte encodings for byte-oriented
//! backends. [`super::MemoryStorage`] keeps keys as native `u64`s and has
//! no use for these; an on-disk or remote KV adapter sits between the
//! store's byte-string keys and the `u64` row indices `large_build` and
//! `BigsiIndex` deal in, and would use one of these two encodings.

use byteorder::{BigEndian, ByteOrder};
use bytes::{Bytes, BytesMut};
use integer_encoding::VarInt;

/// Big-endian fixed-width 8-byte encoding: keeps row order identical to key
/// byte order, which range-scanning backends rely on.
pub fn encode_row_key_fixed(row: u64) -> Bytes {
    let mut buf = BytesMut::zeroed(8);
    BigEndian::write_u64(&mut buf, row);
    buf.freeze()
}

pub fn decode_row_key_fixed(bytes: &[u8]) -> Option<u64> {
    if bytes.len() != 8 {
        return None;
    }
    Some(BigEndian::read_u64(bytes))
}

/// Varint encoding: shorter for small row indices, at the cost of losing
/// byte-order-equals-numeric-order.
pub fn encode_row_key_varint(row: u64) -> Vec<u8> {
    let mut buf = vec![0u8; row.required_space()];
    row.encode_var(&mut buf);
    buf
}

pub fn decode_row_key_varint(bytes: &[u8]) -> Option<(u64, usize)> {
    u64::decode_var(bytes)
}
