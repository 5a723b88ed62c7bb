//! 32-byte chunk alignment rules for Merkleization.
//!
//! Chunking only exists for hashing: wire encodings never contain padding.

use crate::types::hash::{HASH_LEN, Hash};

/// Width of a Merkle leaf in bytes.
pub const BYTES_PER_CHUNK: usize = HASH_LEN;

/// Number of chunks needed to hold `byte_len` bytes.
pub const fn chunk_count(byte_len: usize) -> usize {
    byte_len.div_ceil(BYTES_PER_CHUNK)
}

/// Splits `bytes` into chunks, zero-padding the last one.
///
/// An empty input yields no chunks; the Merkleizer substitutes zero subtrees.
pub fn pack_bytes(bytes: &[u8]) -> Vec<Hash> {
    bytes.chunks(BYTES_PER_CHUNK).map(Hash::right_padded).collect()
}

/// Places a little-endian `u64` at the start of an otherwise zero chunk.
pub fn uint_chunk(value: u64) -> Hash {
    Hash::right_padded(&value.to_le_bytes())
}

/// Encodes a list length or byte length for a mixin.
///
/// The value is little-endian in the low bytes, zero-filled to 32 bytes.
pub fn length_chunk(length: usize) -> Hash {
    uint_chunk(length as u64)
}

/// Depth of a balanced tree with room for `leaves` leaves.
///
/// Zero and one leaf both give a depth of zero (a single chunk).
pub const fn tree_depth(leaves: usize) -> u32 {
    if leaves <= 1 {
        0
    } else {
        leaves.next_power_of_two().trailing_zeros()
    }
}
