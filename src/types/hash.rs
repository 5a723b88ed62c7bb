//! 32-byte SHA-256 digest type used for chunks, tree nodes and roots.

use sha2::{Digest, Sha256};
use std::fmt;

/// Digest length in bytes, equal to the Merkle chunk width.
pub const HASH_LEN: usize = 32;

/// Fixed-size 32-byte value: a SHA-256 digest, a Merkle chunk or a root.
///
/// This type is `Copy` for performance: tree reduction moves nodes around
/// constantly and 32 bytes are cheaper to copy than to reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash, Ord, PartialOrd)]
pub struct Hash(pub [u8; HASH_LEN]);

impl Hash {
    /// Creates a zero-valued hash (all bytes are 0x00).
    ///
    /// This is also the zero chunk used to pad Merkle leaves.
    pub const fn zero() -> Hash {
        Hash([0u8; HASH_LEN])
    }

    /// Returns the hash as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Copies `bytes` into a hash, zero-padding on the right.
    ///
    /// Inputs longer than [`HASH_LEN`] are truncated; callers chunk first.
    pub fn right_padded(bytes: &[u8]) -> Hash {
        let mut out = [0u8; HASH_LEN];
        let n = bytes.len().min(HASH_LEN);
        out[..n].copy_from_slice(&bytes[..n]);
        Hash(out)
    }

    /// Creates a new SHA-256 hash builder for incremental hashing.
    pub fn sha256() -> HashBuilder {
        HashBuilder::new()
    }

    /// The 64-byte-in, 32-byte-out compression used for every tree node.
    pub fn pair(left: &Hash, right: &Hash) -> Hash {
        let mut h = Hash::sha256();
        h.update(&left.0);
        h.update(&right.0);
        h.finalize()
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; HASH_LEN]> for Hash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Hash(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Incremental SHA-256 hash builder.
pub struct HashBuilder {
    hasher: Sha256,
}

impl HashBuilder {
    /// Creates a new hash builder with empty state.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Feeds data into the hash computation.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Consumes the builder and returns the final hash.
    pub fn finalize(self) -> Hash {
        Hash(self.hasher.finalize().into())
    }
}

impl Default for HashBuilder {
    fn default() -> Self {
        Self::new()
    }
}
