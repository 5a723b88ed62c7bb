//! 256-bit unsigned integer stored in its little-endian wire form.
//!
//! The codec never does arithmetic on 256-bit values; it only moves them
//! between the wire, the record and a Merkle chunk. Keeping the canonical
//! little-endian bytes makes all three conversions plain copies.

use std::fmt;

/// Width of a 256-bit integer in bytes.
pub const U256_LEN: usize = 32;

/// Unsigned 256-bit integer (e.g. the payload base fee per gas).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct U256([u8; U256_LEN]);

impl U256 {
    /// Zero.
    pub const ZERO: U256 = U256([0u8; U256_LEN]);

    /// Largest representable value.
    pub const MAX: U256 = U256([0xff; U256_LEN]);

    /// Builds a value from its little-endian representation.
    pub const fn from_le_bytes(bytes: [u8; U256_LEN]) -> Self {
        U256(bytes)
    }

    /// Returns the little-endian representation.
    pub const fn to_le_bytes(self) -> [u8; U256_LEN] {
        self.0
    }

    /// Borrows the little-endian representation.
    pub fn as_le_slice(&self) -> &[u8] {
        &self.0
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        U256::from(value as u128)
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; U256_LEN];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        U256(bytes)
    }
}

impl fmt::Display for U256 {
    /// Big-endian hex without leading zeroes, e.g. `0x3b9aca00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.0.iter().rposition(|&b| b != 0);
        let Some(first) = first else {
            return write!(f, "0x0");
        };
        write!(f, "0x{:x}", self.0[first])?;
        for byte in self.0[..first].iter().rev() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
