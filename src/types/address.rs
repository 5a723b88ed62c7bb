//! 20-byte execution-layer addresses.

use std::fmt;

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Fixed-size 20-byte address identifying an execution-layer account.
///
/// Used for the payload fee recipient and withdrawal targets. On the wire it
/// is a 20-byte vector; for hashing it occupies one zero-padded chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Returns the all-zero address.
    pub const fn zero() -> Address {
        Address([0u8; ADDRESS_LEN])
    }

    /// Returns the address as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }
}
