//! Encoding and decoding of SSZ basic values.
//!
//! Basic values are the fixed-width leaves of every record: unsigned
//! integers and byte vectors. They have no length prefix and no
//! offsets; composite layouts (offset tables, lists) live in
//! [`crate::ssz::codec`] and are built out of these.
//!
//! # Binary Format
//!
//! - Integers: little-endian, fixed-width (`u8`, `u16`, `u32`, `u64`, 256-bit)
//! - Byte vectors `[u8; N]` and newtypes around them: raw bytes, no prefix

use crate::ssz::error::{SszError, SszResult};
use crate::types::address::Address;
use crate::types::bloom::LogsBloom;
use crate::types::hash::Hash;
use crate::types::uint256::U256;

/// Sink for writing encoded bytes.
///
/// Lets values encode straight into the target buffer.
pub trait EncodeSink {
    /// Writes the given bytes to the sink.
    fn write(&mut self, bytes: &[u8]);
}

impl EncodeSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// A fixed-width SSZ basic value.
pub trait Encode {
    /// Number of bytes every value of this type occupies on the wire.
    const FIXED_LEN: usize;

    /// Writes the binary representation to the given sink.
    fn encode<S: EncodeSink>(&self, out: &mut S);

    /// Serializes to a new byte buffer with exact capacity.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::FIXED_LEN);
        self.encode(&mut out);
        out
    }
}

/// Decoding counterpart of [`Encode`].
pub trait Decode: Sized {
    /// Reads and decodes a value from the input buffer.
    ///
    /// Advances the input slice past the consumed bytes.
    fn decode(input: &mut &[u8]) -> SszResult<Self>;

    /// Decodes a value from a byte slice, requiring all bytes to be consumed.
    fn from_bytes(data: &[u8]) -> SszResult<Self> {
        let mut input = data;
        let value = Self::decode(&mut input)?;

        if !input.is_empty() {
            return Err(SszError::TrailingBytes {
                context: "basic value",
                consumed: data.len() - input.len(),
                remaining: input.len(),
            });
        }

        Ok(value)
    }
}

/// Reads exactly `n` bytes from the input, advancing the slice.
pub(crate) fn read_bytes<'a>(input: &mut &'a [u8], n: usize) -> SszResult<&'a [u8]> {
    if input.len() < n {
        return Err(SszError::TruncatedInput {
            context: "basic value",
            needed: n,
            available: input.len(),
        });
    }
    let (bytes, rest) = input.split_at(n);
    *input = rest;
    Ok(bytes)
}

/// Reads a fixed-size byte array from the input.
fn read_array<const N: usize>(input: &mut &[u8]) -> SszResult<[u8; N]> {
    let bytes = read_bytes(input, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

// Macro for fixed-size integer types
macro_rules! impl_uint {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                const FIXED_LEN: usize = std::mem::size_of::<$t>();

                fn encode<S: EncodeSink>(&self, out: &mut S) {
                    out.write(&self.to_le_bytes());
                }
            }

            impl Decode for $t {
                fn decode(input: &mut &[u8]) -> SszResult<Self> {
                    Ok(<$t>::from_le_bytes(read_array(input)?))
                }
            }
        )*
    };
}

impl_uint!(u8, u16, u32, u64);

// Byte vectors
impl<const N: usize> Encode for [u8; N] {
    const FIXED_LEN: usize = N;

    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(self);
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(input: &mut &[u8]) -> SszResult<Self> {
        read_array(input)
    }
}

// Newtypes over byte vectors share the array layout.
macro_rules! impl_byte_newtype {
    ($($t:ident => $n:expr),*) => {
        $(
            impl Encode for $t {
                const FIXED_LEN: usize = $n;

                fn encode<S: EncodeSink>(&self, out: &mut S) {
                    out.write(&self.0);
                }
            }

            impl Decode for $t {
                fn decode(input: &mut &[u8]) -> SszResult<Self> {
                    Ok($t(read_array(input)?))
                }
            }
        )*
    };
}

impl_byte_newtype!(
    Hash => crate::types::hash::HASH_LEN,
    Address => crate::types::address::ADDRESS_LEN,
    LogsBloom => crate::types::bloom::LOGS_BLOOM_LEN
);

impl Encode for U256 {
    const FIXED_LEN: usize = crate::types::uint256::U256_LEN;

    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(self.as_le_slice());
    }
}

impl Decode for U256 {
    fn decode(input: &mut &[u8]) -> SszResult<Self> {
        Ok(U256::from_le_bytes(read_array(input)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_little_endian() {
        let val: u32 = 0x12345678;
        let bytes = val.to_bytes();
        assert_eq!(bytes.as_slice(), &[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(u32::from_bytes(&bytes).unwrap(), val);
    }

    #[test]
    fn u64_extremes() {
        for val in [0u64, 1, u64::MAX / 2, u64::MAX] {
            let bytes = val.to_bytes();
            assert_eq!(bytes.len(), u64::FIXED_LEN);
            assert_eq!(u64::from_bytes(&bytes).unwrap(), val);
        }
    }

    #[test]
    fn byte_vectors_have_no_prefix() {
        let arr: [u8; 4] = [1, 2, 3, 4];
        assert_eq!(arr.to_bytes(), vec![1, 2, 3, 4]);

        let address = Address([7u8; 20]);
        assert_eq!(address.to_bytes().len(), 20);
        assert_eq!(Address::from_bytes(&address.to_bytes()).unwrap(), address);
    }

    #[test]
    fn u256_keeps_wire_order() {
        let value = U256::from(0xdead_beefu64);
        let bytes = value.to_bytes();
        assert_eq!(&bytes[..4], &[0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(U256::from_bytes(&bytes).unwrap(), value);
    }

    #[test]
    fn truncated_input_is_reported() {
        let result = u32::from_bytes(&[0x12, 0x34]);
        assert!(matches!(
            result,
            Err(SszError::TruncatedInput {
                needed: 4,
                available: 2,
                ..
            })
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let result = u8::from_bytes(&[42u8, 0xff]);
        assert!(matches!(result, Err(SszError::TrailingBytes { remaining: 1, .. })));
    }

    #[test]
    fn decode_advances_input() {
        let mut input: &[u8] = &[0x01, 0x02, 0x03, 0x04, 0x05];

        let first = u8::decode(&mut input).unwrap();
        assert_eq!(first, 0x01);
        assert_eq!(input.len(), 4);

        let second = u16::decode(&mut input).unwrap();
        assert_eq!(second, 0x0302);
        assert_eq!(input.len(), 2);
    }
}
