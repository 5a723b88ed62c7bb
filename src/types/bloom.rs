//! 256-byte logs bloom filter carried verbatim by the payload.

/// Bloom length in bytes.
pub const LOGS_BLOOM_LEN: usize = 256;

/// Logs bloom of an execution block.
///
/// Opaque to the codec: encoded as a 256-byte vector and hashed as eight
/// chunks merkleized without a length mixin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LogsBloom(pub [u8; LOGS_BLOOM_LEN]);

impl LogsBloom {
    /// Returns an empty bloom.
    pub const fn zero() -> LogsBloom {
        LogsBloom([0u8; LOGS_BLOOM_LEN])
    }

    /// Returns the bloom as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Default for LogsBloom {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[u8; LOGS_BLOOM_LEN]> for LogsBloom {
    fn from(bytes: [u8; LOGS_BLOOM_LEN]) -> Self {
        LogsBloom(bytes)
    }
}
