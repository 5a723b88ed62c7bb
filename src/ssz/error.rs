use crate::types::hash::Hash;
use std::fmt;

/// Four-byte fork version as carried on the wire, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionBytes(pub [u8; 4]);

impl fmt::Display for VersionBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Errors raised while encoding, decoding or hashing versioned records.
///
/// Every failure is local and deterministic: the input is wholly invalid,
/// there is no partial result and nothing to retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SszError {
    /// No schema or projection is defined for this version.
    #[error("unsupported version {version} for {context}")]
    UnsupportedVersion {
        context: &'static str,
        version: VersionBytes,
    },

    /// A list count or byte length is over its declared maximum.
    #[error("{field}: {actual} exceeds capacity {max}")]
    CapacityExceeded {
        field: &'static str,
        actual: usize,
        max: usize,
    },

    /// The buffer is shorter than the static region requires.
    #[error("{context}: truncated input, needed {needed} bytes, got {available}")]
    TruncatedInput {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    /// A variable field's offset is smaller than the previous one.
    #[error("{field}: offset {offset} precedes previous offset {previous}")]
    OffsetOutOfOrder {
        field: &'static str,
        offset: usize,
        previous: usize,
    },

    /// An offset points outside the region it must address.
    #[error("{field}: offset {offset} out of bounds (bound {bound})")]
    OffsetOutOfBounds {
        field: &'static str,
        offset: usize,
        bound: usize,
    },

    /// A field required at the record's version is absent.
    #[error("missing required field '{0}'")]
    MissingRequiredField(&'static str),

    /// A region is not a whole number of fixed-size elements.
    #[error("{field}: length {len} is not a multiple of element size {element_size}")]
    InvalidLength {
        field: &'static str,
        len: usize,
        element_size: usize,
    },

    /// Bytes remain after a fixed-size container was fully read.
    #[error("{context}: {remaining} trailing bytes after {consumed}")]
    TrailingBytes {
        context: &'static str,
        consumed: usize,
        remaining: usize,
    },

    /// A record produced a value its descriptor cannot hold.
    #[error("{field}: value does not match descriptor, expected {expected}")]
    ValueKindMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// An integer does not fit its declared width.
    #[error("{field}: value {value} does not fit in {bits} bits")]
    UintOverflow {
        field: &'static str,
        value: u64,
        bits: u16,
    },

    /// The encoder wrote a different number of bytes than it accounted for.
    #[error("encoded {actual} bytes, size accounting expected {expected}")]
    EncodedSizeMismatch { expected: usize, actual: usize },

    /// The schema-driven and streaming hashers disagree.
    #[error("hash-tree-root mismatch: schema {schema}, streaming {streaming}")]
    RootMismatch { schema: Hash, streaming: Hash },

    /// A field index is past the end of a container's field table.
    #[error("{container}: no field at index {index} ({fields} fields)")]
    FieldIndexOutOfRange {
        container: &'static str,
        index: usize,
        fields: usize,
    },

    /// A Merkle branch does not lead to the expected root.
    #[error("proof for generalized index {gindex} does not lead to root {expected}")]
    ProofMismatch { gindex: u64, expected: Hash },

    /// A fork activation table is malformed.
    #[error("invalid fork schedule: {0}")]
    InvalidForkSchedule(String),
}

/// Convenient alias for codec results.
pub type SszResult<T> = Result<T, SszError>;
