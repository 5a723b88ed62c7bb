//! Protocol capacity constants for the execution payload.

/// Maximum number of transactions in one payload (2^20).
pub const MAX_TXS_PER_PAYLOAD: usize = 1 << 20;

/// Maximum size of one opaque transaction in bytes (2^30).
pub const MAX_BYTES_PER_TX: usize = 1 << 30;

/// Maximum number of withdrawals processed in one payload.
pub const MAX_WITHDRAWALS_PER_PAYLOAD: usize = 16;

/// Maximum length of the payload extra data.
pub const EXTRA_DATA_SIZE: usize = 32;

/// Width of an offset entry in an offset table.
pub const BYTES_PER_OFFSET: usize = 4;
