//! Read-only field access shared by payloads and headers.
//!
//! Alternate encodings (a JSON mirror, an RPC response) read records through
//! this trait and never touch the SSZ machinery.

use crate::core::header::ExecutionPayloadHeader;
use crate::core::payload::ExecutionPayload;
use crate::ssz::error::SszResult;
use crate::types::address::Address;
use crate::types::bloom::LogsBloom;
use crate::types::hash::Hash;
use crate::types::uint256::U256;

/// Getters for every payload field a header also carries.
pub trait PayloadView {
    /// True when bulk lists are replaced by roots.
    fn is_blinded(&self) -> bool;
    fn parent_hash(&self) -> Hash;
    fn fee_recipient(&self) -> Address;
    fn state_root(&self) -> Hash;
    fn receipts_root(&self) -> Hash;
    fn logs_bloom(&self) -> &LogsBloom;
    fn prev_randao(&self) -> Hash;
    fn block_number(&self) -> u64;
    fn gas_limit(&self) -> u64;
    fn gas_used(&self) -> u64;
    fn timestamp(&self) -> u64;
    fn extra_data(&self) -> &[u8];
    fn base_fee_per_gas(&self) -> U256;
    fn block_hash(&self) -> Hash;
    fn transactions_root(&self) -> SszResult<Hash>;
    /// A null withdrawal list reads as the empty list's root.
    fn withdrawals_root(&self) -> SszResult<Hash>;
    fn blob_gas_used(&self) -> u64;
    fn excess_blob_gas(&self) -> u64;
}

// Both records name their shared fields identically.
macro_rules! impl_common_getters {
    () => {
        fn parent_hash(&self) -> Hash {
            self.parent_hash
        }

        fn fee_recipient(&self) -> Address {
            self.fee_recipient
        }

        fn state_root(&self) -> Hash {
            self.state_root
        }

        fn receipts_root(&self) -> Hash {
            self.receipts_root
        }

        fn logs_bloom(&self) -> &LogsBloom {
            &self.logs_bloom
        }

        fn prev_randao(&self) -> Hash {
            self.prev_randao
        }

        fn block_number(&self) -> u64 {
            self.block_number
        }

        fn gas_limit(&self) -> u64 {
            self.gas_limit
        }

        fn gas_used(&self) -> u64 {
            self.gas_used
        }

        fn timestamp(&self) -> u64 {
            self.timestamp
        }

        fn extra_data(&self) -> &[u8] {
            &self.extra_data
        }

        fn base_fee_per_gas(&self) -> U256 {
            self.base_fee_per_gas
        }

        fn block_hash(&self) -> Hash {
            self.block_hash
        }

        fn blob_gas_used(&self) -> u64 {
            self.blob_gas_used
        }

        fn excess_blob_gas(&self) -> u64 {
            self.excess_blob_gas
        }
    };
}

impl PayloadView for ExecutionPayload {
    impl_common_getters!();

    fn is_blinded(&self) -> bool {
        false
    }

    fn transactions_root(&self) -> SszResult<Hash> {
        self.compute_transactions_root()
    }

    fn withdrawals_root(&self) -> SszResult<Hash> {
        self.compute_withdrawals_root()
    }
}

impl PayloadView for ExecutionPayloadHeader {
    impl_common_getters!();

    fn is_blinded(&self) -> bool {
        true
    }

    fn transactions_root(&self) -> SszResult<Hash> {
        Ok(self.transactions_root)
    }

    fn withdrawals_root(&self) -> SszResult<Hash> {
        Ok(self.withdrawals_root)
    }
}
