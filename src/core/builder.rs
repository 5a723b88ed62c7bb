//! Step-by-step construction of an [`ExecutionPayload`].

use crate::core::chain_spec::ChainSpec;
use crate::core::payload::ExecutionPayload;
use crate::core::withdrawal::Withdrawal;
use crate::debug;
use crate::ssz::version::ForkVersion;
use crate::types::address::Address;
use crate::types::bloom::LogsBloom;
use crate::types::hash::Hash;
use crate::types::uint256::U256;
use bytes::Bytes;

/// Collects payload fields; unset fields keep their zero or empty defaults.
///
/// Starting from Capella the withdrawal list starts out empty rather than
/// null.
#[derive(Debug, Clone)]
pub struct ExecutionPayloadBuilder {
    payload: ExecutionPayload,
}

impl ExecutionPayloadBuilder {
    pub fn new(version: ForkVersion) -> Self {
        Self {
            payload: ExecutionPayload {
                version,
                parent_hash: Hash::zero(),
                fee_recipient: Address::zero(),
                state_root: Hash::zero(),
                receipts_root: Hash::zero(),
                logs_bloom: LogsBloom::zero(),
                prev_randao: Hash::zero(),
                block_number: 0,
                gas_limit: 0,
                gas_used: 0,
                timestamp: 0,
                extra_data: Bytes::new(),
                base_fee_per_gas: U256::ZERO,
                block_hash: Hash::zero(),
                transactions: Vec::new(),
                withdrawals: version
                    .equals_or_is_after(ForkVersion::Capella)
                    .then(Vec::new),
                blob_gas_used: 0,
                excess_blob_gas: 0,
            },
        }
    }

    /// Starts a payload for `timestamp`, tagged with the fork `spec` puts it in.
    pub fn for_timestamp(spec: &impl ChainSpec, timestamp: u64) -> Self {
        Self::new(spec.version_for_timestamp(timestamp)).timestamp(timestamp)
    }

    pub fn parent_hash(mut self, hash: Hash) -> Self {
        self.payload.parent_hash = hash;
        self
    }

    pub fn fee_recipient(mut self, address: Address) -> Self {
        self.payload.fee_recipient = address;
        self
    }

    pub fn state_root(mut self, root: Hash) -> Self {
        self.payload.state_root = root;
        self
    }

    pub fn receipts_root(mut self, root: Hash) -> Self {
        self.payload.receipts_root = root;
        self
    }

    pub fn logs_bloom(mut self, bloom: LogsBloom) -> Self {
        self.payload.logs_bloom = bloom;
        self
    }

    pub fn prev_randao(mut self, randao: Hash) -> Self {
        self.payload.prev_randao = randao;
        self
    }

    pub fn block_number(mut self, number: u64) -> Self {
        self.payload.block_number = number;
        self
    }

    pub fn gas_limit(mut self, gas: u64) -> Self {
        self.payload.gas_limit = gas;
        self
    }

    pub fn gas_used(mut self, gas: u64) -> Self {
        self.payload.gas_used = gas;
        self
    }

    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.payload.timestamp = timestamp;
        self
    }

    pub fn extra_data(mut self, data: impl Into<Bytes>) -> Self {
        self.payload.extra_data = data.into();
        self
    }

    pub fn base_fee_per_gas(mut self, fee: U256) -> Self {
        self.payload.base_fee_per_gas = fee;
        self
    }

    pub fn block_hash(mut self, hash: Hash) -> Self {
        self.payload.block_hash = hash;
        self
    }

    pub fn transactions(mut self, txs: Vec<Bytes>) -> Self {
        self.payload.transactions = txs;
        self
    }

    pub fn push_transaction(mut self, tx: impl Into<Bytes>) -> Self {
        self.payload.transactions.push(tx.into());
        self
    }

    pub fn withdrawals(mut self, withdrawals: Vec<Withdrawal>) -> Self {
        self.payload.withdrawals = Some(withdrawals);
        self
    }

    pub fn blob_gas_used(mut self, gas: u64) -> Self {
        self.payload.blob_gas_used = gas;
        self
    }

    pub fn excess_blob_gas(mut self, gas: u64) -> Self {
        self.payload.excess_blob_gas = gas;
        self
    }

    /// Finishes the payload.
    ///
    /// Before Capella an empty withdrawal list is stored as null, which is
    /// what decoding the encoded payload at that fork yields.
    pub fn build(mut self) -> ExecutionPayload {
        let payload = &mut self.payload;
        let version = payload.version;
        if !version.equals_or_is_after(ForkVersion::Capella)
            && payload.withdrawals.as_ref().is_some_and(Vec::is_empty)
        {
            debug!("empty withdrawals stored as null at {}", version);
            payload.withdrawals = None;
        }
        self.payload
    }
}
