//! Execution payload header: the payload with its two bulk lists replaced by
//! their roots.
//!
//! A header commits to exactly the same data as the payload it was projected
//! from, so the two share one hash tree root.

use crate::ssz::container::Container;
use crate::ssz::error::SszResult;
use crate::ssz::fast_hasher::{HashTreeRootWith, HashWalker};
use crate::ssz::limits::EXTRA_DATA_SIZE;
use crate::ssz::schema::{FieldDescriptor, FieldKind, UintWidth};
use crate::ssz::value::{FieldValues, Value};
use crate::ssz::version::ForkVersion;
use crate::types::address::{ADDRESS_LEN, Address};
use crate::types::bloom::{LOGS_BLOOM_LEN, LogsBloom};
use crate::types::chunk::chunk_count;
use crate::types::hash::{HASH_LEN, Hash};
use crate::types::uint256::U256;
use bytes::Bytes;

const HEADER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("parent_hash", FieldKind::FixedBytes(HASH_LEN)),
    FieldDescriptor::new("fee_recipient", FieldKind::FixedBytes(ADDRESS_LEN)),
    FieldDescriptor::new("state_root", FieldKind::FixedBytes(HASH_LEN)),
    FieldDescriptor::new("receipts_root", FieldKind::FixedBytes(HASH_LEN)),
    FieldDescriptor::new("logs_bloom", FieldKind::FixedBytes(LOGS_BLOOM_LEN)),
    FieldDescriptor::new("prev_randao", FieldKind::FixedBytes(HASH_LEN)),
    FieldDescriptor::new("block_number", FieldKind::Uint(UintWidth::U64)),
    FieldDescriptor::new("gas_limit", FieldKind::Uint(UintWidth::U64)),
    FieldDescriptor::new("gas_used", FieldKind::Uint(UintWidth::U64)),
    FieldDescriptor::new("timestamp", FieldKind::Uint(UintWidth::U64)),
    FieldDescriptor::new(
        "extra_data",
        FieldKind::VariableBytes {
            max_len: EXTRA_DATA_SIZE,
        },
    ),
    FieldDescriptor::new("base_fee_per_gas", FieldKind::Uint(UintWidth::U256)),
    FieldDescriptor::new("block_hash", FieldKind::FixedBytes(HASH_LEN)),
    FieldDescriptor::new("transactions_root", FieldKind::FixedBytes(HASH_LEN)),
    FieldDescriptor::new("withdrawals_root", FieldKind::FixedBytes(HASH_LEN)),
    FieldDescriptor::new("blob_gas_used", FieldKind::Uint(UintWidth::U64)),
    FieldDescriptor::new("excess_blob_gas", FieldKind::Uint(UintWidth::U64)),
];

/// Header of a Deneb-or-later execution payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPayloadHeader {
    pub(crate) version: ForkVersion,
    pub(crate) parent_hash: Hash,
    pub(crate) fee_recipient: Address,
    pub(crate) state_root: Hash,
    pub(crate) receipts_root: Hash,
    pub(crate) logs_bloom: LogsBloom,
    pub(crate) prev_randao: Hash,
    pub(crate) block_number: u64,
    pub(crate) gas_limit: u64,
    pub(crate) gas_used: u64,
    pub(crate) timestamp: u64,
    pub(crate) extra_data: Bytes,
    pub(crate) base_fee_per_gas: U256,
    pub(crate) block_hash: Hash,
    pub(crate) transactions_root: Hash,
    pub(crate) withdrawals_root: Hash,
    pub(crate) blob_gas_used: u64,
    pub(crate) excess_blob_gas: u64,
}

impl ExecutionPayloadHeader {
    pub const PARENT_HASH: usize = 0;
    pub const FEE_RECIPIENT: usize = 1;
    pub const STATE_ROOT: usize = 2;
    pub const RECEIPTS_ROOT: usize = 3;
    pub const LOGS_BLOOM: usize = 4;
    pub const PREV_RANDAO: usize = 5;
    pub const BLOCK_NUMBER: usize = 6;
    pub const GAS_LIMIT: usize = 7;
    pub const GAS_USED: usize = 8;
    pub const TIMESTAMP: usize = 9;
    pub const EXTRA_DATA: usize = 10;
    pub const BASE_FEE_PER_GAS: usize = 11;
    pub const BLOCK_HASH: usize = 12;
    pub const TRANSACTIONS_ROOT: usize = 13;
    pub const WITHDRAWALS_ROOT: usize = 14;
    pub const BLOB_GAS_USED: usize = 15;
    pub const EXCESS_BLOB_GAS: usize = 16;

    pub fn version(&self) -> ForkVersion {
        self.version
    }
}

impl Container for ExecutionPayloadHeader {
    const NAME: &'static str = "ExecutionPayloadHeader";
    const FIELDS: &'static [FieldDescriptor] = HEADER_FIELDS;
    const SINCE: ForkVersion = ForkVersion::Deneb;

    fn version(&self) -> ForkVersion {
        self.version
    }

    fn field(&self, index: usize) -> Value<'_> {
        match index {
            Self::PARENT_HASH => Value::fixed(self.parent_hash.as_slice()),
            Self::FEE_RECIPIENT => Value::fixed(self.fee_recipient.as_slice()),
            Self::STATE_ROOT => Value::fixed(self.state_root.as_slice()),
            Self::RECEIPTS_ROOT => Value::fixed(self.receipts_root.as_slice()),
            Self::LOGS_BLOOM => Value::fixed(self.logs_bloom.as_slice()),
            Self::PREV_RANDAO => Value::fixed(self.prev_randao.as_slice()),
            Self::BLOCK_NUMBER => Value::Uint(self.block_number),
            Self::GAS_LIMIT => Value::Uint(self.gas_limit),
            Self::GAS_USED => Value::Uint(self.gas_used),
            Self::TIMESTAMP => Value::Uint(self.timestamp),
            Self::EXTRA_DATA => Value::bytes(&self.extra_data),
            Self::BASE_FEE_PER_GAS => Value::Uint256(self.base_fee_per_gas),
            Self::BLOCK_HASH => Value::fixed(self.block_hash.as_slice()),
            Self::TRANSACTIONS_ROOT => Value::fixed(self.transactions_root.as_slice()),
            Self::WITHDRAWALS_ROOT => Value::fixed(self.withdrawals_root.as_slice()),
            Self::BLOB_GAS_USED => Value::Uint(self.blob_gas_used),
            Self::EXCESS_BLOB_GAS => Value::Uint(self.excess_blob_gas),
            _ => Value::Absent,
        }
    }

    fn from_fields(version: ForkVersion, mut fields: FieldValues<'_>) -> SszResult<Self> {
        Ok(Self {
            version,
            parent_hash: Hash(fields.fixed(Self::PARENT_HASH)?),
            fee_recipient: Address(fields.fixed(Self::FEE_RECIPIENT)?),
            state_root: Hash(fields.fixed(Self::STATE_ROOT)?),
            receipts_root: Hash(fields.fixed(Self::RECEIPTS_ROOT)?),
            logs_bloom: LogsBloom(fields.fixed(Self::LOGS_BLOOM)?),
            prev_randao: Hash(fields.fixed(Self::PREV_RANDAO)?),
            block_number: fields.uint(Self::BLOCK_NUMBER)?,
            gas_limit: fields.uint(Self::GAS_LIMIT)?,
            gas_used: fields.uint(Self::GAS_USED)?,
            timestamp: fields.uint(Self::TIMESTAMP)?,
            extra_data: fields.bytes(Self::EXTRA_DATA)?,
            base_fee_per_gas: fields.uint256(Self::BASE_FEE_PER_GAS)?,
            block_hash: Hash(fields.fixed(Self::BLOCK_HASH)?),
            transactions_root: Hash(fields.fixed(Self::TRANSACTIONS_ROOT)?),
            withdrawals_root: Hash(fields.fixed(Self::WITHDRAWALS_ROOT)?),
            blob_gas_used: fields.uint(Self::BLOB_GAS_USED)?,
            excess_blob_gas: fields.uint(Self::EXCESS_BLOB_GAS)?,
        })
    }
}

impl HashTreeRootWith for ExecutionPayloadHeader {
    fn hash_tree_root_with(&self, hh: &mut HashWalker) -> SszResult<()> {
        if self.version < Self::SINCE {
            return Err(self.version.unsupported(Self::NAME));
        }
        let start = hh.index();

        hh.put_bytes(&self.parent_hash.0);
        hh.put_bytes(&self.fee_recipient.0);
        hh.put_bytes(&self.state_root.0);
        hh.put_bytes(&self.receipts_root.0);
        hh.put_bytes(&self.logs_bloom.0);
        hh.put_bytes(&self.prev_randao.0);
        hh.put_u64(self.block_number);
        hh.put_u64(self.gas_limit);
        hh.put_u64(self.gas_used);
        hh.put_u64(self.timestamp);

        HashWalker::ensure_capacity("extra_data", self.extra_data.len(), EXTRA_DATA_SIZE)?;
        let idx = hh.index();
        hh.append_bytes32(&self.extra_data);
        hh.merkleize_with_mixin(idx, self.extra_data.len(), chunk_count(EXTRA_DATA_SIZE));

        hh.put_uint256(&self.base_fee_per_gas.to_le_bytes());
        hh.put_bytes(&self.block_hash.0);
        hh.put_bytes(&self.transactions_root.0);
        hh.put_bytes(&self.withdrawals_root.0);
        hh.put_u64(self.blob_gas_used);
        hh.put_u64(self.excess_blob_gas);

        hh.merkleize(start);
        Ok(())
    }
}
