//! Execution payload: the versioned record carried in a beacon block body.
//!
//! The field table below is the single source of truth for the payload's
//! wire layout and Merkle leaf order. The layout is the same 17 fields at
//! every fork from Bellatrix on; only nullability changes, and withdrawals
//! are the one nullable field (until Capella).

use crate::core::withdrawal::Withdrawal;
use crate::ssz::container::{Container, object_from_row, object_rows};
use crate::ssz::error::SszResult;
use crate::ssz::fast_hasher::{HashTreeRootWith, HashWalker};
use crate::ssz::limits::{
    EXTRA_DATA_SIZE, MAX_BYTES_PER_TX, MAX_TXS_PER_PAYLOAD, MAX_WITHDRAWALS_PER_PAYLOAD,
};
use crate::ssz::merkleize::field_root;
use crate::ssz::schema::{FieldDescriptor, FieldKind, UintWidth};
use crate::ssz::value::{FieldValues, Value};
use crate::ssz::version::{ForkVersion, Presence};
use crate::types::address::{ADDRESS_LEN, Address};
use crate::types::bloom::{LOGS_BLOOM_LEN, LogsBloom};
use crate::types::chunk::chunk_count;
use crate::types::hash::{HASH_LEN, Hash};
use crate::types::uint256::U256;
use bytes::Bytes;

/// Execution payload fields in declaration order.
pub(crate) const PAYLOAD_FIELDS: &[FieldDescriptor] = &[
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
    FieldDescriptor::new(
        "transactions",
        FieldKind::ListOfVariableBytes {
            max_count: MAX_TXS_PER_PAYLOAD,
            max_item_len: MAX_BYTES_PER_TX,
        },
    ),
    FieldDescriptor::new(
        "withdrawals",
        FieldKind::ListOfStaticObjects {
            max_count: MAX_WITHDRAWALS_PER_PAYLOAD,
            element: WITHDRAWAL_FIELDS,
        },
    )
    .presence(Presence::RequiredFrom(ForkVersion::Capella)),
    FieldDescriptor::new("blob_gas_used", FieldKind::Uint(UintWidth::U64)),
    FieldDescriptor::new("excess_blob_gas", FieldKind::Uint(UintWidth::U64)),
];

const WITHDRAWAL_FIELDS: &[FieldDescriptor] =
    <Withdrawal as crate::ssz::container::StaticObject>::FIELDS;

/// Execution payload tagged with the fork it belongs to.
///
/// Built with [`ExecutionPayloadBuilder`](crate::core::builder::ExecutionPayloadBuilder)
/// or decoded from bytes; immutable afterwards. Fields read through
/// [`PayloadView`](crate::core::view::PayloadView).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPayload {
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
    pub(crate) transactions: Vec<Bytes>,
    /// `None` only before Capella. Encodes and hashes as an empty list.
    pub(crate) withdrawals: Option<Vec<Withdrawal>>,
    pub(crate) blob_gas_used: u64,
    pub(crate) excess_blob_gas: u64,
}

impl ExecutionPayload {
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
    pub const TRANSACTIONS: usize = 13;
    pub const WITHDRAWALS: usize = 14;
    pub const BLOB_GAS_USED: usize = 15;
    pub const EXCESS_BLOB_GAS: usize = 16;

    pub fn version(&self) -> ForkVersion {
        self.version
    }

    /// Opaque transactions in block order.
    pub fn transactions(&self) -> &[Bytes] {
        &self.transactions
    }

    pub fn withdrawals(&self) -> Option<&[Withdrawal]> {
        self.withdrawals.as_deref()
    }

    /// Root of the transaction list, as a header commits to it.
    pub(crate) fn compute_transactions_root(&self) -> SszResult<Hash> {
        let field = &PAYLOAD_FIELDS[Self::TRANSACTIONS];
        let value = self.field(Self::TRANSACTIONS);
        crate::ssz::codec::check_fields(&[field], std::slice::from_ref(&value))?;
        field_root(field, &value)
    }

    /// Root of the withdrawal list. A null list has the empty list's root.
    pub(crate) fn compute_withdrawals_root(&self) -> SszResult<Hash> {
        let field = &PAYLOAD_FIELDS[Self::WITHDRAWALS];
        let value = self.field(Self::WITHDRAWALS);
        crate::ssz::codec::check_fields(&[field], std::slice::from_ref(&value))?;
        field_root(field, &value)
    }
}

impl Container for ExecutionPayload {
    const NAME: &'static str = "ExecutionPayload";
    const FIELDS: &'static [FieldDescriptor] = PAYLOAD_FIELDS;
    const SINCE: ForkVersion = ForkVersion::Bellatrix;

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
            Self::TRANSACTIONS => Value::bytes_list(&self.transactions),
            Self::WITHDRAWALS => self
                .withdrawals
                .as_deref()
                .map_or(Value::Absent, object_rows),
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
            transactions: fields.bytes_list(Self::TRANSACTIONS)?.unwrap_or_default(),
            withdrawals: fields.objects(Self::WITHDRAWALS, object_from_row)?,
            blob_gas_used: fields.uint(Self::BLOB_GAS_USED)?,
            excess_blob_gas: fields.uint(Self::EXCESS_BLOB_GAS)?,
        })
    }
}

impl HashTreeRootWith for ExecutionPayload {
    fn hash_tree_root_with(&self, hh: &mut HashWalker) -> SszResult<()> {
        if self.version < ForkVersion::Bellatrix {
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

        HashWalker::ensure_capacity(
            "transactions",
            self.transactions.len(),
            MAX_TXS_PER_PAYLOAD,
        )?;
        let txs = hh.index();
        for tx in &self.transactions {
            HashWalker::ensure_capacity("transactions", tx.len(), MAX_BYTES_PER_TX)?;
            let idx = hh.index();
            hh.append_bytes32(tx);
            hh.merkleize_with_mixin(idx, tx.len(), chunk_count(MAX_BYTES_PER_TX));
        }
        hh.merkleize_with_mixin(txs, self.transactions.len(), MAX_TXS_PER_PAYLOAD);

        let withdrawals = self.withdrawals.as_deref().unwrap_or_default();
        HashWalker::ensure_capacity(
            "withdrawals",
            withdrawals.len(),
            MAX_WITHDRAWALS_PER_PAYLOAD,
        )?;
        let idx = hh.index();
        for withdrawal in withdrawals {
            withdrawal.hash_tree_root_with(hh)?;
        }
        hh.merkleize_with_mixin(idx, withdrawals.len(), MAX_WITHDRAWALS_PER_PAYLOAD);

        hh.put_u64(self.blob_gas_used);
        hh.put_u64(self.excess_blob_gas);

        hh.merkleize(start);
        Ok(())
    }
}
