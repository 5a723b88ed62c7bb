#![allow(dead_code)]

use bytes::Bytes;
use payload_ssz::core::builder::ExecutionPayloadBuilder;
use payload_ssz::core::payload::ExecutionPayload;
use payload_ssz::core::withdrawal::Withdrawal;
use payload_ssz::ssz::limits::{EXTRA_DATA_SIZE, MAX_WITHDRAWALS_PER_PAYLOAD};
use payload_ssz::ssz::ForkVersion;
use payload_ssz::types::address::Address;
use payload_ssz::types::bloom::{LOGS_BLOOM_LEN, LogsBloom};
use payload_ssz::types::hash::Hash;
use payload_ssz::types::uint256::U256;
use proptest::prelude::*;

/// Every fork the payload is defined at.
pub const PAYLOAD_VERSIONS: [ForkVersion; 6] = [
    ForkVersion::Bellatrix,
    ForkVersion::Capella,
    ForkVersion::Deneb,
    ForkVersion::Deneb1,
    ForkVersion::Electra,
    ForkVersion::Electra1,
];

pub fn withdrawal(index: u64) -> Withdrawal {
    Withdrawal {
        index,
        validator_index: 7_000 + index,
        address: Address([0x40 | index as u8; 20]),
        amount: 32_000_000_000 + index,
    }
}

/// Builder for a payload whose fixed fields are all zero and whose lists are empty.
pub fn zeroed_payload(version: ForkVersion) -> ExecutionPayloadBuilder {
    ExecutionPayloadBuilder::new(version)
}

/// A populated payload with a handful of transactions and withdrawals.
pub fn populated_payload(version: ForkVersion) -> ExecutionPayload {
    ExecutionPayloadBuilder::new(version)
        .parent_hash(Hash([0x01; 32]))
        .fee_recipient(Address([0x02; 20]))
        .state_root(Hash([0x03; 32]))
        .receipts_root(Hash([0x04; 32]))
        .prev_randao(Hash([0x05; 32]))
        .block_number(21_000_000)
        .gas_limit(36_000_000)
        .gas_used(15_000_000)
        .timestamp(1_746_612_311)
        .extra_data(Bytes::from_static(b"integration"))
        .base_fee_per_gas(U256::from(4_000_000_000u64))
        .block_hash(Hash([0x06; 32]))
        .push_transaction(Bytes::from_static(&[0x02, 0xf8, 0x6f]))
        .push_transaction(Bytes::new())
        .push_transaction(Bytes::from(vec![0xab; 512]))
        .withdrawals((0..4).map(withdrawal).collect())
        .blob_gas_used(262_144)
        .excess_blob_gas(131_072)
        .build()
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

pub fn arb_version() -> impl Strategy<Value = ForkVersion> {
    prop::sample::select(PAYLOAD_VERSIONS.to_vec())
}

pub fn arb_hash() -> impl Strategy<Value = Hash> {
    prop_oneof![
        Just(Hash::zero()),
        Just(Hash([0xff; 32])),
        any::<[u8; 32]>().prop_map(Hash),
    ]
}

pub fn arb_address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address)
}

pub fn arb_u64() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), Just(u64::MAX), any::<u64>()]
}

pub fn arb_u256() -> impl Strategy<Value = U256> {
    prop_oneof![
        Just(U256::ZERO),
        Just(U256::MAX),
        any::<[u8; 32]>().prop_map(U256::from_le_bytes),
    ]
}

pub fn arb_bloom() -> impl Strategy<Value = LogsBloom> {
    prop_oneof![
        Just(LogsBloom::zero()),
        prop::collection::vec(any::<u8>(), LOGS_BLOOM_LEN).prop_map(|bytes| {
            let mut bloom = [0u8; LOGS_BLOOM_LEN];
            bloom.copy_from_slice(&bytes);
            LogsBloom(bloom)
        }),
    ]
}

pub fn arb_extra_data() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        Just(Vec::new()),
        Just(vec![0x5a; EXTRA_DATA_SIZE]),
        prop::collection::vec(any::<u8>(), 0..=EXTRA_DATA_SIZE),
    ]
}

/// Mostly short lists, sometimes long enough to cross the parallel threshold.
pub fn arb_transactions() -> impl Strategy<Value = Vec<Bytes>> {
    let tx = prop::collection::vec(any::<u8>(), 0..160).prop_map(Bytes::from);
    let small_tx = prop::collection::vec(any::<u8>(), 0..8).prop_map(Bytes::from);
    prop_oneof![
        3 => prop::collection::vec(tx, 0..6),
        1 => prop::collection::vec(small_tx, 64..72),
    ]
}

pub fn arb_withdrawal() -> impl Strategy<Value = Withdrawal> {
    (arb_u64(), arb_u64(), arb_address(), arb_u64()).prop_map(
        |(index, validator_index, address, amount)| Withdrawal {
            index,
            validator_index,
            address,
            amount,
        },
    )
}

pub fn arb_withdrawals() -> impl Strategy<Value = Vec<Withdrawal>> {
    prop_oneof![
        Just(Vec::new()),
        prop::collection::vec(arb_withdrawal(), MAX_WITHDRAWALS_PER_PAYLOAD),
        prop::collection::vec(arb_withdrawal(), 0..=MAX_WITHDRAWALS_PER_PAYLOAD),
    ]
}

/// Valid payloads across every payload fork, boundary values included.
pub fn arb_payload() -> impl Strategy<Value = ExecutionPayload> {
    let roots = (
        arb_version(),
        arb_hash(),
        arb_address(),
        arb_hash(),
        arb_hash(),
        arb_bloom(),
        arb_hash(),
    );
    let scalars = (
        arb_u64(),
        arb_u64(),
        arb_u64(),
        arb_u64(),
        arb_extra_data(),
        arb_u256(),
        arb_hash(),
    );
    let lists = (arb_transactions(), arb_withdrawals(), arb_u64(), arb_u64());

    (roots, scalars, lists).prop_map(
        |(
            (version, parent_hash, fee_recipient, state_root, receipts_root, bloom, prev_randao),
            (block_number, gas_limit, gas_used, timestamp, extra_data, base_fee, block_hash),
            (transactions, withdrawals, blob_gas_used, excess_blob_gas),
        )| {
            ExecutionPayloadBuilder::new(version)
                .parent_hash(parent_hash)
                .fee_recipient(fee_recipient)
                .state_root(state_root)
                .receipts_root(receipts_root)
                .logs_bloom(bloom)
                .prev_randao(prev_randao)
                .block_number(block_number)
                .gas_limit(gas_limit)
                .gas_used(gas_used)
                .timestamp(timestamp)
                .extra_data(extra_data)
                .base_fee_per_gas(base_fee)
                .block_hash(block_hash)
                .transactions(transactions)
                .withdrawals(withdrawals)
                .blob_gas_used(blob_gas_used)
                .excess_blob_gas(excess_blob_gas)
                .build()
        },
    )
}
