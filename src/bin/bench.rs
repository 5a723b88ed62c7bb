//! Codec and hasher benchmark binary.
//!
//! Measures encode, decode and both hash tree root paths over a busy payload.
//! Run with: `cargo run --release --bin bench`

use std::hint::black_box;
use std::time::{Duration, Instant};

use bytes::Bytes;
use payload_ssz::core::builder::ExecutionPayloadBuilder;
use payload_ssz::core::header::ExecutionPayloadHeader;
use payload_ssz::core::payload::ExecutionPayload;
use payload_ssz::core::projection::Projection;
use payload_ssz::core::withdrawal::Withdrawal;
use payload_ssz::ssz::limits::MAX_WITHDRAWALS_PER_PAYLOAD;
use payload_ssz::ssz::{
    Container, DualPathCheck, ForkVersion, SchemaHasher, StreamingHasher, TreeHasher,
};
use payload_ssz::types::address::Address;
use payload_ssz::types::hash::Hash;
use payload_ssz::types::uint256::U256;
use payload_ssz::utils::parallel::set_parallelism;

// ---------------------------------------------------------------------------
// Benchmark harness
// ---------------------------------------------------------------------------

struct BenchResult {
    name: &'static str,
    iterations: u64,
    total: Duration,
    /// Bytes processed per run (None to omit throughput).
    bytes: Option<u64>,
}

impl BenchResult {
    fn avg(&self) -> Duration {
        self.total / self.iterations as u32
    }

    fn print(&self) {
        let ns_per_op = self.avg().as_nanos();
        let throughput = self
            .bytes
            .filter(|_| ns_per_op > 0)
            .map(|n| format!("{:>8.1}", n as f64 * 1000.0 / ns_per_op as f64))
            .unwrap_or_else(|| "       -".to_string());
        println!(
            "  {:<30} {:>7} iters {:>10.3} us/iter  {} MB/s",
            self.name,
            self.iterations,
            ns_per_op as f64 / 1000.0,
            throughput,
        );
    }
}

/// Runs `f` for at least `min_duration`, returning aggregated results.
fn bench<F>(name: &'static str, min_duration: Duration, bytes: Option<u64>, mut f: F) -> BenchResult
where
    F: FnMut(),
{
    // Warmup
    for _ in 0..5 {
        f();
    }

    let mut iterations = 0u64;
    let start = Instant::now();
    while start.elapsed() < min_duration {
        f();
        iterations += 1;
    }
    let total = start.elapsed();

    BenchResult {
        name,
        iterations,
        total,
        bytes,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const TRANSACTION_COUNT: usize = 256;
const TRANSACTION_LEN: usize = 320;

fn fill_hash(byte: u8) -> Hash {
    Hash([byte; 32])
}

/// A Deneb payload with a full withdrawal list and a few hundred transactions.
fn busy_payload(version: ForkVersion) -> ExecutionPayload {
    let transactions = (0..TRANSACTION_COUNT)
        .map(|i| Bytes::from(vec![(i % 251) as u8; TRANSACTION_LEN]))
        .collect();
    let withdrawals = (0..MAX_WITHDRAWALS_PER_PAYLOAD as u64)
        .map(|i| Withdrawal {
            index: i,
            validator_index: 500_000 + i,
            address: Address([i as u8; 20]),
            amount: 32_000_000_000 + i,
        })
        .collect();

    ExecutionPayloadBuilder::new(version)
        .parent_hash(fill_hash(0x01))
        .fee_recipient(Address([0x02; 20]))
        .state_root(fill_hash(0x03))
        .receipts_root(fill_hash(0x04))
        .prev_randao(fill_hash(0x05))
        .block_number(19_426_587)
        .gas_limit(30_000_000)
        .gas_used(29_000_000)
        .timestamp(1_710_338_135)
        .extra_data(Bytes::from_static(b"bench"))
        .base_fee_per_gas(U256::from(25_000_000_000u64))
        .block_hash(fill_hash(0x06))
        .transactions(transactions)
        .withdrawals(withdrawals)
        .blob_gas_used(786_432)
        .excess_blob_gas(0)
        .build()
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let min = Duration::from_secs(2);
    let version = ForkVersion::Deneb;
    let payload = busy_payload(version);

    let encoded = match payload.encode() {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Failed to encode bench payload: {}", e);
            std::process::exit(1);
        }
    };
    let size = Some(encoded.len() as u64);
    let header: ExecutionPayloadHeader = match payload.project() {
        Ok(header) => header,
        Err(e) => {
            eprintln!("Failed to project bench payload: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "\nPayload SSZ Benchmarks ({} layout, {} bytes, {} transactions)",
        version,
        encoded.len(),
        TRANSACTION_COUNT
    );
    println!("{}", "-".repeat(84));

    let mut results = Vec::new();

    results.push(bench("encode", min, size, || {
        black_box(black_box(&payload).encode().ok());
    }));

    results.push(bench("decode", min, size, || {
        black_box(ExecutionPayload::decode(black_box(&encoded), version).ok());
    }));

    results.push(bench("schema_root", min, size, || {
        black_box(SchemaHasher.hash_tree_root(black_box(&payload)).ok());
    }));

    {
        let _sequential = set_parallelism(false);
        results.push(bench("schema_root_sequential", min, size, || {
            black_box(SchemaHasher.hash_tree_root(black_box(&payload)).ok());
        }));
    }

    results.push(bench("streaming_root", min, size, || {
        black_box(StreamingHasher.hash_tree_root(black_box(&payload)).ok());
    }));

    results.push(bench("dual_path_verify", min, size, || {
        black_box(DualPathCheck::verify(black_box(&payload)).ok());
    }));

    results.push(bench("header_root", min, None, || {
        black_box(StreamingHasher.hash_tree_root(black_box(&header)).ok());
    }));

    for r in &results {
        r.print();
    }
    println!();
}
