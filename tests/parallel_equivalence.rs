#![cfg(feature = "parallel")]

mod common;

use bytes::Bytes;
use common::{populated_payload, zeroed_payload};
use payload_ssz::ssz::{Container, DualPathCheck, ForkVersion};
use payload_ssz::utils::parallel::{PARALLEL_THRESHOLD, parallelism_enabled, set_parallelism};
use std::sync::{Mutex, MutexGuard, PoisonError};

// The switch is process-wide and the harness runs tests on several threads.
static SWITCH: Mutex<()> = Mutex::new(());

fn exclusive_switch() -> MutexGuard<'static, ()> {
    SWITCH.lock().unwrap_or_else(PoisonError::into_inner)
}

#[test]
fn long_transaction_list_hashes_the_same_sequentially() {
    let _lock = exclusive_switch();
    let transactions: Vec<Bytes> = (0..PARALLEL_THRESHOLD * 4)
        .map(|i| Bytes::from(vec![i as u8; i % 97]))
        .collect();
    let payload = zeroed_payload(ForkVersion::Deneb)
        .transactions(transactions)
        .build();

    let baseline = {
        let _guard = set_parallelism(false);
        payload.hash_tree_root().expect("sequential root")
    };
    assert!(parallelism_enabled());
    let parallel = payload.hash_tree_root().expect("parallel root");
    assert_eq!(baseline, parallel);
    assert_eq!(DualPathCheck::verify(&payload).expect("dual path"), parallel);
}

#[test]
fn short_lists_are_unaffected_by_the_switch() {
    let _lock = exclusive_switch();
    let payload = populated_payload(ForkVersion::Capella);
    let baseline = {
        let _guard = set_parallelism(false);
        assert!(!parallelism_enabled());
        payload.hash_tree_root().expect("sequential root")
    };
    assert!(parallelism_enabled());
    assert_eq!(baseline, payload.hash_tree_root().expect("parallel root"));
}
