//! Structural projections between record shapes.

use crate::core::header::ExecutionPayloadHeader;
use crate::core::payload::ExecutionPayload;
use crate::ssz::error::SszResult;
use crate::ssz::version::ForkVersion;

/// A lossy, commitment-preserving transform into `T`.
pub trait Projection<T> {
    fn project(&self) -> SszResult<T>;
}

impl Projection<ExecutionPayloadHeader> for ExecutionPayload {
    /// Replaces the transaction and withdrawal lists by their roots.
    ///
    /// Defined for Deneb, Deneb1, Electra and Electra1 payloads only.
    fn project(&self) -> SszResult<ExecutionPayloadHeader> {
        match self.version {
            ForkVersion::Deneb
            | ForkVersion::Deneb1
            | ForkVersion::Electra
            | ForkVersion::Electra1 => {}
            other => return Err(other.unsupported("ExecutionPayloadHeader")),
        }

        Ok(ExecutionPayloadHeader {
            version: self.version,
            parent_hash: self.parent_hash,
            fee_recipient: self.fee_recipient,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom,
            prev_randao: self.prev_randao,
            block_number: self.block_number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            base_fee_per_gas: self.base_fee_per_gas,
            block_hash: self.block_hash,
            transactions_root: self.compute_transactions_root()?,
            withdrawals_root: self.compute_withdrawals_root()?,
            blob_gas_used: self.blob_gas_used,
            excess_blob_gas: self.excess_blob_gas,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::container::Container;
    use crate::ssz::error::SszError;
    use crate::utils::test_utils::utils::sample_payload;

    #[test]
    fn header_root_equals_payload_root() {
        for fork in [
            ForkVersion::Deneb,
            ForkVersion::Deneb1,
            ForkVersion::Electra,
            ForkVersion::Electra1,
        ] {
            let payload = sample_payload(fork);
            let header: ExecutionPayloadHeader = payload.project().unwrap();
            assert_eq!(header.version(), fork);
            assert_eq!(
                header.hash_tree_root().unwrap(),
                payload.hash_tree_root().unwrap()
            );
        }
    }

    #[test]
    fn projection_before_deneb_is_unsupported() {
        for fork in [ForkVersion::Bellatrix, ForkVersion::Capella] {
            let result: SszResult<ExecutionPayloadHeader> = sample_payload(fork).project();
            assert!(matches!(
                result,
                Err(SszError::UnsupportedVersion {
                    context: "ExecutionPayloadHeader",
                    ..
                })
            ));
        }
    }

    #[test]
    fn null_withdrawals_project_to_the_empty_root() {
        let mut payload = sample_payload(ForkVersion::Deneb);
        payload.withdrawals = None;
        let header: ExecutionPayloadHeader = payload.project().unwrap();
        let mut empty = payload.clone();
        empty.withdrawals = Some(Vec::new());
        assert_eq!(header.withdrawals_root, empty.compute_withdrawals_root().unwrap());
        assert_eq!(header.hash_tree_root().unwrap(), payload.hash_tree_root().unwrap());
    }
}
