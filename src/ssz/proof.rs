//! Merkle branches from a container root down to one of its fields.
//!
//! A container's tree has one leaf per field, so field `i` of a container
//! with `n` fields sits at generalized index `2^depth(n) + i`. Payloads and
//! headers share their tree shape, which makes a branch for a header's
//! `withdrawals_root` equally valid against the payload it came from.

use crate::ssz::error::{SszError, SszResult};
use crate::ssz::merkleize::field_roots;
use crate::ssz::schema::{FieldDescriptor, Schema};
use crate::ssz::value::Value;
use crate::types::chunk::tree_depth;
use crate::types::hash::Hash;
use crate::types::merkle_tree::MerkleTree;

/// One field's root and the branch binding it to its container's root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProof {
    pub field: &'static str,
    pub gindex: u64,
    pub leaf: Hash,
    /// Siblings from the leaf up, deepest first.
    pub branch: Vec<Hash>,
}

impl FieldProof {
    /// Checks that the branch leads from the leaf to `root`.
    pub fn verify(&self, root: Hash) -> SszResult<()> {
        match MerkleTree::root_from_branch(self.leaf, &self.branch, self.gindex) {
            Some(computed) if computed == root => Ok(()),
            _ => Err(SszError::ProofMismatch {
                gindex: self.gindex,
                expected: root,
            }),
        }
    }
}

/// Proves field `index` of a container laid out by `schema`.
pub fn prove_field(schema: &Schema, values: &[Value<'_>], index: usize) -> SszResult<FieldProof> {
    let out_of_range = || SszError::FieldIndexOutOfRange {
        container: schema.container(),
        index,
        fields: schema.fields().len(),
    };
    let field = schema.fields().get(index).ok_or_else(out_of_range)?;

    let descriptors: Vec<&FieldDescriptor> = schema.descriptors().collect();
    let roots = field_roots(&descriptors, values)?;
    let leaf = roots.get(index).copied().ok_or_else(out_of_range)?;
    let depth = tree_depth(roots.len());
    let branch = MerkleTree::proof(roots, None, index).ok_or_else(out_of_range)?;

    Ok(FieldProof {
        field: field.name,
        gindex: (1u64 << depth) + index as u64,
        leaf,
        branch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::merkleize::hash_schema;
    use crate::ssz::schema::{FieldKind, UintWidth};
    use crate::ssz::version::ForkVersion;
    use crate::types::chunk::uint_chunk;

    static TABLE: &[FieldDescriptor] = &[
        FieldDescriptor::new("a", FieldKind::Uint(UintWidth::U64)),
        FieldDescriptor::new("b", FieldKind::Uint(UintWidth::U64)),
        FieldDescriptor::new("c", FieldKind::VariableBytes { max_len: 64 }),
    ];

    fn schema() -> Schema {
        Schema::from_table("Three", TABLE, ForkVersion::Phase0, ForkVersion::Deneb).unwrap()
    }

    fn values() -> Vec<Value<'static>> {
        vec![Value::Uint(1), Value::Uint(2), Value::bytes(b"three")]
    }

    #[test]
    fn each_field_proves_against_the_root() {
        let root = hash_schema(&schema(), &values()).unwrap();
        for index in 0..TABLE.len() {
            let proof = prove_field(&schema(), &values(), index).unwrap();
            assert_eq!(proof.field, TABLE[index].name);
            assert_eq!(proof.gindex, 4 + index as u64);
            assert_eq!(proof.branch.len(), 2);
            proof.verify(root).unwrap();
        }
    }

    #[test]
    fn branch_of_the_first_field() {
        let proof = prove_field(&schema(), &values(), 0).unwrap();
        assert_eq!(proof.leaf, uint_chunk(1));
        assert_eq!(proof.branch[0], uint_chunk(2));
    }

    #[test]
    fn tampered_proofs_fail() {
        let root = hash_schema(&schema(), &values()).unwrap();
        let proof = prove_field(&schema(), &values(), 1).unwrap();

        let mut wrong_leaf = proof.clone();
        wrong_leaf.leaf = uint_chunk(3);
        assert_eq!(
            wrong_leaf.verify(root).unwrap_err(),
            SszError::ProofMismatch {
                gindex: 5,
                expected: root
            }
        );

        let mut wrong_position = proof;
        wrong_position.gindex = 4;
        assert!(wrong_position.verify(root).is_err());
    }

    #[test]
    fn index_past_the_table_is_rejected() {
        assert_eq!(
            prove_field(&schema(), &values(), 3).unwrap_err(),
            SszError::FieldIndexOutOfRange {
                container: "Three",
                index: 3,
                fields: 3
            }
        );
    }
}
