//! Binary Merkle reduction over 32-byte chunks.
//!
//! Behavior:
//! - The tree width is the next power of two of the declared capacity (or of
//!   the leaf count when no capacity is given), never of the data alone.
//! - Missing leaves are zero chunks; missing subtrees use precomputed
//!   zero-subtree hashes, so padding never costs more than one hash per level.
//! - Reduction runs in place over the leaf vector.
//! - A branch lists the sibling of every node on the way from a leaf to the
//!   root, deepest first; the leaf's generalized index is `2^depth + index`.

use crate::types::chunk::{length_chunk, tree_depth};
use crate::types::hash::Hash;
use std::sync::OnceLock;

/// Deepest zero subtree precomputed; enough for any `usize` capacity.
pub const MAX_TREE_DEPTH: usize = 64;

static ZERO_HASHES: OnceLock<[Hash; MAX_TREE_DEPTH + 1]> = OnceLock::new();

/// Utility functions to build roots from chunk lists.
pub struct MerkleTree;

impl MerkleTree {
    /// Root of a subtree of depth `depth` whose leaves are all zero chunks.
    pub fn zero_hash(depth: usize) -> Hash {
        let table = ZERO_HASHES.get_or_init(|| {
            let mut table = [Hash::zero(); MAX_TREE_DEPTH + 1];
            for i in 1..=MAX_TREE_DEPTH {
                table[i] = Hash::pair(&table[i - 1], &table[i - 1]);
            }
            table
        });
        table[depth.min(MAX_TREE_DEPTH)]
    }

    /// Computes the root of `nodes` in a tree sized for `limit` leaves.
    ///
    /// With `limit = None` the tree is sized for the leaves actually given.
    /// Callers enforce `nodes.len() <= limit`; an oversized input is sized by
    /// its own length instead of panicking.
    pub fn merkleize(mut nodes: Vec<Hash>, limit: Option<usize>) -> Hash {
        let capacity = limit.unwrap_or(nodes.len()).max(nodes.len());
        let depth = tree_depth(capacity) as usize;

        if nodes.is_empty() {
            return Self::zero_hash(depth);
        }

        let mut len = nodes.len();
        for level in 0..depth {
            len = Self::reduce_level(&mut nodes, len, level);
        }

        nodes[0]
    }

    /// Hashes the first `len` nodes pairwise into the front of `nodes`,
    /// padding an odd tail with the zero subtree of `level`.
    fn reduce_level(nodes: &mut [Hash], len: usize, level: usize) -> usize {
        let mut write = 0;
        let mut read = 0;

        while read < len {
            let left = nodes[read];
            let right = if read + 1 < len {
                nodes[read + 1]
            } else {
                Self::zero_hash(level)
            };

            nodes[write] = Hash::pair(&left, &right);

            write += 1;
            read += 2;
        }

        write
    }

    /// Sibling path of leaf `index` in the tree [`MerkleTree::merkleize`]
    /// builds from the same arguments, deepest sibling first.
    ///
    /// Returns `None` when `index` is past the tree's width.
    pub fn proof(mut nodes: Vec<Hash>, limit: Option<usize>, index: usize) -> Option<Vec<Hash>> {
        let capacity = limit.unwrap_or(nodes.len()).max(nodes.len());
        let depth = tree_depth(capacity) as usize;
        if index.checked_shr(depth as u32).unwrap_or(0) != 0 {
            return None;
        }

        let mut branch = Vec::with_capacity(depth);
        let mut position = index;
        let mut len = nodes.len();
        for level in 0..depth {
            let sibling = position ^ 1;
            branch.push(if sibling < len {
                nodes[sibling]
            } else {
                Self::zero_hash(level)
            });
            len = Self::reduce_level(&mut nodes, len, level);
            position >>= 1;
        }
        Some(branch)
    }

    /// Folds `leaf` up `branch` along the path encoded by `gindex`.
    ///
    /// Returns `None` when `gindex` does not sit exactly `branch.len()`
    /// levels below the root.
    pub fn root_from_branch(leaf: Hash, branch: &[Hash], gindex: u64) -> Option<Hash> {
        let depth = u32::try_from(branch.len()).ok()?;
        if gindex.checked_shr(depth) != Some(1) {
            return None;
        }
        let mut node = leaf;
        let mut path = gindex;
        for sibling in branch {
            node = if path & 1 == 1 {
                Hash::pair(sibling, &node)
            } else {
                Hash::pair(&node, sibling)
            };
            path >>= 1;
        }
        Some(node)
    }

    /// Binds `root` to an actual length or element count.
    pub fn mix_in_length(root: Hash, length: usize) -> Hash {
        Hash::pair(&root, &length_chunk(length))
    }
}
