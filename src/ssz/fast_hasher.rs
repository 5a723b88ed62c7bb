//! Hand-written streaming hash tree root.
//!
//! Records push their leaves into a flat byte buffer through [`HashWalker`]
//! and collapse sub-ranges of that buffer into single chunks as each
//! subtree completes, so nothing but one shared buffer is allocated per
//! root. The walker knows nothing about schemas: each record spells out its
//! own field order and limits in its [`HashTreeRootWith`] impl.
//!
//! The reduction below is independent of
//! [`MerkleTree`](crate::types::merkle_tree::MerkleTree); the two paths only
//! share the two-to-one compression [`Hash::pair`].

use crate::ssz::error::{SszError, SszResult};
use crate::types::hash::{HASH_LEN, Hash};
use std::sync::OnceLock;

const CHUNK: usize = HASH_LEN;
const ZERO_LEVELS: usize = 65;

static ZERO_CHUNKS: OnceLock<Vec<[u8; CHUNK]>> = OnceLock::new();

fn zero_chunk(level: usize) -> [u8; CHUNK] {
    let table = ZERO_CHUNKS.get_or_init(|| {
        let mut table = Vec::with_capacity(ZERO_LEVELS);
        let mut node = [0u8; CHUNK];
        table.push(node);
        for _ in 1..ZERO_LEVELS {
            node = Hash::pair(&Hash(node), &Hash(node)).0;
            table.push(node);
        }
        table
    });
    table[level.min(ZERO_LEVELS - 1)]
}

fn depth_for(leaves: usize) -> usize {
    let mut depth = 0;
    while (1usize << depth) < leaves {
        depth += 1;
    }
    depth
}

/// Collapses `input` (whole chunks) into one root for a tree with room for
/// `limit` leaves, or exactly as many as given when `limit` is zero.
fn reduce(input: &[u8], limit: usize) -> [u8; CHUNK] {
    let count = input.len() / CHUNK;
    let depth = depth_for(limit.max(count));
    if count == 0 {
        return zero_chunk(depth);
    }

    let mut layer = input.to_vec();
    for level in 0..depth {
        if (layer.len() / CHUNK) % 2 == 1 {
            layer.extend_from_slice(&zero_chunk(level));
        }
        let mut next = Vec::with_capacity(layer.len() / 2);
        for pair in layer.chunks_exact(2 * CHUNK) {
            let mut left = [0u8; CHUNK];
            let mut right = [0u8; CHUNK];
            left.copy_from_slice(&pair[..CHUNK]);
            right.copy_from_slice(&pair[CHUNK..]);
            next.extend_from_slice(&Hash::pair(&Hash(left), &Hash(right)).0);
        }
        layer = next;
    }

    let mut root = [0u8; CHUNK];
    root.copy_from_slice(&layer[..CHUNK]);
    root
}

/// Leaf buffer shared by every record visited during one root computation.
#[derive(Debug, Default)]
pub struct HashWalker {
    buf: Vec<u8>,
}

impl HashWalker {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(32 * CHUNK),
        }
    }

    /// Marks the start of a subtree.
    pub fn index(&self) -> usize {
        self.buf.len()
    }

    /// Appends raw bytes; callers keep the buffer chunk aligned.
    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends bytes zero-padded up to the next chunk boundary.
    pub fn append_bytes32(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        let rest = bytes.len() % CHUNK;
        if rest != 0 {
            self.buf.resize(self.buf.len() + CHUNK - rest, 0);
        }
    }

    /// Fixed-size byte vector leaf.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        if bytes.len() <= CHUNK {
            self.append_bytes32(bytes);
        } else {
            let start = self.index();
            self.append_bytes32(bytes);
            self.merkleize(start);
        }
    }

    pub fn put_u64(&mut self, value: u64) {
        self.append_bytes32(&value.to_le_bytes());
    }

    /// 256-bit integer leaf, already little-endian.
    pub fn put_uint256(&mut self, le_bytes: &[u8; 32]) {
        self.append(le_bytes);
    }

    /// Replaces everything after `start` with its root.
    pub fn merkleize(&mut self, start: usize) {
        let root = reduce(&self.buf[start..], 0);
        self.buf.truncate(start);
        self.buf.extend_from_slice(&root);
    }

    /// Replaces everything after `start` with its root in a tree sized for
    /// `limit` leaves, mixed with `length`.
    pub fn merkleize_with_mixin(&mut self, start: usize, length: usize, limit: usize) {
        let root = reduce(&self.buf[start..], limit);
        let mut length_chunk = [0u8; CHUNK];
        length_chunk[..8].copy_from_slice(&(length as u64).to_le_bytes());
        let mixed = Hash::pair(&Hash(root), &Hash(length_chunk));
        self.buf.truncate(start);
        self.buf.extend_from_slice(&mixed.0);
    }

    /// Fails with `CapacityExceeded` when `actual > max`.
    pub fn ensure_capacity(field: &'static str, actual: usize, max: usize) -> SszResult<()> {
        if actual > max {
            return Err(SszError::CapacityExceeded { field, actual, max });
        }
        Ok(())
    }

    /// The single root left in the buffer.
    pub fn finish(self) -> SszResult<Hash> {
        if self.buf.len() != CHUNK {
            return Err(SszError::EncodedSizeMismatch {
                expected: CHUNK,
                actual: self.buf.len(),
            });
        }
        let mut root = [0u8; CHUNK];
        root.copy_from_slice(&self.buf);
        Ok(Hash(root))
    }
}

/// Records that can stream their own leaves into a [`HashWalker`].
pub trait HashTreeRootWith {
    fn hash_tree_root_with(&self, hh: &mut HashWalker) -> SszResult<()>;
}
