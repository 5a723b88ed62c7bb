//! Fixed-width primitives and Merkle building blocks.
//!
//! This module provides the leaf types every record is made of:
//! - `Hash`: 32-byte SHA-256 digests and chunks
//! - `Address`, `LogsBloom`, `U256`: byte-vector and integer field types
//! - `encoding`: little-endian wire form of basic values
//! - `chunk` and `merkle_tree`: chunk packing and capacity-sized Merkle trees

pub mod address;
pub mod bloom;
pub mod chunk;
pub mod encoding;
pub mod hash;
pub mod merkle_tree;
pub mod uint256;
