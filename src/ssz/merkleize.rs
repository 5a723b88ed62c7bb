//! Schema-driven hash tree root.
//!
//! Every field is reduced to one 32-byte root according to its
//! [`FieldKind`]; the container root is the Merkle root of those field roots
//! in declaration order. A top-level container's field roots are independent
//! and are computed in parallel when parallelism is enabled.
//!
//! | Kind                  | Root                                                        |
//! |-----------------------|-------------------------------------------------------------|
//! | `FixedBytes(n <= 32)` | bytes right-padded to one chunk                             |
//! | `FixedBytes(n > 32)`  | `merkleize(pack(bytes))`                                    |
//! | `Uint`                | little-endian value in one chunk                            |
//! | `VariableBytes`       | `mix(merkleize(pack(bytes), chunks(max_len)), len)`         |
//! | `ListOfVariableBytes` | `mix(merkleize(item roots, max_count), count)`              |
//! | `ListOfStaticObjects` | `mix(merkleize(object roots, max_count), count)`            |

use crate::ssz::codec::check_fields;
use crate::ssz::error::{SszError, SszResult};
use crate::ssz::schema::{FieldDescriptor, FieldKind, Schema};
use crate::ssz::value::Value;
use crate::types::chunk::{BYTES_PER_CHUNK, chunk_count, pack_bytes, uint_chunk};
use crate::types::hash::Hash;
use crate::types::merkle_tree::MerkleTree;
use crate::utils::parallel::{try_map, try_map_each};

/// Hash tree root of a container resolved by `schema`.
pub fn hash_schema(schema: &Schema, values: &[Value<'_>]) -> SszResult<Hash> {
    let fields: Vec<&FieldDescriptor> = schema.descriptors().collect();
    hash_fields(&fields, values)
}

/// Root of a field list. Values are validated before anything is hashed.
pub fn hash_fields(fields: &[&FieldDescriptor], values: &[Value<'_>]) -> SszResult<Hash> {
    Ok(MerkleTree::merkleize(field_roots(fields, values)?, None))
}

/// The leaves of a container's tree: one validated root per field.
pub fn field_roots(fields: &[&FieldDescriptor], values: &[Value<'_>]) -> SszResult<Vec<Hash>> {
    if fields.len() != values.len() {
        return Err(SszError::ValueKindMismatch {
            field: "container",
            expected: "one value per schema field",
        });
    }
    check_fields(fields, values)?;
    let pairs: Vec<(&FieldDescriptor, &Value<'_>)> =
        fields.iter().copied().zip(values).collect();
    try_map_each(&pairs, |(field, value)| field_root(field, value))
}

/// Root of a list element, on the calling thread.
fn container_root(fields: &[&FieldDescriptor], values: &[Value<'_>]) -> SszResult<Hash> {
    let roots = fields
        .iter()
        .zip(values)
        .map(|(field, value)| field_root(field, value))
        .collect::<SszResult<Vec<_>>>()?;
    Ok(MerkleTree::merkleize(roots, None))
}

/// Root of a single field value.
///
/// Absent lists hash as empty lists. Capacities are assumed checked.
pub fn field_root(field: &FieldDescriptor, value: &Value<'_>) -> SszResult<Hash> {
    let root = match (&field.kind, value) {
        (FieldKind::FixedBytes(n), Value::Fixed(bytes)) if *n <= BYTES_PER_CHUNK => {
            Hash::right_padded(bytes)
        }
        (FieldKind::FixedBytes(_), Value::Fixed(bytes)) => {
            MerkleTree::merkleize(pack_bytes(bytes), None)
        }
        (FieldKind::Uint(_), Value::Uint(v)) => uint_chunk(*v),
        (FieldKind::Uint(_), Value::Uint256(v)) => Hash(v.to_le_bytes()),
        (FieldKind::VariableBytes { max_len }, Value::Bytes(bytes)) => {
            byte_list_root(bytes, *max_len)
        }
        (
            FieldKind::ListOfVariableBytes {
                max_count,
                max_item_len,
            },
            Value::BytesList(items),
        ) => {
            let roots = try_map(items, |item| Ok(byte_list_root(item, *max_item_len)))?;
            list_root(roots, *max_count, items.len())
        }
        (FieldKind::ListOfStaticObjects { max_count, element }, Value::Objects(rows)) => {
            let element: Vec<&FieldDescriptor> = element.iter().collect();
            let roots = try_map(rows, |row| container_root(&element, row))?;
            list_root(roots, *max_count, rows.len())
        }
        (kind, Value::Absent) if kind.is_list() => list_root(Vec::new(), list_limit(kind), 0),
        (_, Value::Absent) => return Err(SszError::MissingRequiredField(field.name)),
        _ => {
            return Err(SszError::ValueKindMismatch {
                field: field.name,
                expected: "value matching the field kind",
            });
        }
    };
    Ok(root)
}

fn list_limit(kind: &FieldKind) -> usize {
    match kind {
        FieldKind::ListOfVariableBytes { max_count, .. }
        | FieldKind::ListOfStaticObjects { max_count, .. } => *max_count,
        _ => 0,
    }
}

/// Root of a byte list bounded by `max_len` bytes.
pub fn byte_list_root(bytes: &[u8], max_len: usize) -> Hash {
    let root = MerkleTree::merkleize(pack_bytes(bytes), Some(chunk_count(max_len)));
    MerkleTree::mix_in_length(root, bytes.len())
}

fn list_root(roots: Vec<Hash>, max_count: usize, count: usize) -> Hash {
    MerkleTree::mix_in_length(MerkleTree::merkleize(roots, Some(max_count)), count)
}
