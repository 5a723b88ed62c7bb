//! Record-facing traits tying typed structs to the schema machinery.
//!
//! A record declares its field table once and exposes each field as a
//! borrowed [`Value`]; encoding, decoding and the generic root all follow
//! from that.

use crate::ssz::codec;
use crate::ssz::error::SszResult;
use crate::ssz::hasher::{SchemaHasher, TreeHasher};
use crate::ssz::merkleize;
use crate::ssz::proof::{self, FieldProof};
use crate::ssz::schema::{FieldDescriptor, Schema};
use crate::ssz::value::{FieldValues, Value};
use crate::ssz::version::{ForkVersion, VersionGate};
use crate::types::hash::Hash;

/// A versioned top-level record.
pub trait Container: Sized {
    const NAME: &'static str;

    /// The record's fields, in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// First fork the record is defined at.
    const SINCE: ForkVersion;

    fn version(&self) -> ForkVersion;

    /// Borrowed view of the field at `index` in [`Container::FIELDS`].
    fn field(&self, index: usize) -> Value<'_>;

    /// Rebuilds a record from decoded values.
    fn from_fields(version: ForkVersion, fields: FieldValues<'_>) -> SszResult<Self>;

    fn schema(&self) -> SszResult<Schema> {
        Schema::resolve::<Self>(self.version())
    }

    /// One value per field, in wire order.
    fn values(&self) -> Vec<Value<'_>> {
        (0..Self::FIELDS.len()).map(|i| self.field(i)).collect()
    }

    /// Exact length of [`Container::encode`]'s output.
    fn encoded_len(&self) -> SszResult<usize> {
        let schema = self.schema()?;
        let values = self.values();
        let fields: Vec<&FieldDescriptor> = schema.descriptors().collect();
        codec::check_fields(&fields, &values)?;
        codec::encoded_size(&fields, &values)
    }

    fn encode(&self) -> SszResult<Vec<u8>> {
        let schema = self.schema()?;
        codec::encode(&schema, &self.values())
    }

    /// Decodes `bytes` laid out at `version` and applies the version gate.
    fn decode(bytes: &[u8], version: ForkVersion) -> SszResult<Self> {
        let schema = Schema::resolve::<Self>(version)?;
        let mut values = codec::decode(&schema, bytes)?;
        VersionGate::post_decode_validate(&schema, &mut values)?;
        Self::from_fields(version, FieldValues::new(Self::FIELDS, values))
    }

    /// Root computed by the schema-driven Merkleizer.
    fn hash_tree_root(&self) -> SszResult<Hash> {
        SchemaHasher.hash_tree_root(self)
    }

    /// Branch binding the field at `index` to [`Container::hash_tree_root`].
    fn field_proof(&self, index: usize) -> SszResult<FieldProof> {
        let schema = self.schema()?;
        proof::prove_field(&schema, &self.values(), index)
    }
}

impl Schema {
    /// Resolves a container's table at `version`.
    pub fn resolve<C: Container>(version: ForkVersion) -> SszResult<Schema> {
        Schema::from_table(C::NAME, C::FIELDS, C::SINCE, version)
    }
}

/// A fixed-size, version-independent element of a list.
pub trait StaticObject: Sized {
    const NAME: &'static str;
    const FIELDS: &'static [FieldDescriptor];

    fn field(&self, index: usize) -> Value<'_>;

    fn from_fields(fields: FieldValues<'_>) -> SszResult<Self>;

    /// One value per field, in declaration order.
    fn to_values(&self) -> Vec<Value<'_>> {
        (0..Self::FIELDS.len()).map(|i| self.field(i)).collect()
    }

    /// Root computed by the schema-driven Merkleizer.
    fn object_root(&self) -> SszResult<Hash> {
        let schema = Schema::element(Self::NAME, Self::FIELDS);
        merkleize::hash_schema(&schema, &self.to_values())
    }
}

/// Borrows a list of objects as one value row per element.
pub fn object_rows<T: StaticObject>(items: &[T]) -> Value<'_> {
    Value::Objects(items.iter().map(StaticObject::to_values).collect())
}

/// Rebuilds one element from a decoded value row.
pub fn object_from_row<T: StaticObject>(row: Vec<Value<'_>>) -> SszResult<T> {
    T::from_fields(FieldValues::new(T::FIELDS, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::error::SszError;
    use crate::ssz::schema::{FieldKind, UintWidth};
    use crate::ssz::version::Presence;

    #[derive(Debug, Clone, PartialEq)]
    struct Pair {
        left: u64,
        right: [u8; 4],
    }

    impl StaticObject for Pair {
        const NAME: &'static str = "Pair";
        const FIELDS: &'static [FieldDescriptor] = &[
            FieldDescriptor::new("left", FieldKind::Uint(UintWidth::U64)),
            FieldDescriptor::new("right", FieldKind::FixedBytes(4)),
        ];

        fn field(&self, index: usize) -> Value<'_> {
            match index {
                0 => Value::Uint(self.left),
                1 => Value::fixed(&self.right),
                _ => Value::Absent,
            }
        }

        fn from_fields(mut fields: FieldValues<'_>) -> SszResult<Self> {
            Ok(Self {
                left: fields.uint(0)?,
                right: fields.fixed(1)?,
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        version: ForkVersion,
        id: u64,
        pairs: Option<Vec<Pair>>,
        extra: u64,
    }

    impl Container for Record {
        const NAME: &'static str = "Record";
        const FIELDS: &'static [FieldDescriptor] = &[
            FieldDescriptor::new("id", FieldKind::Uint(UintWidth::U64)),
            FieldDescriptor::new(
                "pairs",
                FieldKind::ListOfStaticObjects {
                    max_count: 4,
                    element: Pair::FIELDS,
                },
            )
            .presence(Presence::RequiredFrom(ForkVersion::Capella)),
            FieldDescriptor::new("extra", FieldKind::Uint(UintWidth::U64)),
        ];
        const SINCE: ForkVersion = ForkVersion::Bellatrix;

        fn version(&self) -> ForkVersion {
            self.version
        }

        fn field(&self, index: usize) -> Value<'_> {
            match index {
                0 => Value::Uint(self.id),
                1 => self.pairs.as_deref().map_or(Value::Absent, object_rows),
                2 => Value::Uint(self.extra),
                _ => Value::Absent,
            }
        }

        fn from_fields(version: ForkVersion, mut fields: FieldValues<'_>) -> SszResult<Self> {
            Ok(Self {
                version,
                id: fields.uint(0)?,
                pairs: fields.objects(1, object_from_row)?,
                extra: fields.uint(2)?,
            })
        }
    }

    fn record(version: ForkVersion) -> Record {
        Record {
            version,
            id: 9,
            pairs: Some(vec![Pair {
                left: 1,
                right: *b"abcd",
            }]),
            extra: 3,
        }
    }

    #[test]
    fn encode_decode_through_the_trait() {
        let original = record(ForkVersion::Deneb);
        let bytes = original.encode().unwrap();
        assert_eq!(bytes.len(), original.encoded_len().unwrap());
        assert_eq!(bytes.len(), 8 + 4 + 8 + 12);
        assert_eq!(Record::decode(&bytes, ForkVersion::Deneb).unwrap(), original);
    }

    #[test]
    fn decode_normalizes_required_list() {
        let mut original = record(ForkVersion::Capella);
        original.pairs = None;
        let bytes = original.encode().unwrap();
        let decoded = Record::decode(&bytes, ForkVersion::Capella).unwrap();
        assert_eq!(decoded.pairs, Some(Vec::new()));

        // Same bytes, earlier fork: the list may stay null.
        let decoded = Record::decode(&bytes, ForkVersion::Bellatrix).unwrap();
        assert_eq!(decoded.pairs, None);
        assert_eq!(decoded.extra, 3);
    }

    #[test]
    fn layout_does_not_depend_on_the_fork() {
        let bellatrix = record(ForkVersion::Bellatrix);
        let electra = record(ForkVersion::Electra);
        assert_eq!(bellatrix.encode().unwrap(), electra.encode().unwrap());
        assert_eq!(
            bellatrix.hash_tree_root().unwrap(),
            electra.hash_tree_root().unwrap()
        );
    }

    #[test]
    fn record_before_definition_is_unsupported() {
        let original = record(ForkVersion::Altair);
        assert!(matches!(
            original.encode(),
            Err(SszError::UnsupportedVersion { context: "Record", .. })
        ));
    }

    #[test]
    fn object_root_is_container_root() {
        let pair = Pair {
            left: 5,
            right: [1, 2, 3, 4],
        };
        let expected = crate::types::hash::Hash::pair(
            &crate::types::chunk::uint_chunk(5),
            &Hash::right_padded(&[1, 2, 3, 4]),
        );
        assert_eq!(pair.object_root().unwrap(), expected);
    }
}
