//! Two independent hash tree root implementations behind one trait.
//!
//! [`SchemaHasher`] derives the root from a record's field table through
//! the generic Merkleizer. [`StreamingHasher`] runs the record's own
//! [`HashTreeRootWith`] walk. The roots are commitments checked by other
//! parties, so any disagreement between the two is an integrity fault;
//! [`DualPathCheck`] surfaces it as [`SszError::RootMismatch`].

use crate::error;
use crate::ssz::container::Container;
use crate::ssz::error::{SszError, SszResult};
use crate::ssz::fast_hasher::{HashTreeRootWith, HashWalker};
use crate::ssz::merkleize;
use crate::types::hash::Hash;

/// Computes a 32-byte commitment to a value.
pub trait TreeHasher<T: ?Sized> {
    fn hash_tree_root(&self, value: &T) -> SszResult<Hash>;
}

/// Schema-driven Merkleizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaHasher;

impl<C: Container> TreeHasher<C> for SchemaHasher {
    fn hash_tree_root(&self, value: &C) -> SszResult<Hash> {
        let schema = value.schema()?;
        merkleize::hash_schema(&schema, &value.values())
    }
}

/// Hand-written leaf walker.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingHasher;

impl<T: HashTreeRootWith + ?Sized> TreeHasher<T> for StreamingHasher {
    fn hash_tree_root(&self, value: &T) -> SszResult<Hash> {
        let mut hh = HashWalker::new();
        value.hash_tree_root_with(&mut hh)?;
        hh.finish()
    }
}

/// Runs both hashers and insists they agree.
pub struct DualPathCheck;

impl DualPathCheck {
    /// Returns the agreed root.
    pub fn verify<T: Container + HashTreeRootWith>(value: &T) -> SszResult<Hash> {
        let schema = SchemaHasher.hash_tree_root(value)?;
        let streaming = StreamingHasher.hash_tree_root(value)?;
        if schema != streaming {
            error!(
                "{} root mismatch at {}: schema {} streaming {}",
                T::NAME,
                value.version(),
                schema,
                streaming
            );
            return Err(SszError::RootMismatch { schema, streaming });
        }
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::schema::{FieldDescriptor, FieldKind, UintWidth};
    use crate::ssz::value::{FieldValues, Value};
    use crate::ssz::version::ForkVersion;

    /// Streams its single field correctly unless `skew` is set.
    struct Counter {
        value: u64,
        skew: bool,
    }

    impl Container for Counter {
        const NAME: &'static str = "Counter";
        const FIELDS: &'static [FieldDescriptor] = &[
            FieldDescriptor::new("value", FieldKind::Uint(UintWidth::U64)),
            FieldDescriptor::new("bytes", FieldKind::VariableBytes { max_len: 64 }),
        ];
        const SINCE: ForkVersion = ForkVersion::Phase0;

        fn version(&self) -> ForkVersion {
            ForkVersion::Deneb
        }

        fn field(&self, index: usize) -> Value<'_> {
            match index {
                0 => Value::Uint(self.value),
                1 => Value::bytes(b"payload"),
                _ => Value::Absent,
            }
        }

        fn from_fields(_: ForkVersion, mut fields: FieldValues<'_>) -> SszResult<Self> {
            Ok(Self {
                value: fields.uint(0)?,
                skew: false,
            })
        }
    }

    impl HashTreeRootWith for Counter {
        fn hash_tree_root_with(&self, hh: &mut HashWalker) -> SszResult<()> {
            let start = hh.index();
            hh.put_u64(self.value + self.skew as u64);
            let inner = hh.index();
            hh.append_bytes32(b"payload");
            hh.merkleize_with_mixin(inner, 7, 2);
            hh.merkleize(start);
            Ok(())
        }
    }

    #[test]
    fn hashers_agree_on_faithful_walk() {
        let counter = Counter {
            value: 42,
            skew: false,
        };
        let root = DualPathCheck::verify(&counter).unwrap();
        assert_eq!(root, SchemaHasher.hash_tree_root(&counter).unwrap());
        assert_eq!(root, counter.hash_tree_root().unwrap());
    }

    #[test]
    fn divergence_is_reported() {
        let counter = Counter {
            value: 42,
            skew: true,
        };
        assert!(matches!(
            DualPathCheck::verify(&counter),
            Err(SszError::RootMismatch { .. })
        ));
    }
}
