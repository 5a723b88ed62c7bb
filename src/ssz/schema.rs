//! Field descriptors and version-resolved schemas.
//!
//! A container declares one table of [`FieldDescriptor`]s. The table is the
//! layout at every fork the container is defined at; resolving it against a
//! [`ForkVersion`] only checks the fork and pins the version that the
//! presence rules are read at. Declaration order is wire order and Merkle
//! leaf order.

use crate::ssz::error::SszResult;
use crate::ssz::limits::BYTES_PER_OFFSET;
use crate::ssz::version::{ForkVersion, Presence};

/// Width of an unsigned integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UintWidth {
    U8,
    U16,
    U32,
    U64,
    U256,
}

impl UintWidth {
    pub const fn bytes(self) -> usize {
        match self {
            UintWidth::U8 => 1,
            UintWidth::U16 => 2,
            UintWidth::U32 => 4,
            UintWidth::U64 => 8,
            UintWidth::U256 => 32,
        }
    }

    pub const fn bits(self) -> u16 {
        (self.bytes() * 8) as u16
    }

    /// Largest value representable through `u64`-backed storage.
    pub const fn max_u64(self) -> u64 {
        match self {
            UintWidth::U8 => u8::MAX as u64,
            UintWidth::U16 => u16::MAX as u64,
            UintWidth::U32 => u32::MAX as u64,
            UintWidth::U64 | UintWidth::U256 => u64::MAX,
        }
    }
}

/// Shape of a field on the wire and in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Byte vector of exactly `n` bytes.
    FixedBytes(usize),
    /// Little-endian unsigned integer.
    Uint(UintWidth),
    /// Byte list of at most `max_len` bytes.
    VariableBytes { max_len: usize },
    /// List of at most `max_count` byte lists of at most `max_item_len` bytes.
    ListOfVariableBytes { max_count: usize, max_item_len: usize },
    /// List of at most `max_count` fixed-size objects laid out by `element`.
    ListOfStaticObjects {
        max_count: usize,
        element: &'static [FieldDescriptor],
    },
}

impl FieldKind {
    /// Size in the static region, or `None` for variable-size kinds.
    pub const fn fixed_size(&self) -> Option<usize> {
        match self {
            FieldKind::FixedBytes(n) => Some(*n),
            FieldKind::Uint(width) => Some(width.bytes()),
            FieldKind::VariableBytes { .. }
            | FieldKind::ListOfVariableBytes { .. }
            | FieldKind::ListOfStaticObjects { .. } => None,
        }
    }

    /// Bytes the field occupies in the static region (offset for variable).
    pub const fn static_size(&self) -> usize {
        match self.fixed_size() {
            Some(n) => n,
            None => BYTES_PER_OFFSET,
        }
    }

    /// Lists may be absent and are normalized to empty.
    pub const fn is_list(&self) -> bool {
        matches!(
            self,
            FieldKind::ListOfVariableBytes { .. } | FieldKind::ListOfStaticObjects { .. }
        )
    }
}

/// One named field of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldDescriptor {
    /// An always-required field.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
        }
    }

    pub const fn presence(self, presence: Presence) -> Self {
        Self { presence, ..self }
    }
}

/// Static region size of a fixed list of descriptors.
pub fn static_size<'d>(fields: impl IntoIterator<Item = &'d FieldDescriptor>) -> usize {
    fields.into_iter().map(|f| f.kind.static_size()).sum()
}

/// Fields of one container, pinned to one version.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    container: &'static str,
    version: ForkVersion,
    fields: &'static [FieldDescriptor],
}

impl Schema {
    /// Resolves `table` at `version`.
    ///
    /// `defined_from` is the first fork the container exists at; earlier
    /// versions fail with `UnsupportedVersion`.
    pub fn from_table(
        container: &'static str,
        table: &'static [FieldDescriptor],
        defined_from: ForkVersion,
        version: ForkVersion,
    ) -> SszResult<Self> {
        if version < defined_from {
            return Err(version.unsupported(container));
        }
        Ok(Self {
            container,
            version,
            fields: table,
        })
    }

    /// Schema of a version-independent element.
    pub fn element(container: &'static str, table: &'static [FieldDescriptor]) -> Self {
        Self {
            container,
            version: ForkVersion::Phase0,
            fields: table,
        }
    }

    pub fn container(&self) -> &'static str {
        self.container
    }

    pub fn version(&self) -> ForkVersion {
        self.version
    }

    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter()
    }

    /// Sum of fixed-field sizes plus one offset per variable field.
    pub fn static_size(&self) -> usize {
        static_size(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::error::SszError;

    static TABLE: &[FieldDescriptor] = &[
        FieldDescriptor::new("a", FieldKind::Uint(UintWidth::U64)),
        FieldDescriptor::new("b", FieldKind::VariableBytes { max_len: 32 }),
        FieldDescriptor::new("c", FieldKind::FixedBytes(20))
            .presence(Presence::RequiredFrom(ForkVersion::Capella)),
        FieldDescriptor::new("d", FieldKind::Uint(UintWidth::U256)),
    ];

    #[test]
    fn layout_is_the_same_at_every_defined_fork() {
        for version in [ForkVersion::Bellatrix, ForkVersion::Capella, ForkVersion::Electra1] {
            let schema = Schema::from_table("T", TABLE, ForkVersion::Bellatrix, version).unwrap();
            let names: Vec<_> = schema.descriptors().map(|d| d.name).collect();
            assert_eq!(names, ["a", "b", "c", "d"]);
            assert_eq!(schema.static_size(), 8 + 4 + 20 + 32);
            assert_eq!(schema.version(), version);
        }
    }

    #[test]
    fn resolution_before_definition_is_unsupported() {
        let err = Schema::from_table("T", TABLE, ForkVersion::Bellatrix, ForkVersion::Altair)
            .unwrap_err();
        assert!(matches!(err, SszError::UnsupportedVersion { context: "T", .. }));
    }

    #[test]
    fn list_kinds_are_lists() {
        assert!(
            FieldKind::ListOfVariableBytes {
                max_count: 1,
                max_item_len: 1
            }
            .is_list()
        );
        assert!(!FieldKind::VariableBytes { max_len: 4 }.is_list());
        assert_eq!(FieldKind::VariableBytes { max_len: 4 }.static_size(), 4);
        assert_eq!(FieldKind::Uint(UintWidth::U16).static_size(), 2);
    }
}
