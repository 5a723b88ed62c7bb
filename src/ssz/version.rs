//! Fork versions and the version gate.
//!
//! A container's layout does not change across the forks it is defined at.
//! What changes is which fields must be non-null, and that is data: every
//! [`FieldDescriptor`](crate::ssz::schema::FieldDescriptor) carries a
//! [`Presence`] rule. The gate reads those tables; nothing else in the crate
//! branches on versions to decide field presence.

use crate::ssz::error::{SszError, SszResult, VersionBytes};
use crate::ssz::schema::Schema;
use crate::ssz::value::Value;
use std::fmt;
use std::str::FromStr;

/// Protocol fork, totally ordered by activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ForkVersion {
    Phase0,
    Altair,
    Bellatrix,
    Capella,
    Deneb,
    Deneb1,
    Electra,
    Electra1,
}

impl ForkVersion {
    /// Every known fork, in activation order.
    pub const ALL: [ForkVersion; 8] = [
        ForkVersion::Phase0,
        ForkVersion::Altair,
        ForkVersion::Bellatrix,
        ForkVersion::Capella,
        ForkVersion::Deneb,
        ForkVersion::Deneb1,
        ForkVersion::Electra,
        ForkVersion::Electra1,
    ];

    /// Four-byte wire form: `[major, minor, 0, 0]`.
    pub const fn to_bytes(self) -> [u8; 4] {
        match self {
            ForkVersion::Phase0 => [0, 0, 0, 0],
            ForkVersion::Altair => [1, 0, 0, 0],
            ForkVersion::Bellatrix => [2, 0, 0, 0],
            ForkVersion::Capella => [3, 0, 0, 0],
            ForkVersion::Deneb => [4, 0, 0, 0],
            ForkVersion::Deneb1 => [4, 1, 0, 0],
            ForkVersion::Electra => [5, 0, 0, 0],
            ForkVersion::Electra1 => [5, 1, 0, 0],
        }
    }

    /// Parses the four-byte wire form.
    pub fn from_bytes(bytes: [u8; 4]) -> SszResult<Self> {
        Self::ALL
            .into_iter()
            .find(|fork| fork.to_bytes() == bytes)
            .ok_or(SszError::UnsupportedVersion {
                context: "fork version",
                version: VersionBytes(bytes),
            })
    }

    pub const fn name(self) -> &'static str {
        match self {
            ForkVersion::Phase0 => "phase0",
            ForkVersion::Altair => "altair",
            ForkVersion::Bellatrix => "bellatrix",
            ForkVersion::Capella => "capella",
            ForkVersion::Deneb => "deneb",
            ForkVersion::Deneb1 => "deneb1",
            ForkVersion::Electra => "electra",
            ForkVersion::Electra1 => "electra1",
        }
    }

    /// True when `self` is `other` or a later fork.
    pub fn equals_or_is_after(self, other: ForkVersion) -> bool {
        self >= other
    }

    /// Error value for a container that has no definition at this fork.
    pub(crate) fn unsupported(self, context: &'static str) -> SszError {
        SszError::UnsupportedVersion {
            context,
            version: VersionBytes(self.to_bytes()),
        }
    }
}

impl fmt::Display for ForkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ForkVersion {
    type Err = SszError;

    /// Accepts a fork name (`deneb`) or a hex wire version (`0x04000000`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(fork) = Self::ALL.into_iter().find(|f| f.name() == lower) {
            return Ok(fork);
        }
        let unknown = || SszError::UnsupportedVersion {
            context: "fork name",
            version: VersionBytes([0xff; 4]),
        };
        let hex = lower.strip_prefix("0x").ok_or_else(unknown)?;
        let raw = u32::from_str_radix(hex, 16).map_err(|_| unknown())?;
        Self::from_bytes(raw.to_be_bytes())
    }
}

/// Nullability rule for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be non-null at every version.
    Required,
    /// Must be non-null from the given fork onwards, nullable before it.
    RequiredFrom(ForkVersion),
}

impl Presence {
    pub fn is_required_at(self, version: ForkVersion) -> bool {
        match self {
            Presence::Required => true,
            Presence::RequiredFrom(fork) => version.equals_or_is_after(fork),
        }
    }
}

/// Post-decode policy over a resolved schema.
pub struct VersionGate;

impl VersionGate {
    /// Enforces presence rules on freshly decoded values, in place.
    ///
    /// Required list fields that decoded as absent become empty lists.
    /// Any other required field that is absent fails with
    /// [`SszError::MissingRequiredField`].
    pub fn post_decode_validate(schema: &Schema, values: &mut [Value<'_>]) -> SszResult<()> {
        for (descriptor, value) in schema.descriptors().zip(values.iter_mut()) {
            if !value.is_absent() || !descriptor.presence.is_required_at(schema.version()) {
                continue;
            }
            match Value::empty_of(&descriptor.kind) {
                Some(empty) => *value = empty,
                None => return Err(SszError::MissingRequiredField(descriptor.name)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::schema::{FieldDescriptor, FieldKind, UintWidth};
    use std::borrow::Cow;

    static FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::new("root", FieldKind::FixedBytes(32)),
        FieldDescriptor::new(
            "items",
            FieldKind::ListOfVariableBytes {
                max_count: 4,
                max_item_len: 8,
            },
        )
        .presence(Presence::RequiredFrom(ForkVersion::Capella)),
        FieldDescriptor::new("counter", FieldKind::Uint(UintWidth::U64))
            .presence(Presence::RequiredFrom(ForkVersion::Deneb)),
    ];

    fn schema(version: ForkVersion) -> Schema {
        Schema::from_table("Gated", FIELDS, ForkVersion::Bellatrix, version).unwrap()
    }

    fn values() -> Vec<Value<'static>> {
        vec![
            Value::Fixed(Cow::Owned(vec![0; 32])),
            Value::Absent,
            Value::Uint(1),
        ]
    }

    #[test]
    fn versions_are_ordered() {
        assert!(ForkVersion::Bellatrix < ForkVersion::Capella);
        assert!(ForkVersion::Deneb < ForkVersion::Deneb1);
        assert!(ForkVersion::Electra1.equals_or_is_after(ForkVersion::Deneb));
        assert!(!ForkVersion::Capella.equals_or_is_after(ForkVersion::Deneb));
    }

    #[test]
    fn wire_versions_round_trip() {
        for fork in ForkVersion::ALL {
            assert_eq!(ForkVersion::from_bytes(fork.to_bytes()).unwrap(), fork);
        }
        assert!(matches!(
            ForkVersion::from_bytes([9, 0, 0, 0]),
            Err(SszError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn parses_names_and_hex() {
        assert_eq!("Deneb".parse::<ForkVersion>().unwrap(), ForkVersion::Deneb);
        assert_eq!(
            "0x05010000".parse::<ForkVersion>().unwrap(),
            ForkVersion::Electra1
        );
        assert!("shanghai".parse::<ForkVersion>().is_err());
    }

    #[test]
    fn required_list_is_normalized_to_empty() {
        let schema = schema(ForkVersion::Deneb);
        let mut values = values();
        VersionGate::post_decode_validate(&schema, &mut values).unwrap();
        assert_eq!(values[1], Value::BytesList(Vec::new()));
        assert_eq!(values[2], Value::Uint(1));
    }

    #[test]
    fn list_stays_absent_before_it_is_required() {
        let schema = schema(ForkVersion::Bellatrix);
        let mut values = values();
        values[2] = Value::Absent;
        VersionGate::post_decode_validate(&schema, &mut values).unwrap();
        assert!(values[1].is_absent());
        assert!(values[2].is_absent());
    }

    #[test]
    fn absent_required_scalar_fails() {
        let schema = schema(ForkVersion::Deneb);
        let mut values = values();
        values[2] = Value::Absent;
        let err = VersionGate::post_decode_validate(&schema, &mut values).unwrap_err();
        assert_eq!(err, SszError::MissingRequiredField("counter"));
    }
}
