//! Offset-table encoder and decoder.
//!
//! A container is laid out as a static region followed by a dynamic region:
//!
//! ```text
//! | fixed field | offset(var 0) | fixed field | offset(var 1) | var 0 data | var 1 data |
//! ```
//!
//! Offsets are 4-byte little-endian positions relative to the start of the
//! enclosing container (the whole buffer at top level). A list of
//! variable-size items repeats the same scheme inside its own region: one
//! offset per item followed by the item contents.

use crate::ssz::error::{SszError, SszResult};
use crate::ssz::limits::BYTES_PER_OFFSET;
use crate::ssz::schema::{FieldDescriptor, FieldKind, Schema, UintWidth, static_size};
use crate::ssz::value::Value;
use crate::types::encoding::{Decode, Encode, EncodeSink, read_bytes};
use crate::types::uint256::U256;
use std::borrow::Cow;

/// Encodes `values` (one per schema field) into a fresh buffer.
pub fn encode(schema: &Schema, values: &[Value<'_>]) -> SszResult<Vec<u8>> {
    let fields: Vec<&FieldDescriptor> = schema.descriptors().collect();
    encode_fields(schema.container(), &fields, values)
}

/// Decodes a buffer laid out by `schema`, borrowing from `bytes`.
///
/// Presence rules are not applied here; see
/// [`VersionGate`](crate::ssz::version::VersionGate).
pub fn decode<'a>(schema: &Schema, bytes: &'a [u8]) -> SszResult<Vec<Value<'a>>> {
    let fields: Vec<&FieldDescriptor> = schema.descriptors().collect();
    decode_fields(schema.container(), &fields, bytes)
}

/// Encodes a field list. Capacities are checked before any byte is written.
pub fn encode_fields(
    context: &'static str,
    fields: &[&FieldDescriptor],
    values: &[Value<'_>],
) -> SszResult<Vec<u8>> {
    check_arity(context, fields, values)?;
    check_fields(fields, values)?;

    let size = encoded_size(fields, values)?;
    let mut out = Vec::with_capacity(size);
    write_fields(fields, values, &mut out)?;

    if out.len() != size {
        return Err(SszError::EncodedSizeMismatch {
            expected: size,
            actual: out.len(),
        });
    }
    Ok(out)
}

fn check_arity(
    context: &'static str,
    fields: &[&FieldDescriptor],
    values: &[Value<'_>],
) -> SszResult<()> {
    if fields.len() != values.len() {
        return Err(SszError::ValueKindMismatch {
            field: context,
            expected: "one value per schema field",
        });
    }
    Ok(())
}

/// Validates every value against its descriptor, recursively.
///
/// Rejects oversized lists and byte strings, integers wider than their
/// declared width, and values of the wrong shape.
pub fn check_fields(fields: &[&FieldDescriptor], values: &[Value<'_>]) -> SszResult<()> {
    for (field, value) in fields.iter().zip(values) {
        check_value(field, value)?;
    }
    Ok(())
}

fn capacity(field: &FieldDescriptor, actual: usize, max: usize) -> SszResult<()> {
    if actual > max {
        return Err(SszError::CapacityExceeded {
            field: field.name,
            actual,
            max,
        });
    }
    Ok(())
}

fn mismatch(field: &FieldDescriptor, expected: &'static str) -> SszError {
    SszError::ValueKindMismatch {
        field: field.name,
        expected,
    }
}

fn check_value(field: &FieldDescriptor, value: &Value<'_>) -> SszResult<()> {
    match (&field.kind, value) {
        (kind, Value::Absent) if kind.is_list() => Ok(()),
        (_, Value::Absent) => Err(SszError::MissingRequiredField(field.name)),
        (FieldKind::FixedBytes(n), Value::Fixed(bytes)) => {
            if bytes.len() != *n {
                return Err(mismatch(field, "fixed bytes of declared length"));
            }
            Ok(())
        }
        (FieldKind::Uint(UintWidth::U256), Value::Uint256(_)) => Ok(()),
        (FieldKind::Uint(width), Value::Uint(v)) if *width != UintWidth::U256 => {
            if *v > width.max_u64() {
                return Err(SszError::UintOverflow {
                    field: field.name,
                    value: *v,
                    bits: width.bits(),
                });
            }
            Ok(())
        }
        (FieldKind::VariableBytes { max_len }, Value::Bytes(bytes)) => {
            capacity(field, bytes.len(), *max_len)
        }
        (
            FieldKind::ListOfVariableBytes {
                max_count,
                max_item_len,
            },
            Value::BytesList(items),
        ) => {
            capacity(field, items.len(), *max_count)?;
            for item in items {
                capacity(field, item.len(), *max_item_len)?;
            }
            Ok(())
        }
        (FieldKind::ListOfStaticObjects { max_count, element }, Value::Objects(rows)) => {
            capacity(field, rows.len(), *max_count)?;
            let element: Vec<&FieldDescriptor> = element.iter().collect();
            for row in rows {
                check_arity(field.name, &element, row)?;
                check_fields(&element, row)?;
            }
            Ok(())
        }
        (FieldKind::FixedBytes(_), _) => Err(mismatch(field, "fixed bytes")),
        (FieldKind::Uint(_), _) => Err(mismatch(field, "unsigned integer of declared width")),
        (FieldKind::VariableBytes { .. }, _) => Err(mismatch(field, "variable bytes")),
        (FieldKind::ListOfVariableBytes { .. }, _) => Err(mismatch(field, "list of byte strings")),
        (FieldKind::ListOfStaticObjects { .. }, _) => Err(mismatch(field, "list of objects")),
    }
}

/// Total encoded size: static region plus every variable field's content.
///
/// Values must already have passed [`check_fields`]. Fails with
/// `CapacityExceeded` when an offset would not fit in four bytes.
pub fn encoded_size(fields: &[&FieldDescriptor], values: &[Value<'_>]) -> SszResult<usize> {
    let mut size = static_size(fields.iter().copied());
    for (field, value) in fields.iter().zip(values) {
        if field.kind.fixed_size().is_none() {
            offset_u32(field.name, size)?;
            size += variable_size(field, value)?;
        }
    }
    Ok(size)
}

fn variable_size(field: &FieldDescriptor, value: &Value<'_>) -> SszResult<usize> {
    let size = match (&field.kind, value) {
        (_, Value::Bytes(bytes)) => bytes.len(),
        (_, Value::BytesList(items)) => {
            let mut size = items.len() * BYTES_PER_OFFSET;
            for item in items {
                offset_u32(field.name, size)?;
                size += item.len();
            }
            size
        }
        (FieldKind::ListOfStaticObjects { element, .. }, Value::Objects(rows)) => {
            rows.len() * static_size(element.iter())
        }
        _ => 0,
    };
    Ok(size)
}

/// Narrows a byte offset to its 4-byte wire form.
pub(crate) fn offset_u32(field: &'static str, offset: usize) -> SszResult<u32> {
    u32::try_from(offset).map_err(|_| SszError::CapacityExceeded {
        field,
        actual: offset,
        max: u32::MAX as usize,
    })
}

/// Writes a 4-byte little-endian offset at `at`.
fn backfill_offset(
    field: &FieldDescriptor,
    out: &mut [u8],
    at: usize,
    offset: usize,
) -> SszResult<()> {
    let offset = offset_u32(field.name, offset)?;
    out[at..at + BYTES_PER_OFFSET].copy_from_slice(&offset.to_le_bytes());
    Ok(())
}

fn write_fields(
    fields: &[&FieldDescriptor],
    values: &[Value<'_>],
    out: &mut Vec<u8>,
) -> SszResult<()> {
    let base = out.len();

    // Static pass: fixed fields and offset placeholders.
    let mut placeholders = Vec::new();
    for (field, value) in fields.iter().zip(values) {
        if field.kind.fixed_size().is_some() {
            write_fixed(field, value, out)?;
        } else {
            placeholders.push(out.len());
            out.write(&[0u8; BYTES_PER_OFFSET]);
        }
    }

    // Dynamic pass: contents in declaration order, offsets back-filled.
    let variable = fields
        .iter()
        .zip(values)
        .filter(|(field, _)| field.kind.fixed_size().is_none());
    for (at, (field, value)) in placeholders.into_iter().zip(variable) {
        let offset = out.len() - base;
        backfill_offset(field, out, at, offset)?;
        write_variable(field, value, out)?;
    }
    Ok(())
}

fn write_fixed(field: &FieldDescriptor, value: &Value<'_>, out: &mut Vec<u8>) -> SszResult<()> {
    match (&field.kind, value) {
        (FieldKind::FixedBytes(_), Value::Fixed(bytes)) => out.write(bytes),
        (FieldKind::Uint(UintWidth::U256), Value::Uint256(v)) => v.encode(out),
        (FieldKind::Uint(UintWidth::U64), Value::Uint(v)) => v.encode(out),
        (FieldKind::Uint(UintWidth::U32), Value::Uint(v)) => (*v as u32).encode(out),
        (FieldKind::Uint(UintWidth::U16), Value::Uint(v)) => (*v as u16).encode(out),
        (FieldKind::Uint(UintWidth::U8), Value::Uint(v)) => (*v as u8).encode(out),
        (_, Value::Absent) => return Err(SszError::MissingRequiredField(field.name)),
        _ => return Err(mismatch(field, "fixed-size value")),
    }
    Ok(())
}

fn write_variable(field: &FieldDescriptor, value: &Value<'_>, out: &mut Vec<u8>) -> SszResult<()> {
    match (&field.kind, value) {
        (kind, Value::Absent) if kind.is_list() => {}
        (FieldKind::VariableBytes { .. }, Value::Bytes(bytes)) => out.write(bytes),
        (FieldKind::ListOfVariableBytes { .. }, Value::BytesList(items)) => {
            let base = out.len();
            let mut offset = items.len() * BYTES_PER_OFFSET;
            for item in items {
                offset_u32(field.name, offset)?.encode(out);
                offset += item.len();
            }
            debug_assert_eq!(out.len() - base, items.len() * BYTES_PER_OFFSET);
            for item in items {
                out.write(item);
            }
        }
        (FieldKind::ListOfStaticObjects { element, .. }, Value::Objects(rows)) => {
            let element: Vec<&FieldDescriptor> = element.iter().collect();
            for row in rows {
                write_fields(&element, row, out)?;
            }
        }
        (_, Value::Absent) => return Err(SszError::MissingRequiredField(field.name)),
        _ => return Err(mismatch(field, "variable-size value")),
    }
    Ok(())
}

/// Decodes a field list from exactly `bytes`.
pub fn decode_fields<'a>(
    context: &'static str,
    fields: &[&FieldDescriptor],
    bytes: &'a [u8],
) -> SszResult<Vec<Value<'a>>> {
    let fixed_len = static_size(fields.iter().copied());
    if bytes.len() < fixed_len {
        return Err(SszError::TruncatedInput {
            context,
            needed: fixed_len,
            available: bytes.len(),
        });
    }

    let mut cursor = &bytes[..fixed_len];
    let mut values = Vec::with_capacity(fields.len());
    let mut offsets: Vec<(usize, &FieldDescriptor, usize)> = Vec::new();
    for field in fields {
        match field.kind.fixed_size() {
            Some(_) => values.push(read_fixed(field, &mut cursor)?),
            None => {
                let offset = u32::decode(&mut cursor)? as usize;
                offsets.push((values.len(), *field, offset));
                values.push(Value::Absent);
            }
        }
    }

    if offsets.is_empty() {
        if bytes.len() != fixed_len {
            return Err(SszError::TrailingBytes {
                context,
                consumed: fixed_len,
                remaining: bytes.len() - fixed_len,
            });
        }
        return Ok(values);
    }

    let mut previous = fixed_len;
    for (i, &(_, field, offset)) in offsets.iter().enumerate() {
        if offset > bytes.len() {
            return Err(SszError::OffsetOutOfBounds {
                field: field.name,
                offset,
                bound: bytes.len(),
            });
        }
        if i == 0 && offset != fixed_len {
            return Err(SszError::OffsetOutOfBounds {
                field: field.name,
                offset,
                bound: fixed_len,
            });
        }
        if offset < previous {
            return Err(SszError::OffsetOutOfOrder {
                field: field.name,
                offset,
                previous,
            });
        }
        previous = offset;
    }

    for (i, &(slot, field, start)) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).map_or(bytes.len(), |&(_, _, next)| next);
        values[slot] = read_variable(field, &bytes[start..end])?;
    }
    Ok(values)
}

fn read_fixed<'a>(field: &FieldDescriptor, cursor: &mut &'a [u8]) -> SszResult<Value<'a>> {
    let value = match field.kind {
        FieldKind::FixedBytes(n) => Value::Fixed(Cow::Borrowed(read_bytes(cursor, n)?)),
        FieldKind::Uint(UintWidth::U8) => Value::Uint(u8::decode(cursor)? as u64),
        FieldKind::Uint(UintWidth::U16) => Value::Uint(u16::decode(cursor)? as u64),
        FieldKind::Uint(UintWidth::U32) => Value::Uint(u32::decode(cursor)? as u64),
        FieldKind::Uint(UintWidth::U64) => Value::Uint(u64::decode(cursor)?),
        FieldKind::Uint(UintWidth::U256) => Value::Uint256(U256::decode(cursor)?),
        _ => return Err(mismatch(field, "fixed-size kind")),
    };
    Ok(value)
}

/// Decodes one variable field's region. Empty list regions decode as absent.
fn read_variable<'a>(field: &FieldDescriptor, region: &'a [u8]) -> SszResult<Value<'a>> {
    match field.kind {
        FieldKind::VariableBytes { max_len } => {
            capacity(field, region.len(), max_len)?;
            Ok(Value::Bytes(Cow::Borrowed(region)))
        }
        FieldKind::ListOfVariableBytes {
            max_count,
            max_item_len,
        } => read_bytes_list(field, region, max_count, max_item_len),
        FieldKind::ListOfStaticObjects { max_count, element } => {
            if region.is_empty() {
                return Ok(Value::Absent);
            }
            let element_size = static_size(element.iter());
            if element_size == 0 || region.len() % element_size != 0 {
                return Err(SszError::InvalidLength {
                    field: field.name,
                    len: region.len(),
                    element_size,
                });
            }
            capacity(field, region.len() / element_size, max_count)?;
            let element: Vec<&FieldDescriptor> = element.iter().collect();
            let rows = region
                .chunks(element_size)
                .map(|chunk| decode_fields(field.name, &element, chunk))
                .collect::<SszResult<Vec<_>>>()?;
            Ok(Value::Objects(rows))
        }
        FieldKind::FixedBytes(_) | FieldKind::Uint(_) => Err(mismatch(field, "variable-size kind")),
    }
}

fn read_bytes_list<'a>(
    field: &FieldDescriptor,
    region: &'a [u8],
    max_count: usize,
    max_item_len: usize,
) -> SszResult<Value<'a>> {
    if region.is_empty() {
        return Ok(Value::Absent);
    }
    if region.len() < BYTES_PER_OFFSET {
        return Err(SszError::TruncatedInput {
            context: field.name,
            needed: BYTES_PER_OFFSET,
            available: region.len(),
        });
    }

    let mut cursor = region;
    let first = u32::decode(&mut cursor)? as usize;
    if first == 0 || first % BYTES_PER_OFFSET != 0 || first > region.len() {
        return Err(SszError::OffsetOutOfBounds {
            field: field.name,
            offset: first,
            bound: region.len(),
        });
    }
    let count = first / BYTES_PER_OFFSET;
    capacity(field, count, max_count)?;

    let mut offsets = Vec::with_capacity(count);
    offsets.push(first);
    for _ in 1..count {
        let offset = u32::decode(&mut cursor)? as usize;
        let previous = offsets[offsets.len() - 1];
        if offset > region.len() {
            return Err(SszError::OffsetOutOfBounds {
                field: field.name,
                offset,
                bound: region.len(),
            });
        }
        if offset < previous {
            return Err(SszError::OffsetOutOfOrder {
                field: field.name,
                offset,
                previous,
            });
        }
        offsets.push(offset);
    }

    let mut items = Vec::with_capacity(count);
    for (i, &start) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).copied().unwrap_or(region.len());
        capacity(field, end - start, max_item_len)?;
        items.push(Cow::Borrowed(&region[start..end]));
    }
    Ok(Value::BytesList(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::version::ForkVersion;

    static ELEMENT: &[FieldDescriptor] = &[
        FieldDescriptor::new("id", FieldKind::Uint(UintWidth::U16)),
        FieldDescriptor::new("tag", FieldKind::FixedBytes(2)),
    ];

    static TABLE: &[FieldDescriptor] = &[
        FieldDescriptor::new("flag", FieldKind::Uint(UintWidth::U8)),
        FieldDescriptor::new("note", FieldKind::VariableBytes { max_len: 8 }),
        FieldDescriptor::new(
            "blobs",
            FieldKind::ListOfVariableBytes {
                max_count: 3,
                max_item_len: 4,
            },
        ),
        FieldDescriptor::new(
            "items",
            FieldKind::ListOfStaticObjects {
                max_count: 2,
                element: ELEMENT,
            },
        ),
        FieldDescriptor::new("tail", FieldKind::Uint(UintWidth::U32)),
    ];

    fn schema() -> Schema {
        Schema::from_table("Sample", TABLE, ForkVersion::Phase0, ForkVersion::Deneb).unwrap()
    }

    fn sample() -> Vec<Value<'static>> {
        vec![
            Value::Uint(1),
            Value::bytes(b"hi"),
            Value::BytesList(vec![Cow::Borrowed(&b"ab"[..]), Cow::Borrowed(&b""[..])]),
            Value::Objects(vec![vec![Value::Uint(0x0201), Value::fixed(b"xy")]]),
            Value::Uint(0xaabbccdd),
        ]
    }

    #[test]
    fn layout_matches_hand_encoding() {
        let bytes = encode(&schema(), &sample()).unwrap();
        // static: flag(1) + 3 offsets(12) + tail(4) = 17
        let mut expected = vec![1u8];
        for offset in [17u32, 19, 29, 0xaabbccdd] {
            expected.extend_from_slice(&offset.to_le_bytes());
        }
        expected.extend_from_slice(b"hi");
        expected.extend_from_slice(&8u32.to_le_bytes());
        expected.extend_from_slice(&10u32.to_le_bytes());
        expected.extend_from_slice(b"ab");
        expected.extend_from_slice(&[0x01, 0x02]);
        expected.extend_from_slice(b"xy");
        assert_eq!(bytes, expected);
        assert_eq!(decode(&schema(), &bytes).unwrap(), sample());
    }

    #[test]
    fn empty_lists_decode_as_absent() {
        let mut values = sample();
        values[2] = Value::BytesList(Vec::new());
        values[3] = Value::Absent;
        let bytes = encode(&schema(), &values).unwrap();
        assert_eq!(bytes.len(), 17 + 2);

        let decoded = decode(&schema(), &bytes).unwrap();
        assert!(decoded[2].is_absent());
        assert!(decoded[3].is_absent());
    }

    #[test]
    fn encode_rejects_oversized_values_before_writing() {
        let mut values = sample();
        values[1] = Value::bytes(b"way too long");
        assert_eq!(
            encode(&schema(), &values).unwrap_err(),
            SszError::CapacityExceeded {
                field: "note",
                actual: 12,
                max: 8
            }
        );

        let mut values = sample();
        values[0] = Value::Uint(256);
        assert!(matches!(
            encode(&schema(), &values),
            Err(SszError::UintOverflow { bits: 8, .. })
        ));
    }

    #[test]
    fn decode_rejects_malformed_offsets() {
        let bytes = encode(&schema(), &sample()).unwrap();

        let mut first_into_static = bytes.clone();
        first_into_static[1..5].copy_from_slice(&3u32.to_le_bytes());
        assert!(matches!(
            decode(&schema(), &first_into_static),
            Err(SszError::OffsetOutOfBounds { field: "note", .. })
        ));

        let mut past_end = bytes.clone();
        past_end[5..9].copy_from_slice(&999u32.to_le_bytes());
        assert!(matches!(
            decode(&schema(), &past_end),
            Err(SszError::OffsetOutOfBounds { field: "blobs", .. })
        ));

        let mut reversed = bytes.clone();
        reversed[9..13].copy_from_slice(&18u32.to_le_bytes());
        assert!(matches!(
            decode(&schema(), &reversed),
            Err(SszError::OffsetOutOfOrder { field: "items", .. })
        ));
    }

    #[test]
    fn decode_rejects_short_and_ragged_input() {
        let bytes = encode(&schema(), &sample()).unwrap();
        assert!(matches!(
            decode(&schema(), &bytes[..10]),
            Err(SszError::TruncatedInput { needed: 17, .. })
        ));
        assert!(matches!(
            decode(&schema(), &bytes[..bytes.len() - 1]),
            Err(SszError::InvalidLength { field: "items", .. })
        ));
    }

    #[test]
    fn offsets_must_fit_in_four_bytes() {
        assert_eq!(offset_u32("note", u32::MAX as usize).unwrap(), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            offset_u32("note", u32::MAX as usize + 1).unwrap_err(),
            SszError::CapacityExceeded {
                field: "note",
                actual: u32::MAX as usize + 1,
                max: u32::MAX as usize,
            }
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_byte_list_fails_before_writing() {
        static WIDE: &[FieldDescriptor] = &[FieldDescriptor::new(
            "blobs",
            FieldKind::ListOfVariableBytes {
                max_count: 128,
                max_item_len: 1 << 26,
            },
        )];
        // 70 borrows of one 64 MiB buffer: the last offsets pass 4 GiB.
        let item = vec![0u8; 1 << 26];
        let values = vec![Value::BytesList(
            (0..70).map(|_| Cow::Borrowed(item.as_slice())).collect(),
        )];
        let fields: Vec<&FieldDescriptor> = WIDE.iter().collect();
        check_fields(&fields, &values).unwrap();
        assert!(matches!(
            encoded_size(&fields, &values),
            Err(SszError::CapacityExceeded { field: "blobs", max, .. }) if max == u32::MAX as usize
        ));
        assert!(matches!(
            encode_fields("Wide", &fields, &values),
            Err(SszError::CapacityExceeded { field: "blobs", .. })
        ));
    }

    #[test]
    fn fixed_only_container_rejects_trailing_bytes() {
        let element: Vec<&FieldDescriptor> = ELEMENT.iter().collect();
        let values = vec![Value::Uint(5), Value::fixed(b"ok")];
        let mut bytes = encode_fields("Element", &element, &values).unwrap();
        assert_eq!(bytes.len(), 4);
        bytes.push(0);
        assert!(matches!(
            decode_fields("Element", &element, &bytes),
            Err(SszError::TrailingBytes { remaining: 1, .. })
        ));
    }
}
