//! Schema-neutral field values.
//!
//! Records hand the codec and the Merkleizer a `Value` per field. Values
//! borrow from the record on the encode/hash path and from the input buffer
//! on the decode path; records copy out only what they keep.

use crate::ssz::error::{SszError, SszResult};
use crate::ssz::schema::{FieldDescriptor, FieldKind};
use crate::types::uint256::U256;
use bytes::Bytes;
use std::borrow::Cow;

/// One field's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'a> {
    /// Not set (a nullable field before it is required).
    Absent,
    /// Content of a `FixedBytes` field.
    Fixed(Cow<'a, [u8]>),
    /// Content of a `Uint` field of width 64 bits or less.
    Uint(u64),
    /// Content of a 256-bit `Uint` field.
    Uint256(U256),
    /// Content of a `VariableBytes` field.
    Bytes(Cow<'a, [u8]>),
    /// Content of a `ListOfVariableBytes` field.
    BytesList(Vec<Cow<'a, [u8]>>),
    /// Content of a `ListOfStaticObjects` field, one value row per element.
    Objects(Vec<Vec<Value<'a>>>),
}

impl<'a> Value<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// The canonical empty value for kinds where empty stands in for absent.
    pub fn empty_of(kind: &FieldKind) -> Option<Value<'static>> {
        match kind {
            FieldKind::ListOfVariableBytes { .. } => Some(Value::BytesList(Vec::new())),
            FieldKind::ListOfStaticObjects { .. } => Some(Value::Objects(Vec::new())),
            _ => None,
        }
    }

    /// Borrows a byte slice as a fixed-bytes value.
    pub fn fixed(bytes: &'a [u8]) -> Self {
        Value::Fixed(Cow::Borrowed(bytes))
    }

    /// Borrows a byte slice as a variable-bytes value.
    pub fn bytes(bytes: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(bytes))
    }

    /// Borrows a list of byte strings.
    pub fn bytes_list(items: &'a [Bytes]) -> Self {
        Value::BytesList(items.iter().map(|item| Cow::Borrowed(item.as_ref())).collect())
    }
}

/// Decoded values of a record, by declaration-table index.
///
/// The typed accessors take values out, so each index is read once.
pub struct FieldValues<'a> {
    table: &'static [FieldDescriptor],
    values: Vec<Value<'a>>,
}

impl<'a> FieldValues<'a> {
    /// Pairs `values` with `table`, one value per descriptor.
    pub fn new(table: &'static [FieldDescriptor], values: Vec<Value<'a>>) -> Self {
        Self { table, values }
    }

    fn name(&self, index: usize) -> &'static str {
        self.table.get(index).map_or("<unknown>", |d| d.name)
    }

    fn take(&mut self, index: usize) -> Value<'a> {
        self.values
            .get_mut(index)
            .map_or(Value::Absent, std::mem::take)
    }

    fn mismatch(&self, index: usize, expected: &'static str) -> SszError {
        SszError::ValueKindMismatch {
            field: self.name(index),
            expected,
        }
    }

    /// A required fixed-bytes field of exactly `N` bytes.
    pub fn fixed<const N: usize>(&mut self, index: usize) -> SszResult<[u8; N]> {
        match self.take(index) {
            Value::Fixed(bytes) if bytes.len() == N => {
                let mut out = [0u8; N];
                out.copy_from_slice(&bytes);
                Ok(out)
            }
            Value::Absent => Err(SszError::MissingRequiredField(self.name(index))),
            _ => Err(self.mismatch(index, "fixed bytes of declared length")),
        }
    }

    /// A required `u64`-backed integer field.
    pub fn uint(&mut self, index: usize) -> SszResult<u64> {
        match self.take(index) {
            Value::Uint(value) => Ok(value),
            Value::Absent => Err(SszError::MissingRequiredField(self.name(index))),
            _ => Err(self.mismatch(index, "unsigned integer")),
        }
    }

    /// A required 256-bit integer field.
    pub fn uint256(&mut self, index: usize) -> SszResult<U256> {
        match self.take(index) {
            Value::Uint256(value) => Ok(value),
            Value::Absent => Err(SszError::MissingRequiredField(self.name(index))),
            _ => Err(self.mismatch(index, "256-bit integer")),
        }
    }

    /// A required variable-bytes field.
    pub fn bytes(&mut self, index: usize) -> SszResult<Bytes> {
        match self.take(index) {
            Value::Bytes(bytes) => Ok(Bytes::from(bytes.into_owned())),
            Value::Absent => Err(SszError::MissingRequiredField(self.name(index))),
            _ => Err(self.mismatch(index, "variable bytes")),
        }
    }

    /// A list of byte strings; `None` when absent.
    pub fn bytes_list(&mut self, index: usize) -> SszResult<Option<Vec<Bytes>>> {
        match self.take(index) {
            Value::BytesList(items) => Ok(Some(
                items
                    .into_iter()
                    .map(|item| Bytes::from(item.into_owned()))
                    .collect(),
            )),
            Value::Absent => Ok(None),
            _ => Err(self.mismatch(index, "list of byte strings")),
        }
    }

    /// A list of static objects rebuilt with `build`; `None` when absent.
    pub fn objects<T, F>(&mut self, index: usize, mut build: F) -> SszResult<Option<Vec<T>>>
    where
        F: FnMut(Vec<Value<'a>>) -> SszResult<T>,
    {
        match self.take(index) {
            Value::Objects(rows) => rows.into_iter().map(&mut build).collect::<SszResult<_>>().map(Some),
            Value::Absent => Ok(None),
            _ => Err(self.mismatch(index, "list of objects")),
        }
    }
}

impl Default for Value<'_> {
    fn default() -> Self {
        Value::Absent
    }
}
