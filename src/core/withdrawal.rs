//! Validator withdrawal, the fixed-size element of a payload's withdrawal list.

use crate::ssz::container::StaticObject;
use crate::ssz::error::SszResult;
use crate::ssz::fast_hasher::{HashTreeRootWith, HashWalker};
use crate::ssz::schema::{FieldDescriptor, FieldKind, UintWidth};
use crate::ssz::value::{FieldValues, Value};
use crate::types::address::{ADDRESS_LEN, Address};

/// Encoded size of one withdrawal.
pub const WITHDRAWAL_LEN: usize = 44;

/// A withdrawal credited to an execution address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Withdrawal {
    /// Monotonic withdrawal index.
    pub index: u64,
    pub validator_index: u64,
    pub address: Address,
    /// Amount in Gwei.
    pub amount: u64,
}

impl Withdrawal {
    pub const INDEX: usize = 0;
    pub const VALIDATOR_INDEX: usize = 1;
    pub const ADDRESS: usize = 2;
    pub const AMOUNT: usize = 3;
}

impl StaticObject for Withdrawal {
    const NAME: &'static str = "Withdrawal";
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new("index", FieldKind::Uint(UintWidth::U64)),
        FieldDescriptor::new("validator_index", FieldKind::Uint(UintWidth::U64)),
        FieldDescriptor::new("address", FieldKind::FixedBytes(ADDRESS_LEN)),
        FieldDescriptor::new("amount", FieldKind::Uint(UintWidth::U64)),
    ];

    fn field(&self, index: usize) -> Value<'_> {
        match index {
            Self::INDEX => Value::Uint(self.index),
            Self::VALIDATOR_INDEX => Value::Uint(self.validator_index),
            Self::ADDRESS => Value::fixed(self.address.as_slice()),
            Self::AMOUNT => Value::Uint(self.amount),
            _ => Value::Absent,
        }
    }

    fn from_fields(mut fields: FieldValues<'_>) -> SszResult<Self> {
        Ok(Self {
            index: fields.uint(Self::INDEX)?,
            validator_index: fields.uint(Self::VALIDATOR_INDEX)?,
            address: Address(fields.fixed(Self::ADDRESS)?),
            amount: fields.uint(Self::AMOUNT)?,
        })
    }
}

impl HashTreeRootWith for Withdrawal {
    fn hash_tree_root_with(&self, hh: &mut HashWalker) -> SszResult<()> {
        let start = hh.index();
        hh.put_u64(self.index);
        hh.put_u64(self.validator_index);
        hh.put_bytes(&self.address.0);
        hh.put_u64(self.amount);
        hh.merkleize(start);
        Ok(())
    }
}
