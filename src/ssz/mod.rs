//! SSZ machinery: schemas, the offset-table codec, the version gate, both
//! hash tree root paths and field proofs.

pub mod codec;
pub mod container;
pub mod error;
pub mod fast_hasher;
pub mod hasher;
pub mod limits;
pub mod merkleize;
pub mod proof;
pub mod schema;
pub mod value;
pub mod version;

pub use container::{Container, StaticObject};
pub use error::{SszError, SszResult};
pub use fast_hasher::{HashTreeRootWith, HashWalker};
pub use hasher::{DualPathCheck, SchemaHasher, StreamingHasher, TreeHasher};
pub use proof::FieldProof;
pub use schema::{FieldDescriptor, FieldKind, Schema, UintWidth};
pub use value::{FieldValues, Value};
pub use version::{ForkVersion, Presence, VersionGate};
