//! Execution payload SSZ library.
//!
//! Provides the versioned execution payload records, an offset-table SSZ
//! codec, and two independent hash tree root implementations that must agree.

pub mod core;
pub mod ssz;
pub mod types;
pub mod utils;
