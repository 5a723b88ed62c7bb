//! Execution payload records.
//!
//! This module contains the records the codec and hashers operate on:
//! - `ExecutionPayload`: the full versioned payload
//! - `ExecutionPayloadHeader`: the payload with bulk lists replaced by roots
//! - `Withdrawal`: fixed-size element of the payload's withdrawal list
//!
//! Records are built through `ExecutionPayloadBuilder` or decoded from bytes,
//! and read through the `PayloadView` getters.

pub mod builder;
pub mod chain_spec;
pub mod header;
pub mod payload;
pub mod projection;
pub mod view;
pub mod withdrawal;
