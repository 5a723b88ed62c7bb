//! Logging, parallelism switch and test fixtures.

pub mod log;
pub mod parallel;
pub mod test_utils;
