//! Test utilities: deterministic hashes and populated payloads.
