//! Shared utilities.
//!
//! Common utilities used across the crate including hashing.

pub mod hash;
