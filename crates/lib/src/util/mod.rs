//! Shared utilities.
//!
//! Filesystem helpers used by staging, plus test helpers.

pub mod fs;

#[cfg(test)]
pub mod testutil;
