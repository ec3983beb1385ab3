//! Replication Wire Format Module
//!
//! The binary message format the store's replication layer accepts, and the
//! builder that wraps an accumulated column family into it. The encoding is
//! version-sensitive: anything that deviates from what the receiving
//! validation path expects is rejected as an invalid mutation.

pub mod builder;
pub mod wire;

#[cfg(test)]
mod tests;
