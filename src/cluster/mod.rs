//! Cluster Client Module
//!
//! Everything the bridge knows about the target cluster lives here: the
//! configuration loaded at startup, the token ring discovered from seed
//! nodes, and the control-plane calls (ring map, memtable flush).
//!
//! ## Core Concepts
//! - **Ring Directory**: token -> endpoint map, populated once per process
//!   by asking seed nodes, read-only afterwards.
//! - **Replica Resolution**: a row key hashes to a token; its replicas are
//!   the first N distinct endpoints walking the ring clockwise from there.
//! - **Cluster Client**: an explicit context value passed to every component
//!   that needs cluster state. Nothing is process-global.

pub mod client;
pub mod config;
pub mod protocol;
pub mod ring;
