//! Control-Plane Protocol
//!
//! Defines the HTTP endpoints and Data Transfer Objects (DTOs) the bridge
//! uses against a node's control address: fetching the token ring and
//! commanding a memtable flush.
//!
//! These structures are serialized as JSON. The binary replication format
//! for actual writes lives in `crate::message` and never goes over HTTP.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

// --- Control Endpoints ---

/// Endpoint serving the current token -> endpoint map.
pub const ENDPOINT_RING: &str = "/internal/ring";
/// Endpoint forcing the node to persist its in-memory write buffer.
pub const ENDPOINT_FLUSH: &str = "/internal/flush";

// --- Data Transfer Objects ---

/// One node's position on the ring as reported by the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingEntry {
    /// The node's token (left edge of the range it owns).
    pub token: u64,
    /// Address receiving one-way replication frames.
    pub data_addr: SocketAddr,
    /// Address serving this control plane.
    pub control_addr: SocketAddr,
}

/// Full ring map returned by a seed node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingResponse {
    pub entries: Vec<RingEntry>,
}

/// Command asking a node to flush its write buffer for one keyspace.
#[derive(Debug, Serialize, Deserialize)]
pub struct FlushRequest {
    pub keyspace: String,
}

/// Acknowledgment of a flush command.
#[derive(Debug, Serialize, Deserialize)]
pub struct FlushResponse {
    pub success: bool,
}
