use super::protocol::RingEntry;
use anyhow::Result;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;

/// A storage node as seen from the bridge.
///
/// The data address takes one-way replication frames over TCP; the control
/// address serves the HTTP control plane (ring map, flush commands).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub data_addr: SocketAddr,
    pub control_addr: SocketAddr,
}

/// The token ring: which endpoint owns which position on the hash ring.
///
/// Populated once per process from a seed node and read-only afterwards.
/// Replica resolution is a pure function of this map, so an unchanged ring
/// always resolves a row key to the identical ordered endpoint set.
pub struct RingDirectory {
    ring: BTreeMap<u64, Endpoint>,
}

impl RingDirectory {
    pub fn from_entries(entries: Vec<RingEntry>) -> Self {
        let mut ring = BTreeMap::new();
        for entry in entries {
            let endpoint = Endpoint {
                data_addr: entry.data_addr,
                control_addr: entry.control_addr,
            };
            if let Some(previous) = ring.insert(entry.token, endpoint) {
                tracing::warn!(
                    "Duplicate token {} on the ring, dropped {}",
                    entry.token,
                    previous.data_addr
                );
            }
        }
        Self { ring }
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.ring.len()
    }

    /// Position of a row key on the ring.
    pub fn token_for(row_key: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        row_key.hash(&mut hasher);
        hasher.finish()
    }

    /// The ordered replica set for a row key: walk clockwise from the first
    /// token at or past the key's position, wrapping around, and take the
    /// first `n` distinct endpoints. Errors if discovery never populated
    /// the ring, so sends fail fast instead of silently dropping data.
    pub fn replicas_for(&self, row_key: &str, n: usize) -> Result<Vec<Endpoint>> {
        if self.ring.is_empty() {
            anyhow::bail!("Token ring is empty, ring discovery has not run");
        }

        let token = Self::token_for(row_key);
        let mut replicas = Vec::with_capacity(n);

        let walk = self
            .ring
            .range(token..)
            .chain(self.ring.range(..token))
            .map(|(_, endpoint)| endpoint);

        for endpoint in walk {
            if replicas.contains(endpoint) {
                continue;
            }
            replicas.push(endpoint.clone());
            if replicas.len() == n {
                break;
            }
        }

        Ok(replicas)
    }

    /// Deduplicated union of every endpoint on the ring, in token order.
    /// This is the set the flush coordinator visits exactly once each.
    pub fn all_endpoints(&self) -> Vec<Endpoint> {
        let mut seen = HashSet::new();
        let mut endpoints = Vec::new();
        for endpoint in self.ring.values() {
            if seen.insert(endpoint.clone()) {
                endpoints.push(endpoint.clone());
            }
        }
        endpoints
    }
}
