use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Timestamp assigned to every column written by this bridge.
///
/// The import historically stamped everything with a constant 0, treating
/// the bulk load as the authoritative first write. That breaks conflict
/// resolution when the same rows are imported twice concurrently, so the
/// choice is left to the operator instead of being hardwired.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Every column gets this fixed value.
    Constant(i64),
    /// Every column gets epoch milliseconds at append time.
    WallClock,
}

impl Default for TimestampPolicy {
    fn default() -> Self {
        TimestampPolicy::Constant(0)
    }
}

impl TimestampPolicy {
    pub fn next(&self) -> i64 {
        match self {
            TimestampPolicy::Constant(value) => *value,
            TimestampPolicy::WallClock => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as i64,
        }
    }
}

/// Cluster-facing configuration, loaded from the JSON file named on the
/// command line. Validated before any network activity starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Control addresses of seed nodes used for ring discovery.
    pub seeds: Vec<SocketAddr>,

    /// How many replica endpoints each row key fans out to.
    #[serde(default = "default_replication_factor")]
    pub replication_factor: usize,

    /// Timestamp policy for written columns.
    #[serde(default)]
    pub timestamp_mode: TimestampPolicy,
}

fn default_replication_factor() -> usize {
    3
}

impl ClusterConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cluster config {}", path.display()))?;
        let config: ClusterConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse cluster config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.seeds.is_empty() {
            anyhow::bail!("Cluster config must list at least one seed node");
        }
        if self.replication_factor == 0 {
            anyhow::bail!("Replication factor must be at least 1");
        }
        Ok(())
    }
}
