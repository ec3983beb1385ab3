use super::config::ClusterConfig;
use super::protocol::{ENDPOINT_FLUSH, ENDPOINT_RING, FlushRequest, FlushResponse, RingResponse};
use super::ring::RingDirectory;

use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;

const CONTROL_TIMEOUT: Duration = Duration::from_millis(2000);
const CONTROL_ATTEMPTS: usize = 3;

/// Explicit cluster context: configuration, the discovered token ring, and
/// the HTTP client for control-plane calls. Constructed once at startup and
/// passed (by `Arc`) to every component that needs cluster state, instead
/// of living in process-wide mutable globals.
pub struct ClusterClient {
    pub config: ClusterConfig,
    pub ring: RingDirectory,
    http_client: reqwest::Client,
}

impl ClusterClient {
    /// Discover the ring and build the client. Tries each configured seed
    /// in turn; fatal only if every seed is unreachable.
    pub async fn connect(config: ClusterConfig) -> Result<Self> {
        config.validate()?;
        let http_client = reqwest::Client::new();

        let ring = Self::discover_ring(&http_client, &config.seeds).await?;
        tracing::info!("Ring discovered: {} node(s)", ring.node_count());

        Ok(Self {
            config,
            ring,
            http_client,
        })
    }

    /// Build a client around an already known ring. Used by tooling and
    /// tests that have no seed node to ask.
    pub fn with_ring(config: ClusterConfig, ring: RingDirectory) -> Self {
        Self {
            config,
            ring,
            http_client: reqwest::Client::new(),
        }
    }

    async fn discover_ring(
        http_client: &reqwest::Client,
        seeds: &[SocketAddr],
    ) -> Result<RingDirectory> {
        for seed in seeds {
            let url = format!("http://{}{}", seed, ENDPOINT_RING);
            match get_with_retry(http_client, url, CONTROL_TIMEOUT, CONTROL_ATTEMPTS).await {
                Ok(response) => {
                    if !response.status().is_success() {
                        tracing::warn!("Seed {} rejected ring request: {}", seed, response.status());
                        continue;
                    }
                    let ring: RingResponse = response.json().await?;
                    tracing::debug!("Seed {} reported {} ring entries", seed, ring.entries.len());
                    return Ok(RingDirectory::from_entries(ring.entries));
                }
                Err(e) => {
                    tracing::warn!("Could not reach seed {}: {}", seed, e);
                }
            }
        }

        anyhow::bail!("Could not fetch the token ring from any configured seed")
    }

    /// Tell every endpoint covering the keyspace to persist its in-memory
    /// write buffer. Run once, after all writers have finished.
    ///
    /// Per-endpoint failures are logged and skipped; the operation itself
    /// always succeeds. Only the logs reveal a partially flushed cluster.
    pub async fn flush_all(&self, keyspace: &str) -> Result<()> {
        let endpoints = self.ring.all_endpoints();
        tracing::info!(
            "Flushing keyspace '{}' on {} endpoint(s)",
            keyspace,
            endpoints.len()
        );

        let payload = FlushRequest {
            keyspace: keyspace.to_string(),
        };

        for endpoint in endpoints {
            let url = format!("http://{}{}", endpoint.control_addr, ENDPOINT_FLUSH);
            match post_with_retry(
                &self.http_client,
                url,
                &payload,
                CONTROL_TIMEOUT,
                CONTROL_ATTEMPTS,
            )
            .await
            {
                Ok(response) if response.status().is_success() => {
                    let ack: FlushResponse = response.json().await.unwrap_or(FlushResponse {
                        success: true,
                    });
                    tracing::debug!(
                        "Flushed: {} {} (ack={})",
                        endpoint.control_addr,
                        keyspace,
                        ack.success
                    );
                }
                Ok(response) => {
                    tracing::warn!(
                        "Failed to flush {}: {}",
                        endpoint.control_addr,
                        response.status()
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to flush {}: {}", endpoint.control_addr, e);
                }
            }
        }

        Ok(())
    }
}

async fn post_with_retry<T: serde::Serialize>(
    http_client: &reqwest::Client,
    url: String,
    payload: &T,
    timeout: Duration,
    attempts: usize,
) -> Result<reqwest::Response> {
    let mut delay_ms = 150u64;

    for attempt in 0..attempts {
        let response = http_client
            .post(url.clone())
            .json(payload)
            .timeout(timeout)
            .send()
            .await;

        match response {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                if attempt + 1 == attempts {
                    return Err(anyhow::anyhow!(e));
                }
                let jitter = rand::random::<u64>() % 50;
                tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                delay_ms = (delay_ms * 2).min(1200);
            }
        }
    }

    Err(anyhow::anyhow!("Retry attempts exhausted"))
}

async fn get_with_retry(
    http_client: &reqwest::Client,
    url: String,
    timeout: Duration,
    attempts: usize,
) -> Result<reqwest::Response> {
    let mut delay_ms = 150u64;

    for attempt in 0..attempts {
        let response = http_client.get(url.clone()).timeout(timeout).send().await;

        match response {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                if attempt + 1 == attempts {
                    return Err(anyhow::anyhow!(e));
                }
                let jitter = rand::random::<u64>() % 50;
                tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                delay_ms = (delay_ms * 2).min(1200);
            }
        }
    }

    Err(anyhow::anyhow!("Retry attempts exhausted"))
}
