use crate::cluster::client::ClusterClient;
use crate::message::wire::{WriteMessage, encode_frame};

use anyhow::Result;
use dashmap::DashMap;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::{Notify, mpsc};
use tokio::time::Instant;

/// Upper bound on the close-time drain wait. Messages can still be in
/// flight when the process exits; this is a best-effort barrier.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);
const CONNECT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Where completed row mutations go.
///
/// The accumulator only knows this seam; production wires it to the
/// replication router, tests wire it to a recorder.
pub trait MutationSink: Send + Sync {
    /// Hand over one row's mutation. Enqueue-only, never blocks on the
    /// network.
    fn deliver(&self, row_key: &str, message: WriteMessage) -> Result<()>;

    /// Shut the outbound channel down, draining queued sends best-effort.
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

struct Outbound {
    target: SocketAddr,
    frame: Arc<Vec<u8>>,
}

/// Count of sends enqueued but not yet attempted by the sender task.
///
/// Replaces a guessed sleep at shutdown: close waits for this to reach
/// zero, bounded by the grace period.
struct DeliveryTracker {
    pending: AtomicUsize,
    notify: Notify,
}

impl DeliveryTracker {
    fn new() -> Self {
        Self {
            pending: AtomicUsize::new(0),
            notify: Notify::new(),
        }
    }

    fn add(&self, n: usize) {
        self.pending.fetch_add(n, Ordering::AcqRel);
    }

    fn complete(&self) {
        self.pending.fetch_sub(1, Ordering::AcqRel);
        self.notify.notify_waiters();
    }

    /// Wait until nothing is outstanding or the grace period runs out.
    /// Returns how many sends were still queued when it gave up.
    async fn drain(&self, grace: Duration) -> usize {
        let deadline = Instant::now() + grace;
        loop {
            let notified = self.notify.notified();
            let outstanding = self.pending.load(Ordering::Acquire);
            if outstanding == 0 {
                return 0;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return outstanding;
            }
            if tokio::time::timeout(remaining, notified).await.is_err() {
                return self.pending.load(Ordering::Acquire);
            }
        }
    }
}

/// Fans one row's mutation out to every replica endpoint, fire-and-forget.
///
/// Each writer instance owns its router and outbound channel exclusively; a
/// single spawned sender task owns the TCP connections and writes frames as
/// they are dequeued. Resolution goes through the ring directory, so sends
/// fail fast when startup never populated the ring.
pub struct ReplicationRouter {
    cluster: Arc<ClusterClient>,
    tx: mpsc::UnboundedSender<Outbound>,
    tracker: Arc<DeliveryTracker>,
    sent: Arc<DashMap<SocketAddr, u64>>,
}

impl ReplicationRouter {
    pub fn new(cluster: Arc<ClusterClient>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tracker = Arc::new(DeliveryTracker::new());
        let sent: Arc<DashMap<SocketAddr, u64>> = Arc::new(DashMap::new());

        {
            let tracker = tracker.clone();
            let sent = sent.clone();
            tokio::spawn(async move {
                sender_loop(rx, tracker, sent).await;
            });
        }

        Self {
            cluster,
            tx,
            tracker,
            sent,
        }
    }
}

impl MutationSink for ReplicationRouter {
    fn deliver(&self, row_key: &str, message: WriteMessage) -> Result<()> {
        let replicas = self
            .cluster
            .ring
            .replicas_for(row_key, self.cluster.config.replication_factor)?;

        let frame = Arc::new(encode_frame(&message)?);

        self.tracker.add(replicas.len());
        for endpoint in replicas {
            let outbound = Outbound {
                target: endpoint.data_addr,
                frame: frame.clone(),
            };
            if self.tx.send(outbound).is_err() {
                self.tracker.complete();
                tracing::warn!("Outbound channel already closed, dropping send");
            }
        }

        Ok(())
    }

    async fn close(self) -> Result<()> {
        let ReplicationRouter {
            tx, tracker, sent, ..
        } = self;

        // Closing the channel lets the sender task finish its queue and exit.
        drop(tx);

        let remaining = tracker.drain(SHUTDOWN_GRACE).await;
        if remaining > 0 {
            tracing::warn!(
                "Outbound channel closed with {} send(s) still queued",
                remaining
            );
        }

        for entry in sent.iter() {
            tracing::info!("Sent {} message(s) to {}", entry.value(), entry.key());
        }

        Ok(())
    }
}

async fn sender_loop(
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    tracker: Arc<DeliveryTracker>,
    sent: Arc<DashMap<SocketAddr, u64>>,
) {
    let mut connections: HashMap<SocketAddr, TcpStream> = HashMap::new();

    while let Some(outbound) = rx.recv().await {
        match send_frame(&mut connections, outbound.target, &outbound.frame).await {
            Ok(()) => {
                *sent.entry(outbound.target).or_insert(0) += 1;
            }
            Err(e) => {
                // Fire-and-forget: log, drop the connection, move on.
                tracing::warn!("Failed to send to {}: {}", outbound.target, e);
                connections.remove(&outbound.target);
            }
        }
        tracker.complete();
    }

    tracing::debug!("Sender task finished, tearing down {} connection(s)", connections.len());
}

async fn send_frame(
    connections: &mut HashMap<SocketAddr, TcpStream>,
    target: SocketAddr,
    frame: &[u8],
) -> Result<()> {
    let stream = match connections.entry(target) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
            let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(target))
                .await
                .map_err(|_| anyhow::anyhow!("Connect timeout to {}", target))??;
            entry.insert(stream)
        }
    };

    stream.write_all(frame).await?;
    Ok(())
}
