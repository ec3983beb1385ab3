use super::parser::parse_line;
use crate::cluster::client::ClusterClient;
use crate::writer::accumulator::RowWriter;
use crate::writer::router::ReplicationRouter;
use crate::writer::types::RowColumn;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Job-level counters, shared across writer tasks.
///
/// Malformed input never fails the job; the counters are the only place
/// that kind of degradation shows up.
#[derive(Debug, Default)]
pub struct JobCounters {
    pub lines_read: AtomicU64,
    pub invalid_lines: AtomicU64,
    pub columns_written: AtomicU64,
}

/// Drives one import: a writer task per input file, then a cluster flush.
///
/// Input contract: within each file, lines are pre-sorted so that all lines
/// for one row key are contiguous. Across files there is no ordering
/// guarantee, the writers run unsynchronized.
pub struct ImportJob {
    cluster: Arc<ClusterClient>,
    keyspace: String,
    cf_name: String,
    pub counters: Arc<JobCounters>,
}

impl ImportJob {
    pub fn new(
        cluster: Arc<ClusterClient>,
        keyspace: impl Into<String>,
        cf_name: impl Into<String>,
    ) -> Self {
        Self {
            cluster,
            keyspace: keyspace.into(),
            cf_name: cf_name.into(),
            counters: Arc::new(JobCounters::default()),
        }
    }

    pub async fn run(&self, input_dir: &Path) -> Result<()> {
        let files = list_input_files(input_dir)?;
        tracing::info!(
            "Importing {} file(s) from {} into {}/{}",
            files.len(),
            input_dir.display(),
            self.keyspace,
            self.cf_name
        );

        if files.is_empty() {
            tracing::warn!("Input directory {} has no files", input_dir.display());
        }

        let mut handles = Vec::new();
        for file in files {
            let cluster = self.cluster.clone();
            let counters = self.counters.clone();
            let keyspace = self.keyspace.clone();
            let cf_name = self.cf_name.clone();

            handles.push(tokio::spawn(async move {
                import_file(&file, cluster, counters, &keyspace, &cf_name).await
            }));
        }

        for handle in handles {
            handle.await.context("Writer task panicked")??;
        }

        // All writers are done, persist what the cluster has buffered.
        self.cluster.flush_all(&self.keyspace).await?;

        tracing::info!(
            "Import finished: {} line(s) read, {} column(s) written, {} invalid line(s) skipped",
            self.counters.lines_read.load(Ordering::Relaxed),
            self.counters.columns_written.load(Ordering::Relaxed),
            self.counters.invalid_lines.load(Ordering::Relaxed)
        );

        Ok(())
    }
}

/// One writer instance: own accumulator, own outbound channel.
async fn import_file(
    path: &Path,
    cluster: Arc<ClusterClient>,
    counters: Arc<JobCounters>,
    keyspace: &str,
    cf_name: &str,
) -> Result<()> {
    tracing::info!("Importing {}", path.display());

    let router = ReplicationRouter::new(cluster.clone());
    let mut writer = RowWriter::new(keyspace, cf_name, cluster.config.timestamp_mode, router);

    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();

    while let Some(line) = lines.next_line().await? {
        counters.lines_read.fetch_add(1, Ordering::Relaxed);

        match parse_line(&line) {
            Some(triple) => {
                writer.write(
                    RowColumn::new(triple.row_key, triple.column_name),
                    triple.value,
                )?;
                counters.columns_written.fetch_add(1, Ordering::Relaxed);
            }
            None => {
                counters.invalid_lines.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Skipping malformed line in {}", path.display());
            }
        }
    }

    writer.close().await
}

fn list_input_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read input directory {}", input_dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
