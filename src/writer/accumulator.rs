use super::router::MutationSink;
use super::types::{ColumnFamily, RowColumn};
use crate::cluster::config::TimestampPolicy;
use crate::message::builder::build_write_message;
use anyhow::Result;

/// Buffers columns for one row key and emits a single mutation per row.
///
/// Input arrives grouped and sorted by row key (upstream contract). While
/// the row key stays the same, columns accumulate into one column family;
/// when it changes, the previous row's family is built into a message and
/// handed to the sink before a fresh family starts. The accumulator never
/// touches a family again after handing it off.
///
/// Per instance the lifecycle is
/// `CREATED -> ACCUMULATING(row) -> FLUSHING -> ACCUMULATING(next) -> ... -> CLOSED`;
/// `close` performs one final flush if a row is buffered, then shuts the
/// sink down. `CLOSED` is terminal, enforced by `close` taking `self`.
pub struct RowWriter<S: MutationSink> {
    keyspace: String,
    cf_name: String,
    timestamps: TimestampPolicy,
    sink: S,
    current: Option<(String, ColumnFamily)>,
}

impl<S: MutationSink> RowWriter<S> {
    pub fn new(
        keyspace: impl Into<String>,
        cf_name: impl Into<String>,
        timestamps: TimestampPolicy,
        sink: S,
    ) -> Self {
        Self {
            keyspace: keyspace.into(),
            cf_name: cf_name.into(),
            timestamps,
            sink,
            current: None,
        }
    }

    /// Append one triple. Flushes the previous row first when the row key
    /// changes; the very first write has no previous row and never flushes.
    pub fn write(&mut self, key: RowColumn, value: Vec<u8>) -> Result<()> {
        let row_changed = match &self.current {
            Some((buffered_key, _)) => *buffered_key != key.row_key,
            None => true,
        };

        if row_changed {
            if let Some((previous_key, family)) = self.current.take() {
                self.flush(&previous_key, &family)?;
            }
            self.current = Some((key.row_key.clone(), ColumnFamily::create(&self.cf_name)));
        }

        if let Some((_, family)) = self.current.as_mut() {
            family.add_column(
                key.super_column,
                key.column_name,
                value,
                self.timestamps.next(),
            );
        }

        Ok(())
    }

    /// Flush the buffered row exactly once if present, then shut the sink
    /// down. A close with nothing buffered still closes the sink.
    pub async fn close(mut self) -> Result<()> {
        if let Some((row_key, family)) = self.current.take() {
            self.flush(&row_key, &family)?;
        }
        self.sink.close().await
    }

    fn flush(&self, row_key: &str, family: &ColumnFamily) -> Result<()> {
        if family.is_empty() {
            return Ok(());
        }
        let message = build_write_message(&self.keyspace, row_key, &self.cf_name, family)?;
        tracing::debug!("Flushing row '{}' with {} column(s)", row_key, family.len());
        self.sink.deliver(row_key, message)
    }
}
