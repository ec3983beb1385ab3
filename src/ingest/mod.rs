//! Ingest Module
//!
//! Thin intake pipeline in front of the write path.
//!
//! ## Workflow
//! 1. **Enumerate**: list the input directory's files in name order.
//! 2. **Parse**: split each UTF-8 line on tabs into (row key, column, value),
//!    counting and skipping malformed lines.
//! 3. **Write**: stream triples into one `RowWriter` per file, each running
//!    as its own task with its own outbound channel.
//! 4. **Flush**: after every writer finishes, tell the cluster to persist.

pub mod job;
pub mod parser;

#[cfg(test)]
mod tests;
