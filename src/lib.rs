//! Bulk-load bridge for a replicated column store.
//!
//! Ingests pre-sorted `(row, column, value)` triples from a batch job and
//! writes them straight into the cluster by speaking the store's internal
//! replication protocol, bypassing the client write path for throughput.
//!
//! ## Architecture Modules
//! The bridge is composed of four loosely coupled subsystems:
//!
//! - **`cluster`**: The cluster client context. Discovers the token ring
//!   from seed nodes, resolves replica placement, and coordinates the
//!   post-job memtable flush over the HTTP control plane.
//! - **`writer`**: The write path. Buffers columns per row key, then fans
//!   the completed column family out to every replica endpoint as one-way
//!   messages over the outbound channel.
//! - **`message`**: The replication wire format. Builds the carrier-encoded
//!   mutation envelope the receiving store validates, and frames it for TCP.
//! - **`ingest`**: The data intake pipeline. Parses tab-separated input
//!   lines and drives one writer per input file through the import job.

pub mod cluster;
pub mod ingest;
pub mod message;
pub mod writer;
