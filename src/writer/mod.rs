//! Write Path Module
//!
//! Implements the row-buffering write path and the replica fan-out.
//!
//! ## Core Concepts
//! - **Row Accumulation**: input arrives grouped by row key; columns for one
//!   row are buffered into a single column family and sent as one mutation
//!   when the row key changes or the writer closes.
//! - **Fan-out**: a completed mutation goes to every replica endpoint as a
//!   one-way message. No acknowledgment, no retry.
//! - **Drain on Close**: closing the router waits (bounded) for the count of
//!   outstanding sends to reach zero before tearing the channel down.

pub mod accumulator;
pub mod router;
pub mod types;
