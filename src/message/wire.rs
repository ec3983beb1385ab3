//! Wire Envelope Types
//!
//! One-way replication messages are bincode-encoded and framed on TCP as a
//! big-endian u32 length followed by the message bytes.

use crate::writer::types::ColumnFamily;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Which handler the receiving node dispatches the message to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageVerb {
    /// Pre-serialized column family bytes, applied straight to the write
    /// buffer without the normal client-path validation.
    BinaryWrite,
}

/// One row's worth of writes, addressed to a keyspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowMutation {
    pub keyspace: String,
    pub row_key: String,
    pub carrier: ColumnFamily,
}

/// The outermost envelope: one mutation per message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WriteMessage {
    pub id: String,
    pub verb: MessageVerb,
    pub body: Vec<u8>,
}

impl WriteMessage {
    pub fn mutation(&self) -> Result<RowMutation> {
        bincode::deserialize(&self.body).context("Failed to decode row mutation body")
    }
}

/// Encode a message as a length-prefixed frame ready for the socket.
pub fn encode_frame(message: &WriteMessage) -> Result<Vec<u8>> {
    let body = bincode::serialize(message).context("Failed to serialize write message")?;
    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Decode one frame produced by `encode_frame`.
pub fn decode_frame(frame: &[u8]) -> Result<WriteMessage> {
    if frame.len() < 4 {
        anyhow::bail!("Frame shorter than its length prefix");
    }
    let declared = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
    if frame.len() - 4 != declared {
        anyhow::bail!(
            "Frame length mismatch: prefix says {}, got {}",
            declared,
            frame.len() - 4
        );
    }
    bincode::deserialize(&frame[4..]).context("Failed to decode write message")
}
