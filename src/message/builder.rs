use super::wire::{MessageVerb, RowMutation, WriteMessage};
use crate::writer::types::ColumnFamily;
use anyhow::{Context, Result};
use uuid::Uuid;

/// Wrap one accumulated column family into the message the replication
/// layer expects.
///
/// The real family is serialized to bytes first, then carried as a single
/// column inside an outer column family: the column's name is the target
/// family's name, its value is the serialized bytes. The receiving
/// validation path wants exactly one mutation envelope per message; the
/// carrier satisfies it while letting the bridge inject pre-built
/// column-family bytes of arbitrary shape.
///
/// A serialization failure here is fatal for the row: the error propagates
/// and nothing partial ever reaches the wire.
pub fn build_write_message(
    keyspace: &str,
    row_key: &str,
    cf_name: &str,
    family: &ColumnFamily,
) -> Result<WriteMessage> {
    let family_bytes = bincode::serialize(family)
        .with_context(|| format!("Failed to serialize column family for row '{}'", row_key))?;

    let mut carrier = ColumnFamily::create(cf_name);
    // Timestamp 0 on the carrier column: the receiving handler unwraps it
    // and only the inner columns' timestamps survive.
    carrier.add_column(None, cf_name.as_bytes().to_vec(), family_bytes, 0);

    let mutation = RowMutation {
        keyspace: keyspace.to_string(),
        row_key: row_key.to_string(),
        carrier,
    };

    let body = bincode::serialize(&mutation)
        .with_context(|| format!("Failed to serialize mutation for row '{}'", row_key))?;

    Ok(WriteMessage {
        id: Uuid::new_v4().to_string(),
        verb: MessageVerb::BinaryWrite,
        body,
    })
}
