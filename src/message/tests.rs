//! Message Module Tests
//!
//! Validates the carrier encoding and the frame codec against what the
//! receiving replication handler expects: one mutation envelope per
//! message, inner column family bytes intact.

#[cfg(test)]
mod tests {
    use crate::message::builder::build_write_message;
    use crate::message::wire::{MessageVerb, decode_frame, encode_frame};
    use crate::writer::types::ColumnFamily;

    fn sample_family() -> ColumnFamily {
        let mut family = ColumnFamily::create("Standard1");
        family.add_column(None, b"c1".to_vec(), b"v1".to_vec(), 0);
        family.add_column(None, b"c2".to_vec(), b"v2".to_vec(), 0);
        family
    }

    #[test]
    fn test_carrier_wraps_family_as_single_column() {
        let family = sample_family();
        let message = build_write_message("Keyspace1", "k1", "Standard1", &family).unwrap();

        assert_eq!(message.verb, MessageVerb::BinaryWrite);

        let mutation = message.mutation().unwrap();
        assert_eq!(mutation.keyspace, "Keyspace1");
        assert_eq!(mutation.row_key, "k1");
        assert_eq!(
            mutation.carrier.len(),
            1,
            "Carrier must hold exactly one column per message"
        );

        let column = mutation.carrier.columns.values().next().unwrap();
        assert_eq!(
            column.name, b"Standard1",
            "Carrier column is named after the target family"
        );

        let inner: ColumnFamily = bincode::deserialize(&column.value).unwrap();
        assert_eq!(inner, family, "Inner family bytes must survive untouched");
    }

    #[test]
    fn test_message_ids_are_unique() {
        let family = sample_family();
        let m1 = build_write_message("Keyspace1", "k1", "Standard1", &family).unwrap();
        let m2 = build_write_message("Keyspace1", "k1", "Standard1", &family).unwrap();
        assert_ne!(m1.id, m2.id);
    }

    #[test]
    fn test_frame_roundtrip() {
        let family = sample_family();
        let message = build_write_message("Keyspace1", "k1", "Standard1", &family).unwrap();

        let frame = encode_frame(&message).unwrap();
        let decoded = decode_frame(&frame).unwrap();

        assert_eq!(decoded, message);
    }

    #[test]
    fn test_frame_length_prefix_matches_body() {
        let family = sample_family();
        let message = build_write_message("Keyspace1", "k1", "Standard1", &family).unwrap();

        let frame = encode_frame(&message).unwrap();
        let declared = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
        assert_eq!(declared, frame.len() - 4);
    }

    #[test]
    fn test_decode_rejects_short_frame() {
        assert!(decode_frame(&[0, 0]).is_err());
    }

    #[test]
    fn test_decode_rejects_length_mismatch() {
        let family = sample_family();
        let message = build_write_message("Keyspace1", "k1", "Standard1", &family).unwrap();

        let mut frame = encode_frame(&message).unwrap();
        frame.push(0xFF);
        assert!(decode_frame(&frame).is_err());
    }

    #[test]
    fn test_empty_family_still_builds_valid_envelope() {
        let family = ColumnFamily::create("Standard1");
        let message = build_write_message("Keyspace1", "k1", "Standard1", &family).unwrap();

        let mutation = message.mutation().unwrap();
        let column = mutation.carrier.columns.values().next().unwrap();
        let inner: ColumnFamily = bincode::deserialize(&column.value).unwrap();
        assert!(inner.is_empty());
    }
}
