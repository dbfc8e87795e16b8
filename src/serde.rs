//! Serializable snapshot of a [crate::BitBuffer].
//!
//! A [BitBufferDef] records the raw bytes together with the cursor state, so a
//! buffer that is halfway through being written (or read) can be stored and
//! resumed later. Convert with `BitBufferDef::from(&buffer)` and
//! `BitBuffer::try_from(def)`; the latter re-checks the cursor invariants and
//! fails with [crate::BitBufferError::InvalidArgument] on inconsistent state.

use serde::{Deserialize, Serialize};

/// Raw state of a bit buffer.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BitBufferDef {
    /// Backing bytes, including any bytes past the limit.
    pub storage: Vec<u8>,
    /// Addressable bits, at most `storage.len() * 8`.
    pub capacity_bits: usize,
    /// Unused low-order bits of the last readable byte, `0..8`.
    pub pad_bits: usize,
    /// Bytes available to the cursor.
    pub limit: usize,
    /// Cursor position in bits from the start.
    pub position_bits: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitBuffer, BitBufferError};

    #[test]
    fn test_snapshot_resumes_writing() {
        let mut buffer = BitBuffer::allocate(12).unwrap();
        buffer.put_bits(13, 4).unwrap();

        let json = serde_json::to_string(&BitBufferDef::from(&buffer)).unwrap();
        let def: BitBufferDef = serde_json::from_str(&json).unwrap();
        let mut restored = BitBuffer::try_from(def).unwrap();
        assert_eq!(restored, buffer);

        restored.put_bits(89, 8).unwrap();
        restored.flip();
        assert_eq!(restored.get_bits(4).unwrap(), 13);
        assert_eq!(restored.get_byte().unwrap(), 89);
    }

    #[test]
    fn test_snapshot_field_names() {
        let buffer = BitBuffer::wrap([0xa5]).unwrap();
        let value = serde_json::to_value(BitBufferDef::from(&buffer)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "storage": [165],
                "capacity_bits": 8,
                "pad_bits": 0,
                "limit": 1,
                "position_bits": 0
            })
        );
    }

    #[test]
    fn test_snapshot_rejects_cursor_in_padding() {
        let def = BitBufferDef {
            storage: vec![0, 0],
            capacity_bits: 12,
            pad_bits: 4,
            limit: 2,
            position_bits: 14,
        };
        assert!(matches!(
            BitBuffer::try_from(def).unwrap_err(),
            BitBufferError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_snapshot_rejects_capacity_mismatch() {
        let def = BitBufferDef {
            storage: vec![0xff; 3],
            capacity_bits: 1,
            pad_bits: 0,
            limit: 3,
            position_bits: 0,
        };
        assert!(matches!(
            BitBuffer::try_from(def).unwrap_err(),
            BitBufferError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_snapshot_rejects_readable_bits_past_capacity() {
        let def = BitBufferDef {
            storage: vec![0, 0],
            capacity_bits: 12,
            pad_bits: 0,
            limit: 2,
            position_bits: 0,
        };
        assert!(matches!(
            BitBuffer::try_from(def).unwrap_err(),
            BitBufferError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_snapshot_accepts_flipped_buffer() {
        let mut buffer = BitBuffer::allocate(20).unwrap();
        buffer.put_bits(0b101, 3).unwrap();
        buffer.flip();

        let restored = BitBuffer::try_from(BitBufferDef::from(&buffer)).unwrap();
        assert_eq!(restored.remaining_bits(), 3);
        assert_eq!(restored.capacity_bits(), 20);
    }

    #[test]
    fn test_snapshot_rejects_limit_past_storage() {
        let def = BitBufferDef {
            storage: vec![0],
            capacity_bits: 8,
            pad_bits: 0,
            limit: 2,
            position_bits: 0,
        };
        assert!(BitBuffer::try_from(def).is_err());
    }
}
