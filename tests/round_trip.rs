use bitbuffer::{BitBuffer, BitBufferError, picker::pick_right, text};
use proptest::prelude::*;

fn runs() -> impl Strategy<Value = Vec<(usize, u8)>> {
    prop::collection::vec((1usize..=8, any::<u8>()), 1..48)
}

proptest! {
    #[test]
    fn prop_runs_read_back_in_same_chunking(runs in runs()) {
        let total: usize = runs.iter().map(|(len, _)| len).sum();
        let mut buffer = BitBuffer::allocate(total).unwrap();
        for &(len, data) in &runs {
            buffer.put_bits(data, len).unwrap();
        }
        prop_assert_eq!(buffer.remaining_bits(), 0);

        buffer.flip();
        prop_assert_eq!(buffer.remaining_bits(), total);
        for &(len, data) in &runs {
            prop_assert_eq!(buffer.get_bits(len).unwrap(), pick_right(data, len));
        }
        prop_assert_eq!(buffer.remaining_bits(), 0);
    }

    #[test]
    fn prop_rechunked_read_matches_bit_by_bit(runs in runs()) {
        let total: usize = runs.iter().map(|(len, _)| len).sum();
        let mut buffer = BitBuffer::allocate(total).unwrap();
        for &(len, data) in &runs {
            buffer.put_bits(data, len).unwrap();
        }

        buffer.flip();
        let mut bits = Vec::with_capacity(total);
        for _ in 0..total {
            bits.push(buffer.get_bits(1).unwrap());
        }

        buffer.flip();
        let bytes = buffer.get_bytes(total).unwrap();
        let digits: String = bits.iter().map(|bit| if *bit == 1 { '1' } else { '0' }).collect();
        prop_assert_eq!(text::text_to_bytes(&digits).unwrap(), bytes);
    }

    #[test]
    fn prop_absolute_put_keeps_cursor(
        runs in runs(),
        data in any::<u8>(),
        len in 1usize..=8,
        start_seed in any::<usize>(),
    ) {
        let total: usize = runs.iter().map(|(len, _)| len).sum::<usize>() + 8;
        let mut buffer = BitBuffer::allocate(total).unwrap();
        for &(run_len, run_data) in &runs {
            buffer.put_bits(run_data, run_len).unwrap();
        }

        let (position, remaining) = (buffer.position(), buffer.remaining_bits());
        let start = start_seed % (total - len + 1);
        buffer.put_bits_at(data, start, len).unwrap();

        prop_assert_eq!(buffer.position(), position);
        prop_assert_eq!(buffer.remaining_bits(), remaining);
        prop_assert_eq!(buffer.get_bits_at(start, len).unwrap(), pick_right(data, len));
    }

    #[test]
    fn prop_failed_put_leaves_buffer_unchanged(capacity in 1usize..64, data in any::<u8>()) {
        let mut buffer = BitBuffer::allocate(capacity).unwrap();
        let fill = vec![0xa5u8; capacity.div_ceil(8)];
        buffer.put_bytes(&fill, capacity).unwrap();
        let before = buffer.clone();

        prop_assert!(
            matches!(buffer.put_bits(data, 1), Err(BitBufferError::OutOfRange { .. })),
            "put past capacity must be rejected"
        );
        prop_assert_eq!(buffer, before);
    }
}

#[test]
fn test_boundary_extraction() {
    let mut buffer = BitBuffer::wrap([210]).unwrap();
    assert_eq!(buffer.get_bits(2).unwrap(), 3);
    assert_eq!(buffer.get_bits(6).unwrap(), 18);

    let mut buffer = BitBuffer::wrap([210, 50]).unwrap();
    assert_eq!(buffer.get_bits(2).unwrap(), 3);
    assert_eq!(buffer.get_bits(8).unwrap(), 72);
}

#[test]
fn test_overflow_and_invalid_length() {
    let mut buffer = BitBuffer::allocate(7).unwrap();
    assert!(matches!(
        buffer.put_bits(1, 8).unwrap_err(),
        BitBufferError::OutOfRange { .. }
    ));

    let mut buffer = BitBuffer::allocate(64).unwrap();
    assert!(matches!(
        buffer.get_bits(9).unwrap_err(),
        BitBufferError::InvalidArgument(_)
    ));
}

#[test]
fn test_fixture_from_text() {
    let bytes = text::text_to_bytes("1101 00100011 00100100").unwrap();
    assert_eq!(text::bytes_to_text(&bytes), "00001101 00100011 00100100 ");

    let mut buffer = BitBuffer::wrap(bytes).unwrap();
    buffer.get_bits(4).unwrap();
    assert_eq!(buffer.get_bytes(20).unwrap(), vec![0b1101, 0b0010_0011, 0b0010_0100]);
}
