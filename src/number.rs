//! Fixed-width big-endian conversion between integers and bytes.
//!
//! Decoding reads only the leading bytes of the width it needs and returns
//! `None` when the input is too short to hold them.

pub fn short_to_bytes(value: i16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn int_to_bytes(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn long_to_bytes(value: i64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn bytes_to_short(bytes: &[u8]) -> Option<i16> {
    leading::<2>(bytes).map(i16::from_be_bytes)
}

pub fn bytes_to_int(bytes: &[u8]) -> Option<i32> {
    leading::<4>(bytes).map(i32::from_be_bytes)
}

pub fn bytes_to_long(bytes: &[u8]) -> Option<i64> {
    leading::<8>(bytes).map(i64::from_be_bytes)
}

fn leading<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    bytes.get(..N)?.try_into().ok()
}
