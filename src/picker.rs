//! Bit extraction and mask helpers operating on a single byte.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the byte.
//! The unchecked functions expect their ranges to stay inside the byte; the
//! `checked_*` and [pick_part] variants validate and return an error instead.

use crate::errors::{BitBufferError, Result};

/// Returns bits `[start_bit, end_bit)` of `byte`, right-justified.
///
/// Requires `start_bit <= end_bit <= 8`.
pub fn pick_middle(byte: u8, start_bit: usize, end_bit: usize) -> u8 {
    debug_assert!(start_bit <= end_bit && end_bit <= 8);

    let shifted = ((byte as u32) << start_bit) & 0xff;
    (shifted >> (8 + start_bit - end_bit)) as u8
}

/// Returns the top `bit_length` bits of `byte`, right-justified.
///
/// Requires `bit_length <= 8`; see [checked_pick_left].
pub fn pick_left(byte: u8, bit_length: usize) -> u8 {
    pick_middle(byte, 0, bit_length)
}

/// Returns the bottom `bit_length` bits of `byte`.
///
/// Requires `bit_length <= 8`; see [checked_pick_right].
pub fn pick_right(byte: u8, bit_length: usize) -> u8 {
    byte & right_mask(bit_length)
}

/// Mask with the low `bit_length` bits set, e.g. 3 gives `0b0000_0111`.
///
/// Requires `bit_length <= 8`.
pub fn right_mask(bit_length: usize) -> u8 {
    debug_assert!(bit_length <= 8);

    !(0xffu32 << bit_length) as u8
}

/// Mask with the high `bit_length` bits set, e.g. 3 gives `0b1110_0000`.
///
/// Requires `bit_length <= 8`.
pub fn left_mask(bit_length: usize) -> u8 {
    debug_assert!(bit_length <= 8);

    ((right_mask(bit_length) as u32) << (8 - bit_length)) as u8
}

/// Overwrites bits `[start_bit, start_bit + bit_length)` of `dest` with the low
/// `bit_length` bits of `bits`, keeping every other bit of `dest`.
pub fn merge(dest: u8, bits: u8, start_bit: usize, bit_length: usize) -> u8 {
    debug_assert!(start_bit + bit_length <= 8);

    let shift = 8 - start_bit - bit_length;
    let hole = (right_mask(bit_length) as u32) << shift;
    let fill = (pick_right(bits, bit_length) as u32) << shift;

    ((dest as u32 & !hole) | fill) as u8
}

/// Returns `bit_length` bits of `byte` starting at `from_bit`, right-justified.
///
/// Fails with [BitBufferError::InvalidArgument] if the run leaves the byte.
pub fn pick_part(byte: u8, from_bit: usize, bit_length: usize) -> Result<u8> {
    let end_bit = from_bit
        .checked_add(bit_length)
        .filter(|end| *end <= 8)
        .ok_or(BitBufferError::InvalidArgument(
            "from_bit + bit_length must not exceed 8",
        ))?;

    Ok(pick_middle(byte, from_bit, end_bit))
}

/// Like [pick_left], failing if `bit_length > 8`.
pub fn checked_pick_left(byte: u8, bit_length: usize) -> Result<u8> {
    check_byte_run(bit_length)?;
    Ok(pick_left(byte, bit_length))
}

/// Like [pick_right], failing if `bit_length > 8`.
pub fn checked_pick_right(byte: u8, bit_length: usize) -> Result<u8> {
    check_byte_run(bit_length)?;
    Ok(pick_right(byte, bit_length))
}

pub(crate) fn check_byte_run(bit_length: usize) -> Result<()> {
    if bit_length > 8 {
        return Err(BitBufferError::InvalidArgument(
            "a byte holds 8 bits, bit_length must not exceed 8",
        ));
    }

    Ok(())
}
