//! Fixed-capacity buffer addressed in bits.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first
//! byte. A [BitBuffer] keeps a cursor made of a byte index and a bit offset
//! inside that byte. Sequential `get_*`/`put_*` calls move the cursor, the
//! `*_at` variants address bits from the start of the buffer and leave it
//! alone. Writing and reading share one cursor, so a producer writes, calls
//! [BitBuffer::flip], and a consumer reads back what was written.

use tracing::{debug, trace};

use crate::{
    errors::{BitBufferError, Result},
    fragment::Fragment,
    number,
    picker::{check_byte_run, left_mask, merge, pick_left, pick_middle},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer {
    storage: Vec<u8>,
    capacity_bits: usize,
    /// Unused low-order bits at the end of the last readable byte.
    pad_bits: usize,
    /// Bytes available to the cursor; shrinks to the written length on flip.
    limit: usize,
    cursor_byte: usize,
    cursor_bit: usize,
}

impl BitBuffer {
    /// Creates a buffer over existing bytes. Every bit is addressable.
    pub fn wrap(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let storage = bytes.into();
        if storage.is_empty() {
            return Err(BitBufferError::InvalidArgument(
                "cannot wrap an empty byte sequence",
            ));
        }

        let capacity_bits = storage.len() * 8;
        trace!(capacity_bits, "wrapped bit buffer");

        Ok(Self {
            limit: storage.len(),
            storage,
            capacity_bits,
            pad_bits: 0,
            cursor_byte: 0,
            cursor_bit: 0,
        })
    }

    /// Creates a zeroed buffer holding exactly `bit_length` bits.
    pub fn allocate(bit_length: usize) -> Result<Self> {
        if bit_length == 0 {
            return Err(BitBufferError::InvalidArgument(
                "bit_length must be larger than 0",
            ));
        }

        let byte_length = bit_length.div_ceil(8);
        let pad_bits = (8 - bit_length % 8) % 8;
        trace!(capacity_bits = bit_length, pad_bits, "allocated bit buffer");

        Ok(Self {
            storage: vec![0; byte_length],
            capacity_bits: bit_length,
            pad_bits,
            limit: byte_length,
            cursor_byte: 0,
            cursor_bit: 0,
        })
    }

    /// Rebuilds a buffer from its raw state, checking every cursor invariant.
    #[cfg(feature = "serde")]
    fn from_raw_parts(
        storage: Vec<u8>,
        capacity_bits: usize,
        pad_bits: usize,
        limit: usize,
        position_bits: usize,
    ) -> Result<Self> {
        let (cursor_byte, cursor_bit) = (position_bits / 8, position_bits % 8);

        if storage.is_empty()
            || capacity_bits.div_ceil(8) != storage.len()
            || pad_bits >= 8
            || limit > storage.len()
            || cursor_byte > limit
        {
            return Err(BitBufferError::InvalidArgument(
                "raw buffer state violates the cursor invariants",
            ));
        }

        let buffer = Self {
            storage,
            capacity_bits,
            pad_bits,
            limit,
            cursor_byte,
            cursor_bit,
        };

        if buffer.remaining_from(position_bits) + position_bits + pad_bits != limit * 8 {
            return Err(BitBufferError::InvalidArgument(
                "cursor lies inside the padding bits",
            ));
        }
        if (limit * 8).saturating_sub(pad_bits) > capacity_bits {
            return Err(BitBufferError::InvalidArgument(
                "readable bits exceed the buffer capacity",
            ));
        }

        Ok(buffer)
    }

    /// Bits left between the cursor and the limit, excluding padding.
    pub fn remaining_bits(&self) -> usize {
        self.remaining_from(self.position())
    }

    /// Cursor position in bits from the start of the buffer.
    pub fn position(&self) -> usize {
        self.cursor_byte * 8 + self.cursor_bit
    }

    /// Number of bytes the cursor may travel through.
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn capacity_bits(&self) -> usize {
        self.capacity_bits
    }

    pub fn pad_bits(&self) -> usize {
        self.pad_bits
    }

    /// Commits what has been written so far and rewinds the cursor so it can
    /// be read back.
    ///
    /// A partially filled byte counts as used: its unwritten low bits become
    /// padding. When the cursor sits on a byte boundary nothing is padded.
    pub fn flip(&mut self) {
        if self.cursor_bit > 0 {
            self.limit = self.cursor_byte + 1;
            self.pad_bits = 8 - self.cursor_bit;
        } else {
            self.limit = self.cursor_byte;
            self.pad_bits = 0;
        }

        self.cursor_byte = 0;
        self.cursor_bit = 0;
        trace!(limit = self.limit, pad_bits = self.pad_bits, "flipped bit buffer");
    }

    /// Reads the next 8 bits.
    pub fn get_byte(&mut self) -> Result<u8> {
        self.get_bits(8)
    }

    /// Reads the next `bit_length` (`0..=8`) bits, right-justified.
    ///
    /// With the buffer `11010010 00110010`, `get_bits(2)` returns `0b11` and a
    /// following `get_bits(8)` returns `0b01001000`.
    pub fn get_bits(&mut self, bit_length: usize) -> Result<u8> {
        check_byte_run(bit_length)?;
        if bit_length == 0 {
            return Ok(0);
        }
        self.ensure_remaining(bit_length)?;

        let value = self.read_run(self.position(), bit_length)?;
        self.advance(bit_length);

        Ok(value)
    }

    /// Reads `bit_length` (`0..=8`) bits starting at `start_bit` without
    /// moving the cursor.
    ///
    /// The length is still bounded by [BitBuffer::remaining_bits], so absolute
    /// reads cannot see more than what the cursor has left to consume.
    pub fn get_bits_at(&self, start_bit: usize, bit_length: usize) -> Result<u8> {
        check_byte_run(bit_length)?;
        if bit_length == 0 {
            return Ok(0);
        }
        self.ensure_remaining(bit_length)?;

        self.read_run(start_bit, bit_length)
    }

    /// Reads the next `bit_length` bits into `ceil(bit_length / 8)` bytes.
    ///
    /// The first byte holds the leading `bit_length % 8` bits (or a full
    /// byte when aligned), right-justified; every following byte is full.
    pub fn get_bytes(&mut self, bit_length: usize) -> Result<Vec<u8>> {
        if bit_length == 0 {
            return Ok(Vec::new());
        }
        self.ensure_remaining(bit_length)?;

        let mut bytes = Vec::with_capacity(bit_length.div_ceil(8));
        bytes.push(self.get_bits(head_length(bit_length))?);
        for _ in 1..bit_length.div_ceil(8) {
            bytes.push(self.get_bits(8)?);
        }

        Ok(bytes)
    }

    /// Like [BitBuffer::get_bytes], starting at `start_bit` and leaving the
    /// cursor untouched.
    pub fn get_bytes_at(&self, start_bit: usize, bit_length: usize) -> Result<Vec<u8>> {
        if bit_length == 0 {
            return Ok(Vec::new());
        }
        self.ensure_remaining(bit_length)?;

        let head = head_length(bit_length);
        let mut bytes = Vec::with_capacity(bit_length.div_ceil(8));
        bytes.push(self.read_run(start_bit, head)?);

        let mut pos = start_bit + head;
        while pos < start_bit + bit_length {
            bytes.push(self.read_run(pos, 8)?);
            pos += 8;
        }

        Ok(bytes)
    }

    /// Writes a full byte at the cursor.
    pub fn put_byte(&mut self, data: u8) -> Result<&mut Self> {
        self.put_bits(data, 8)
    }

    /// Writes the low `bit_length` (`0..=8`) bits of `data` at the cursor.
    ///
    /// Only the targeted bits change; the rest of each touched byte is kept.
    /// A run that crosses a byte boundary puts its high bits at the end of the
    /// current byte and the remainder at the start of the next.
    pub fn put_bits(&mut self, data: u8, bit_length: usize) -> Result<&mut Self> {
        check_byte_run(bit_length)?;
        if bit_length == 0 {
            return Ok(self);
        }
        self.ensure_remaining(bit_length)?;

        self.write_run(self.position(), data, bit_length)?;
        self.advance(bit_length);

        Ok(self)
    }

    /// Writes the low `bit_length` (`0..=8`) bits of `data` at `start_bit`
    /// without moving the cursor.
    pub fn put_bits_at(
        &mut self,
        data: u8,
        start_bit: usize,
        bit_length: usize,
    ) -> Result<&mut Self> {
        check_byte_run(bit_length)?;
        if bit_length == 0 {
            return Ok(self);
        }
        self.ensure_remaining_from(start_bit, bit_length)?;

        self.write_run(start_bit, data, bit_length)?;

        Ok(self)
    }

    /// Writes every bit of `data` at the cursor.
    pub fn put_all(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.put_bytes(data, data.len() * 8)
    }

    /// Writes the first `bit_length` bits of `data` at the cursor.
    ///
    /// Whole bytes go first, then the high bits of the next source byte:
    /// 10 bits of `11111111 11000000` write `11111111 11`.
    pub fn put_bytes(&mut self, data: &[u8], bit_length: usize) -> Result<&mut Self> {
        check_source_length(data, bit_length)?;
        if bit_length == 0 {
            return Ok(self);
        }
        self.ensure_remaining(bit_length)?;

        let (full, tail) = (bit_length / 8, bit_length % 8);
        for &byte in &data[..full] {
            self.put_bits(byte, 8)?;
        }
        if let Some(&last) = data.get(full).filter(|_| tail > 0) {
            self.put_bits(pick_left(last, tail), tail)?;
        }

        Ok(self)
    }

    /// Like [BitBuffer::put_bytes], starting at `start_bit` and leaving the
    /// cursor untouched.
    pub fn put_bytes_at(
        &mut self,
        data: &[u8],
        start_bit: usize,
        bit_length: usize,
    ) -> Result<&mut Self> {
        check_source_length(data, bit_length)?;
        if bit_length == 0 {
            return Ok(self);
        }
        self.ensure_remaining_from(start_bit, bit_length)?;

        let (full, tail) = (bit_length / 8, bit_length % 8);
        let mut pos = start_bit;
        for &byte in &data[..full] {
            self.write_run(pos, byte, 8)?;
            pos += 8;
        }
        if let Some(&last) = data.get(full).filter(|_| tail > 0) {
            self.write_run(pos, pick_left(last, tail), tail)?;
        }

        Ok(self)
    }

    /// Writes the last `bit_length` bits of `data` at the cursor.
    ///
    /// 10 bits of `00001001 10011100` write `01 10011100`.
    pub fn put_bytes_right_aligned(&mut self, data: &[u8], bit_length: usize) -> Result<&mut Self> {
        check_source_length(data, bit_length)?;
        if bit_length == 0 {
            return Ok(self);
        }
        self.ensure_remaining(bit_length)?;

        let source = &data[data.len() - bit_length.div_ceil(8)..];
        if let Some((&first, rest)) = source.split_first() {
            self.put_bits(first, head_length(bit_length))?;
            for &byte in rest {
                self.put_bits(byte, 8)?;
            }
        }

        Ok(self)
    }

    /// Writes the low `bit_length` (`0..=16`) bits of `data` at the cursor.
    pub fn put_short_bits(&mut self, data: i16, bit_length: usize) -> Result<&mut Self> {
        check_numeric_width(bit_length, 16)?;
        if bit_length == 0 {
            return Ok(self);
        }

        let shifted = ((data as u16) << (16 - bit_length)) as i16;
        self.put_bytes(&number::short_to_bytes(shifted), bit_length)
    }

    /// Writes the low `bit_length` (`0..=32`) bits of `data` at the cursor.
    ///
    /// 14 bits of `0x0000099c` write `00100110 011100`.
    pub fn put_int_bits(&mut self, data: i32, bit_length: usize) -> Result<&mut Self> {
        check_numeric_width(bit_length, 32)?;
        if bit_length == 0 {
            return Ok(self);
        }

        let shifted = ((data as u32) << (32 - bit_length)) as i32;
        self.put_bytes(&number::int_to_bytes(shifted), bit_length)
    }

    /// Writes the low `bit_length` (`0..=64`) bits of `data` at the cursor.
    pub fn put_long_bits(&mut self, data: i64, bit_length: usize) -> Result<&mut Self> {
        check_numeric_width(bit_length, 64)?;
        if bit_length == 0 {
            return Ok(self);
        }

        let shifted = ((data as u64) << (64 - bit_length)) as i64;
        self.put_bytes(&number::long_to_bytes(shifted), bit_length)
    }

    /// Copies the whole content up to the capacity, padding bits zeroed.
    ///
    /// A 14-bit buffer filled with ones returns `11111111 11111100`.
    pub fn array(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .storage
            .iter()
            .take(self.capacity_bits.div_ceil(8))
            .copied()
            .collect();

        let tail = self.capacity_bits % 8;
        if tail > 0
            && let Some(last) = bytes.last_mut()
        {
            *last &= left_mask(tail);
        }

        bytes
    }

    /// Copies the content from the start up to the cursor. The unused low
    /// bits of a partially consumed last byte are zeroed.
    pub fn used_array(&self) -> Vec<u8> {
        let end = self.cursor_byte + usize::from(self.cursor_bit > 0);
        let mut bytes: Vec<u8> = self.storage.iter().take(end).copied().collect();

        if self.cursor_bit > 0
            && let Some(last) = bytes.last_mut()
        {
            *last &= left_mask(self.cursor_bit);
        }

        bytes
    }

    fn remaining_from(&self, start_bit: usize) -> usize {
        (self.limit * 8)
            .saturating_sub(start_bit)
            .saturating_sub(self.pad_bits)
    }

    fn ensure_remaining(&self, requested: usize) -> Result<()> {
        check_available(requested, self.remaining_bits())
    }

    fn ensure_remaining_from(&self, start_bit: usize, requested: usize) -> Result<()> {
        check_available(requested, self.remaining_from(start_bit))
    }

    fn advance(&mut self, bit_length: usize) {
        let bits = self.cursor_bit + bit_length;
        self.cursor_byte += bits / 8;
        self.cursor_bit = bits % 8;
    }

    /// Checks that `[start_bit, start_bit + bit_length)` lies below the limit,
    /// which never exceeds the storage length.
    fn ensure_within_limit(&self, start_bit: usize, bit_length: usize) -> Result<()> {
        let available = (self.limit * 8).saturating_sub(start_bit);
        if start_bit.saturating_add(bit_length) > self.limit * 8 {
            return Err(out_of_range(bit_length, available));
        }

        Ok(())
    }

    fn read_run(&self, start_bit: usize, bit_length: usize) -> Result<u8> {
        self.ensure_within_limit(start_bit, bit_length)?;
        let (index, bit) = (start_bit / 8, start_bit % 8);
        let end = bit + bit_length;

        let fragment = if end > 8 {
            let low_len = end - 8;
            Fragment::Straddle {
                high: pick_middle(self.storage[index], bit, 8),
                high_len: 8 - bit,
                low: pick_left(self.storage[index + 1], low_len),
                low_len,
            }
        } else {
            Fragment::Whole {
                bits: pick_middle(self.storage[index], bit, end),
                len: bit_length,
            }
        };

        Ok(fragment.join())
    }

    fn write_run(&mut self, start_bit: usize, data: u8, bit_length: usize) -> Result<()> {
        self.ensure_within_limit(start_bit, bit_length)?;
        let (index, bit) = (start_bit / 8, start_bit % 8);

        match Fragment::split(data, bit, bit_length) {
            Fragment::Whole { bits, len } => {
                self.storage[index] = merge(self.storage[index], bits, bit, len);
            }
            Fragment::Straddle {
                high,
                high_len,
                low,
                low_len,
            } => {
                self.storage[index] = merge(self.storage[index], high, bit, high_len);
                self.storage[index + 1] = merge(self.storage[index + 1], low, 0, low_len);
            }
        }

        Ok(())
    }
}

#[cfg(feature = "serde")]
impl From<&BitBuffer> for crate::serde::BitBufferDef {
    fn from(value: &BitBuffer) -> Self {
        crate::serde::BitBufferDef {
            storage: value.storage.clone(),
            capacity_bits: value.capacity_bits,
            pad_bits: value.pad_bits,
            limit: value.limit,
            position_bits: value.position(),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::BitBufferDef> for BitBuffer {
    type Error = BitBufferError;

    fn try_from(value: crate::serde::BitBufferDef) -> Result<Self> {
        BitBuffer::from_raw_parts(
            value.storage,
            value.capacity_bits,
            value.pad_bits,
            value.limit,
            value.position_bits,
        )
    }
}

fn head_length(bit_length: usize) -> usize {
    match bit_length % 8 {
        0 => 8,
        rem => rem,
    }
}

fn check_source_length(data: &[u8], bit_length: usize) -> Result<()> {
    if bit_length > data.len() * 8 {
        return Err(BitBufferError::InvalidArgument(
            "bit_length must not exceed the bits held by the source bytes",
        ));
    }

    Ok(())
}

fn check_numeric_width(bit_length: usize, width: usize) -> Result<()> {
    if bit_length > width {
        return Err(BitBufferError::InvalidArgument(
            "bit_length must not exceed the width of the numeric value",
        ));
    }

    Ok(())
}

fn check_available(requested: usize, remaining: usize) -> Result<()> {
    if remaining < requested {
        return Err(out_of_range(requested, remaining));
    }

    Ok(())
}

fn out_of_range(requested: usize, remaining: usize) -> BitBufferError {
    debug!(requested, remaining, "bit buffer access out of range");
    BitBufferError::OutOfRange {
        requested,
        remaining,
    }
}
