//! Human-readable binary rendering of bytes, mainly for tests and debugging.
//!
//! Each byte renders as eight `0`/`1` digits followed by one space, so
//! `[210]` becomes `"11010010 "`.

use crate::{errors::TextError, number};

pub fn bytes_to_text(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:08b} ")).collect()
}

pub fn short_to_text(value: i16) -> String {
    bytes_to_text(&number::short_to_bytes(value))
}

pub fn int_to_text(value: i32) -> String {
    bytes_to_text(&number::int_to_bytes(value))
}

pub fn long_to_text(value: i64) -> String {
    bytes_to_text(&number::long_to_bytes(value))
}

/// Parses binary text back into bytes. Spaces are ignored.
///
/// When the digit count is not a multiple of 8, the first byte takes the
/// leading `count % 8` digits as given, so `"1000"` parses to `[8]` and
/// `"1000000 10000000"` to `[64, 128]`.
pub fn text_to_bytes(text: &str) -> Result<Vec<u8>, TextError> {
    let mut digits = Vec::with_capacity(text.len());
    for (index, found) in text.char_indices() {
        match found {
            ' ' => {}
            '0' => digits.push(0u8),
            '1' => digits.push(1u8),
            _ => return Err(TextError::InvalidDigit { index, found }),
        }
    }

    if digits.is_empty() {
        return Ok(Vec::new());
    }

    let first_len = match digits.len() % 8 {
        0 => 8,
        rem => rem,
    };

    let (first, rest) = digits.split_at(first_len);
    let mut bytes = Vec::with_capacity(1 + rest.len() / 8);
    bytes.push(fold_digits(first));
    bytes.extend(rest.chunks(8).map(fold_digits));

    Ok(bytes)
}

fn fold_digits(digits: &[u8]) -> u8 {
    digits.iter().fold(0, |acc, digit| (acc << 1) | digit)
}
