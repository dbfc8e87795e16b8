//! A run of at most 8 bits positioned against a byte boundary.

use crate::picker::pick_right;

/// A bit run of `1..=8` bits, either contained in one byte or split across two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    /// The run fits in the current byte.
    Whole { bits: u8, len: usize },
    /// The run crosses into the next byte: `high` closes the current byte and
    /// `low` opens the next one.
    Straddle {
        high: u8,
        high_len: usize,
        low: u8,
        low_len: usize,
    },
}

impl Fragment {
    /// Lays out the low `bit_length` bits of `data` for a write starting at
    /// `bit_in_byte` within a byte.
    pub fn split(data: u8, bit_in_byte: usize, bit_length: usize) -> Self {
        debug_assert!(bit_in_byte < 8 && bit_length <= 8);

        let value = pick_right(data, bit_length);
        let end = bit_in_byte + bit_length;

        if end > 8 {
            let low_len = end - 8;
            Fragment::Straddle {
                high: value >> low_len,
                high_len: bit_length - low_len,
                low: pick_right(value, low_len),
                low_len,
            }
        } else {
            Fragment::Whole {
                bits: value,
                len: bit_length,
            }
        }
    }

    /// Concatenates the fragment back into one right-justified value.
    pub fn join(self) -> u8 {
        match self {
            Fragment::Whole { bits, .. } => bits,
            Fragment::Straddle {
                high, low, low_len, ..
            } => (((high as u32) << low_len) | low as u32) as u8,
        }
    }

    /// Total number of bits in the run.
    pub fn len(&self) -> usize {
        match self {
            Fragment::Whole { len, .. } => *len,
            Fragment::Straddle {
                high_len, low_len, ..
            } => high_len + low_len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
