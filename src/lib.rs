//! # bitbuffer
//!
//! A fixed-capacity buffer for reading and writing values whose widths are not
//! a multiple of 8 bits, as found in packed records and compact wire formats.
//!
//! Write fields in order with the `put_*` methods, [flip](BitBuffer::flip) the
//! buffer, then read them back in the same order with the `get_*` methods. The
//! `*_at` variants address bits from the start of the buffer without touching
//! the cursor, for patching or peeking at fixed positions.
//!
//! ## Example
//!
//! ```
//! use bitbuffer::BitBuffer;
//!
//! let mut buffer = BitBuffer::allocate(12).unwrap();
//! buffer.put_bits(0b1101, 4).unwrap().put_bits(0b0101_1001, 8).unwrap();
//! buffer.flip();
//!
//! assert_eq!(buffer.get_bits(4).unwrap(), 0b1101);
//! assert_eq!(buffer.get_byte().unwrap(), 0b0101_1001);
//! assert_eq!(buffer.remaining_bits(), 0);
//! ```
//!
//! The [number] and [text] modules convert integers to big-endian bytes and
//! bytes to `"01010101 "` text, which is handy when building fixtures.

pub mod buffer;
pub mod errors;
pub mod fragment;
pub mod number;
pub mod picker;
#[cfg(feature = "serde")]
pub mod serde;
pub mod text;

pub use buffer::BitBuffer;
pub use errors::{BitBufferError, Result};
pub use fragment::Fragment;
