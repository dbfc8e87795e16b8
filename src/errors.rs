//! Error types for bit buffer access and binary text parsing.

use thiserror::Error;

/// Errors produced by [crate::BitBuffer] and the [crate::picker] helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitBufferError {
    /// The call itself is malformed: a single-byte run longer than 8 bits, a
    /// run longer than its source, an empty `wrap` input or a zero `allocate`.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Fewer bits remain than the operation needs.
    #[error("requested {requested} bits but only {remaining} remain")]
    OutOfRange { requested: usize, remaining: usize },
}

/// Errors produced when parsing binary text with [crate::text::text_to_bytes].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// A character other than `0`, `1` or space.
    #[error("invalid binary digit {found:?} at index {index}")]
    InvalidDigit { index: usize, found: char },
}

pub type Result<T> = std::result::Result<T, BitBufferError>;
