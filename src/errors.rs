use std::{error::Error, fmt};

#[derive(Debug, Clone)]
/// The codec failure taxonomy.
///
/// Every variant is fatal to the operation that raised it; the codec never
/// retries internally and never returns a partial value.
pub enum BvonError {
    /// Malformed input: an unrecognized tag byte, length-header selector,
    /// key tag, constructor code, or invalid text bytes.
    Format(String),
    /// A value outside what the wire can carry: a length at or above 2^32,
    /// a radix outside 2..=36, or a negative arbitrary-precision integer.
    Range(String),
    /// Division or remainder by zero on the 64-bit integer type.
    Arithmetic(String),
    /// A code point outside the valid Unicode range during UTF-8 encoding.
    Encoding(String),
}

impl Error for BvonError {}

impl fmt::Display for BvonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BvonError::Format(msg) => write!(f, "format error: {}", msg),
            BvonError::Range(msg) => write!(f, "range error: {}", msg),
            BvonError::Arithmetic(msg) => write!(f, "arithmetic error: {}", msg),
            BvonError::Encoding(msg) => write!(f, "encoding error: {}", msg),
        }
    }
}
