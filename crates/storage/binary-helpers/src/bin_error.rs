use std::array::TryFromSliceError;
use thiserror::Error;

/// Errors raised while reading or writing little-endian integers through a byte slice.
#[derive(Error, Debug)]
pub enum BinaryError {
    /// Attempted to read or write a value whose size does not fit inside the addressed slice range.
    #[error(
        "attempt to access {expected} bytes at offset {from_offset}, but the slice does not contain that range"
    )]
    SliceRangeOutOfBounds { expected: usize, from_offset: usize },
    /// A fixed-size slice-to-array conversion failed after bounds were already validated.
    #[error("error converting a validated slice into a fixed-size array")]
    SliceConversion(#[from] TryFromSliceError),
}
