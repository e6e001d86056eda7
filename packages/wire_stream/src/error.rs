use std::collections::TryReserveError;
use std::str::Utf8Error;

use thiserror::Error;

/// Errors that can occur when operating on a [`Stream`][crate::Stream].
///
/// Every failing stream operation leaves the stream in the state it was in before the operation
/// started, except that a failed write may have already grown an owned buffer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StreamError {
    /// The requested write cursor lies beyond the end of the buffer.
    #[error("write position {pos} is out of bounds for capacity {capacity}")]
    WritePosOutOfBounds {
        /// The rejected write cursor position.
        pos: usize,

        /// The capacity of the stream at the time of the request.
        capacity: usize,
    },

    /// The requested read cursor lies beyond the write cursor.
    #[error("read position {pos} is out of bounds for write position {write_pos}")]
    ReadPosOutOfBounds {
        /// The rejected read cursor position.
        pos: usize,

        /// The write cursor of the stream at the time of the request.
        write_pos: usize,
    },

    /// A relative cursor move would leave the valid range of that cursor.
    #[error("cannot move cursor at {from} by {delta}, the limit is {limit}")]
    SkipOutOfBounds {
        /// The cursor position before the move.
        from: usize,

        /// The requested signed offset.
        delta: isize,

        /// The largest position the cursor may take.
        limit: usize,
    },

    /// Fewer bytes are readable than the value being read requires.
    #[error("needed {needed} readable bytes but only {available} are available")]
    InsufficientData {
        /// How many bytes the read required.
        needed: usize,

        /// How many bytes were readable.
        available: usize,
    },

    /// A write does not fit into an attached buffer, which cannot grow.
    #[error("write requires capacity {required} but the attached buffer only has {capacity}")]
    InsufficientCapacity {
        /// The capacity the write required.
        required: usize,

        /// The fixed capacity of the attached buffer.
        capacity: usize,
    },

    /// A capacity change would shrink the buffer.
    #[error("cannot change capacity from {capacity} to smaller value {requested}")]
    ShrinkRejected {
        /// The requested capacity.
        requested: usize,

        /// The current capacity.
        capacity: usize,
    },

    /// The operation requires the stream to own its buffer but the buffer is borrowed.
    #[error("the stream does not own its buffer")]
    NotOwned,

    /// The stream is a read-only view over another stream.
    #[error("the stream is a read-only view and cannot be written to")]
    ReadOnly,

    /// A length or position does not fit into the integer type used to represent it.
    #[error("length does not fit into the wire representation")]
    LengthOverflow,

    /// A string on the wire is not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8(#[source] Utf8Error),

    /// A boolean on the wire is neither 0 nor 1.
    #[error("byte {value} is not a valid bool")]
    InvalidBool {
        /// The byte that was read.
        value: u8,
    },

    /// A character on the wire is not a valid Unicode scalar value.
    #[error("code point {value:#x} is not a valid char")]
    InvalidChar {
        /// The code point that was read.
        value: u32,
    },

    /// Growing an owned buffer failed because memory could not be allocated.
    #[error("failed to allocate stream buffer")]
    AllocationFailed(#[source] TryReserveError),

    /// A string did not name a known byte order.
    #[error("'{value}' is not a known byte order")]
    UnknownEndian {
        /// The rejected string.
        value: String,
    },
}

/// A specialized `Result` type for stream operations, returning the crate's
/// [`StreamError`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, StreamError>;
