#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A binary serialization stream with explicit byte order.
//!
//! [`Stream`] is a byte buffer with a read cursor and a write cursor. Values are appended at the
//! write cursor and consumed at the read cursor, encoded in the byte order configured on the
//! stream rather than the byte order of the host, so two streams with the same [`Endian`] are
//! byte-for-byte interchangeable across architectures.
//!
//! A stream either owns its buffer and grows it on demand, or borrows memory owned by someone
//! else (a byte slice or the buffer of another stream), in which case the borrow checker
//! guarantees the stream never outlives that memory.
//!
//! # Wire layout
//!
//! * Integers and floating-point numbers take their natural width in the byte order of the
//!   stream. `usize` and `isize` always take 64 bits.
//! * `bool` is one byte, `0` or `1`. `char` is its code point as a `u32`.
//! * Strings and byte slices are a `u32` length followed by the raw bytes, with no terminator.
//! * `Vec<T>` and `[T]` are a `u32` element count followed by the elements.
//! * `Option<T>` is a `bool` tag followed by the value if present.
//! * Tuples and user types are their fields in order, see [`Encode`] and [`Decode`].
//!
//! # Example
//!
//! ```
//! use wire_stream::{Endian, Stream};
//!
//! let mut stream = Stream::new();
//! assert_eq!(stream.endian(), Endian::Big);
//!
//! stream.write(&3_i32).unwrap();
//! stream.write("hello").unwrap();
//! assert_eq!(stream.written(), b"\0\0\0\x03\0\0\0\x05hello");
//!
//! assert_eq!(stream.read::<i32>().unwrap(), 3);
//! assert_eq!(stream.read::<String>().unwrap(), "hello");
//! ```
//!
//! Failed reads leave the stream where it was:
//!
//! ```
//! use wire_stream::{Stream, StreamError};
//!
//! let mut stream = Stream::new();
//! stream.write(&1_u16).unwrap();
//!
//! let error = stream.read::<u32>().unwrap_err();
//! assert!(matches!(error, StreamError::InsufficientData { needed: 4, available: 2 }));
//! assert_eq!(stream.read::<u16>().unwrap(), 1);
//! ```

mod builder;
mod codec;
mod endian;
mod error;
mod stream;

pub use builder::*;
pub use codec::*;
pub use endian::*;
pub use error::*;
pub use stream::*;
