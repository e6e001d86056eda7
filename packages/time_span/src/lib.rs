#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A signed time span with microsecond precision.
//!
//! [`TimeSpan`] measures an elapsed interval, which may be negative, unlike
//! [`Duration`][std::time::Duration]. The value is stored as a whole number of microseconds in
//! an `i64`, giving a range of roughly ±292 000 years.
//!
//! # Textual form
//!
//! A time span is displayed as `[-][D ]HH:MM:SS.ssssss`. The day count is present only when the
//! span is at least one day long and the fraction always has six digits. Parsing accepts the same
//! form, with the fraction optional and allowed to have fewer digits.
//!
//! ```
//! use time_span::TimeSpan;
//!
//! let span = TimeSpan::from_days(1, 2, 3, 4, 5, 6);
//! assert_eq!(span.to_string(), "1 02:03:04.005006");
//! assert_eq!(span.total_micros(), 93_784_005_006);
//!
//! let parsed: TimeSpan = "-00:01:30.5".parse().unwrap();
//! assert_eq!(parsed, -TimeSpan::from_seconds(90, 500, 0));
//! assert_eq!(parsed.to_string(), "-00:01:30.500000");
//! ```
//!
//! # Wire form
//!
//! A time span implements [`wire_stream::Encode`] and [`wire_stream::Decode`] as its total
//! microseconds in a signed 64-bit integer.
//!
//! ```
//! use time_span::TimeSpan;
//! use wire_stream::Stream;
//!
//! let mut stream = Stream::new();
//! stream.write(&TimeSpan::from_millis(1, 2)).unwrap();
//! assert_eq!(stream.written(), &[0_u8, 0, 0, 0, 0, 0, 0x03, 0xEA]);
//!
//! assert_eq!(stream.read::<TimeSpan>().unwrap(), TimeSpan::from_micros(1_002));
//! ```

mod emit;
mod error;
mod parse;
mod span;
mod wire;

pub use error::*;
pub use span::*;
