use std::str::FromStr;

use derive_more::Display;

use crate::StreamError;

/// The byte order a [`Stream`][crate::Stream] encodes multi-byte values in.
///
/// The byte order is a property of the stream, independent of the byte order of the host. Two
/// streams with the same byte order produce identical bytes on any architecture.
///
/// # Examples
///
/// ```
/// use wire_stream::Endian;
///
/// let endian: Endian = "little".parse().unwrap();
/// assert_eq!(endian, Endian::Little);
/// assert_eq!(endian.to_string(), "LittleEndian");
/// ```
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "there are exactly two byte orders in use, accepting the risk"
)]
pub enum Endian {
    /// Most significant byte first. Also known as network byte order.
    #[display("BigEndian")]
    Big,

    /// Least significant byte first.
    #[display("LittleEndian")]
    Little,
}

/// The byte order new streams use unless configured otherwise.
pub const DEFAULT_ENDIAN: Endian = Endian::Big;

impl Endian {
    /// The byte order of the host.
    pub const NATIVE: Self = if cfg!(target_endian = "big") {
        Self::Big
    } else {
        Self::Little
    };

    /// Returns the other byte order.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Big => Self::Little,
            Self::Little => Self::Big,
        }
    }

    /// Returns whether this is the byte order of the host.
    #[must_use]
    pub const fn is_native(self) -> bool {
        matches!(
            (self, Self::NATIVE),
            (Self::Big, Self::Big) | (Self::Little, Self::Little)
        )
    }
}

impl Default for Endian {
    fn default() -> Self {
        DEFAULT_ENDIAN
    }
}

impl FromStr for Endian {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "big" | "bigendian" | "big_endian" | "network" => Ok(Self::Big),
            "little" | "littleendian" | "little_endian" => Ok(Self::Little),
            "native" => Ok(Self::NATIVE),
            _ => Err(StreamError::UnknownEndian {
                value: s.to_string(),
            }),
        }
    }
}
