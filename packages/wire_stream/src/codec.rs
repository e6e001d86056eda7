use crate::{Endian, Result, Stream, StreamError};

/// A value that can be written to a [`Stream`].
///
/// Implementations write their fields one after another using [`Stream::write()`] or
/// lower-level primitives such as [`Stream::write_raw()`]. If an implementation fails halfway,
/// [`Stream::write()`] rewinds the write cursor to where the value started.
///
/// # Examples
///
/// ```
/// use wire_stream::{Decode, Encode, Stream, StreamError};
///
/// #[derive(Debug, PartialEq)]
/// struct Login {
///     user: String,
///     attempt: u8,
/// }
///
/// impl Encode for Login {
///     fn encode(&self, stream: &mut Stream<'_>) -> Result<(), StreamError> {
///         stream.write(&self.user)?;
///         stream.write(&self.attempt)
///     }
/// }
///
/// impl Decode for Login {
///     fn decode(stream: &mut Stream<'_>) -> Result<Self, StreamError> {
///         Ok(Self {
///             user: stream.read()?,
///             attempt: stream.read()?,
///         })
///     }
/// }
///
/// let login = Login {
///     user: "ada".to_string(),
///     attempt: 2,
/// };
///
/// let mut stream = Stream::new();
/// stream.write(&login).unwrap();
///
/// assert_eq!(stream.read::<Login>().unwrap(), login);
/// ```
pub trait Encode {
    /// Writes the value at the write cursor of `stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot take the bytes or the value cannot be represented.
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()>;
}

/// A value that can be read from a [`Stream`].
///
/// If an implementation fails halfway, [`Stream::read()`] rewinds the read cursor to where the
/// value started.
pub trait Decode: Sized {
    /// Reads a value at the read cursor of `stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream does not hold enough bytes or the bytes do not form a valid
    /// value.
    fn decode(stream: &mut Stream<'_>) -> Result<Self>;
}

macro_rules! impl_numeric {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
                    let bytes = match stream.endian() {
                        Endian::Big => self.to_be_bytes(),
                        Endian::Little => self.to_le_bytes(),
                    };

                    stream.write_raw(&bytes)
                }
            }

            impl Decode for $ty {
                fn decode(stream: &mut Stream<'_>) -> Result<Self> {
                    let bytes = stream.read_array::<{ size_of::<$ty>() }>()?;

                    Ok(match stream.endian() {
                        Endian::Big => <$ty>::from_be_bytes(bytes),
                        Endian::Little => <$ty>::from_le_bytes(bytes),
                    })
                }
            }
        )+
    };
}

impl_numeric!(
    u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64
);

// Pointer-sized integers always take 64 bits on the wire so both ends agree on the layout.
impl Encode for usize {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        u64::try_from(*self)
            .map_err(|_| StreamError::LengthOverflow)?
            .encode(stream)
    }
}

impl Decode for usize {
    fn decode(stream: &mut Stream<'_>) -> Result<Self> {
        Self::try_from(u64::decode(stream)?).map_err(|_| StreamError::LengthOverflow)
    }
}

impl Encode for isize {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        i64::try_from(*self)
            .map_err(|_| StreamError::LengthOverflow)?
            .encode(stream)
    }
}

impl Decode for isize {
    fn decode(stream: &mut Stream<'_>) -> Result<Self> {
        Self::try_from(i64::decode(stream)?).map_err(|_| StreamError::LengthOverflow)
    }
}

impl Encode for bool {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        u8::from(*self).encode(stream)
    }
}

impl Decode for bool {
    fn decode(stream: &mut Stream<'_>) -> Result<Self> {
        match u8::decode(stream)? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(StreamError::InvalidBool { value }),
        }
    }
}

impl Encode for char {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        u32::from(*self).encode(stream)
    }
}

impl Decode for char {
    fn decode(stream: &mut Stream<'_>) -> Result<Self> {
        let value = u32::decode(stream)?;
        Self::from_u32(value).ok_or(StreamError::InvalidChar { value })
    }
}

impl Encode for str {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        stream.write_len(self.len())?;
        stream.write_raw(self.as_bytes())
    }
}

impl Encode for String {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        self.as_str().encode(stream)
    }
}

impl Decode for String {
    fn decode(stream: &mut Stream<'_>) -> Result<Self> {
        let len = stream.read_len()?;
        let bytes = stream.read_raw(len)?;

        std::str::from_utf8(bytes)
            .map(ToString::to_string)
            .map_err(StreamError::InvalidUtf8)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        stream.write_len(self.len())?;

        for item in self {
            item.encode(stream)?;
        }

        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        self.as_slice().encode(stream)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(stream: &mut Stream<'_>) -> Result<Self> {
        let count = stream.read_len()?;

        // A corrupt count must not trigger a huge allocation up front.
        let mut items = Self::with_capacity(count.min(stream.readable_size()));

        for _ in 0..count {
            items.push(T::decode(stream)?);
        }

        Ok(items)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        match self {
            Some(value) => {
                true.encode(stream)?;
                value.encode(stream)
            }
            None => false.encode(stream),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(stream: &mut Stream<'_>) -> Result<Self> {
        if bool::decode(stream)? {
            T::decode(stream).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        (**self).encode(stream)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
        (**self).encode(stream)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(stream: &mut Stream<'_>) -> Result<Self> {
        T::decode(stream).map(Box::new)
    }
}

macro_rules! impl_tuple {
    ($($name:ident),+) => {
        impl<$($name: Encode),+> Encode for ($($name,)+) {
            #[expect(non_snake_case, reason = "macro reuses the type parameter names as bindings")]
            fn encode(&self, stream: &mut Stream<'_>) -> Result<()> {
                let ($($name,)+) = self;
                $($name.encode(stream)?;)+
                Ok(())
            }
        }

        impl<$($name: Decode),+> Decode for ($($name,)+) {
            fn decode(stream: &mut Stream<'_>) -> Result<Self> {
                Ok(($($name::decode(stream)?,)+))
            }
        }
    };
}

impl_tuple!(A);
impl_tuple!(A, B);
impl_tuple!(A, B, C);
impl_tuple!(A, B, C, D);

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn stream_with(endian: Endian) -> Stream<'static> {
        Stream::builder().endian(endian).build()
    }

    #[test]
    fn integer_byte_order() {
        let mut big = stream_with(Endian::Big);
        big.write(&1_i32).unwrap();
        assert_eq!(big.written(), [0, 0, 0, 1]);

        let mut little = stream_with(Endian::Little);
        little.write(&1_i32).unwrap();
        assert_eq!(little.written(), [1, 0, 0, 0]);

        let mut big = stream_with(Endian::Big);
        big.write(&0x0102_0304_0506_0708_u64).unwrap();
        assert_eq!(big.written(), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn endian_mismatch_is_visible() {
        let mut stream = stream_with(Endian::Big);
        stream.write(&1_u16).unwrap();

        stream.set_endian(Endian::Little);
        assert_eq!(stream.read::<u16>().unwrap(), 256);
    }

    #[test]
    fn floats() {
        let mut stream = stream_with(Endian::Little);
        stream.write(&1.5_f64).unwrap();
        stream.write(&-0.25_f32).unwrap();

        assert_eq!(stream.written().len(), 12);
        assert!((stream.read::<f64>().unwrap() - 1.5).abs() < f64::EPSILON);
        assert!((stream.read::<f32>().unwrap() + 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn pointer_sized_integers_take_eight_bytes() {
        let mut stream = Stream::new();
        stream.write(&7_usize).unwrap();
        stream.write(&-7_isize).unwrap();

        assert_eq!(stream.written().len(), 16);
        assert_eq!(stream.read::<usize>().unwrap(), 7);
        assert_eq!(stream.read::<isize>().unwrap(), -7);
    }

    #[test]
    fn bool_layout() {
        let mut stream = Stream::new();
        stream.write(&true).unwrap();
        stream.write(&false).unwrap();
        stream.write_raw(&[2]).unwrap();

        assert_eq!(stream.written(), [1, 0, 2]);
        assert!(stream.read::<bool>().unwrap());
        assert!(!stream.read::<bool>().unwrap());
        assert!(matches!(
            stream.read::<bool>(),
            Err(StreamError::InvalidBool { value: 2 })
        ));
        assert_eq!(stream.readable_size(), 1);
    }

    #[test]
    fn char_layout() {
        let mut stream = Stream::new();
        stream.write(&'é').unwrap();
        stream.write(&0xD800_u32).unwrap();

        assert_eq!(stream.read::<char>().unwrap(), 'é');
        assert!(matches!(
            stream.read::<char>(),
            Err(StreamError::InvalidChar { value: 0xD800 })
        ));
    }

    #[test]
    fn string_layout() {
        let mut stream = stream_with(Endian::Big);
        stream.write("hey").unwrap();

        assert_eq!(stream.written(), [0, 0, 0, 3, b'h', b'e', b'y']);
        assert_eq!(stream.read::<String>().unwrap(), "hey");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut stream = Stream::new();
        stream.write_bytes(&[0xC3, 0x28]).unwrap();

        assert!(matches!(
            stream.read::<String>(),
            Err(StreamError::InvalidUtf8(_))
        ));
        assert_eq!(stream.read_pos(), 0);
    }

    #[test]
    fn sequences() {
        let mut stream = Stream::new();
        stream.write(&vec![1_u16, 2, 3]).unwrap();
        stream.write(&[String::from("a"), String::from("bc")][..]).unwrap();

        assert_eq!(stream.read::<Vec<u16>>().unwrap(), [1, 2, 3]);
        assert_eq!(stream.read::<Vec<String>>().unwrap(), ["a", "bc"]);
    }

    #[test]
    fn corrupt_sequence_count_fails_cleanly() {
        let mut stream = Stream::new();
        stream.write(&u32::MAX).unwrap();
        stream.write(&1_u8).unwrap();

        stream.read::<Vec<u8>>().unwrap_err();
        assert_eq!(stream.read_pos(), 0);
    }

    #[test]
    fn options() {
        let mut stream = Stream::new();
        stream.write(&Some(5_u8)).unwrap();
        stream.write(&None::<u8>).unwrap();

        assert_eq!(stream.written(), [1, 5, 0]);
        assert_eq!(stream.read::<Option<u8>>().unwrap(), Some(5));
        assert_eq!(stream.read::<Option<u8>>().unwrap(), None);
    }

    #[test]
    fn tuples() {
        let mut stream = Stream::new();
        stream.write(&(1_u8, String::from("x"), true, -1_i16)).unwrap();

        let (a, b, c, d) = stream.read::<(u8, String, bool, i16)>().unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "x");
        assert!(c);
        assert_eq!(d, -1);
    }

    #[test]
    fn boxed_values() {
        let mut stream = Stream::new();
        stream.write(&Box::new(42_u32)).unwrap();

        assert_eq!(*stream.read::<Box<u32>>().unwrap(), 42);
    }
}
