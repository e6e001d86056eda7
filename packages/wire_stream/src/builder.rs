use crate::{DEFAULT_ENDIAN, Endian, Stream};

/// Builder for creating an owned [`Stream`].
///
/// # Examples
///
/// ```
/// use wire_stream::{Endian, Stream};
///
/// let stream = Stream::builder()
///     .capacity(1024)
///     .endian(Endian::Little)
///     .build();
///
/// assert_eq!(stream.capacity(), 1024);
/// assert_eq!(stream.endian(), Endian::Little);
/// ```
#[derive(Debug)]
#[must_use]
pub struct StreamBuilder {
    capacity: usize,
    endian: Endian,
}

impl StreamBuilder {
    pub(crate) fn new() -> Self {
        Self {
            capacity: 0,
            endian: DEFAULT_ENDIAN,
        }
    }

    /// Sets the initial capacity of the stream in bytes. Defaults to 0, in which case nothing is
    /// allocated until the first write.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the byte order of the stream. Defaults to [`DEFAULT_ENDIAN`].
    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Builds the stream with the specified configuration.
    #[must_use]
    pub fn build(self) -> Stream<'static> {
        Stream::owned(self.capacity, self.endian)
    }
}
