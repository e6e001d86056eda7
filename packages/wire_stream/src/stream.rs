use std::{fmt, mem, ptr};

use tracing::{debug, trace};

use crate::{DEFAULT_ENDIAN, Decode, Encode, Endian, Result, StreamBuilder, StreamError};

/// Where the bytes of a stream live.
enum Storage<'a> {
    /// The stream owns its buffer. The length of the vector is the capacity of the stream; every
    /// byte up to the capacity is initialized.
    Owned(Vec<u8>),

    /// The stream writes into a caller-provided buffer that it never frees or resizes.
    Attached(&'a mut [u8]),

    /// The stream reads from the buffer of another stream.
    View(&'a [u8]),
}

impl Storage<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Self::Owned(vec) => vec.as_slice(),
            Self::Attached(buf) => buf,
            Self::View(buf) => buf,
        }
    }

    fn bytes_mut(&mut self) -> Result<&mut [u8]> {
        match self {
            Self::Owned(vec) => Ok(vec.as_mut_slice()),
            Self::Attached(buf) => Ok(&mut **buf),
            Self::View(_) => Err(StreamError::ReadOnly),
        }
    }

    fn is_attached(&self) -> bool {
        !matches!(self, Self::Owned(_))
    }
}

impl Default for Storage<'_> {
    fn default() -> Self {
        Self::Owned(Vec::new())
    }
}

/// A byte buffer with independent read and write cursors that encodes and decodes values in a
/// configurable byte order.
///
/// The bytes between the read cursor and the write cursor are the readable data. The bytes
/// between the write cursor and the capacity are writable space. At all times
/// `read_pos() <= write_pos() <= capacity()`.
///
/// A stream either owns its buffer, in which case writes grow it as needed, or is attached to
/// memory it borrows, in which case it never frees or resizes that memory:
///
/// * [`Stream::attached()`] and [`Stream::attach()`] borrow a mutable byte slice.
/// * [`Stream::view_of()`] and [`Stream::attach_stream()`] borrow the buffer of another stream
///   for reading only.
///
/// The lifetime parameter ties an attached stream to the memory it borrows. Owned streams can be
/// `Stream<'static>`.
///
/// Every fallible operation either completes fully or leaves the cursors where they were.
///
/// # Examples
///
/// ```
/// use wire_stream::Stream;
///
/// let mut stream = Stream::new();
/// stream.write(&3_i32).unwrap();
/// stream.write("hello").unwrap();
///
/// assert_eq!(stream.read::<i32>().unwrap(), 3);
/// assert_eq!(stream.read::<String>().unwrap(), "hello");
/// assert_eq!(stream.readable_size(), 0);
/// ```
///
/// Encoding into memory owned by someone else:
///
/// ```
/// use wire_stream::{Endian, Stream};
///
/// let mut packet = [0_u8; 4];
///
/// let mut stream = Stream::attached(&mut packet);
/// stream.set_endian(Endian::Little);
/// stream.set_write_pos(0).unwrap();
/// stream.write(&1_u32).unwrap();
///
/// // The stream cannot grow borrowed memory.
/// assert!(stream.write(&1_u8).is_err());
///
/// drop(stream);
/// assert_eq!(packet, [1, 0, 0, 0]);
/// ```
pub struct Stream<'a> {
    storage: Storage<'a>,
    read_pos: usize,
    write_pos: usize,
    endian: Endian,
}

impl<'a> Stream<'a> {
    /// Creates an empty owned stream with capacity 0 and the default byte order.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Storage::default(), 0, 0, DEFAULT_ENDIAN)
    }

    /// Creates an owned stream with `capacity` zeroed bytes of writable space.
    ///
    /// # Examples
    ///
    /// ```
    /// use wire_stream::Stream;
    ///
    /// let stream = Stream::with_capacity(16);
    /// assert_eq!(stream.capacity(), 16);
    /// assert_eq!(stream.writable_size(), 16);
    /// assert_eq!(stream.readable_size(), 0);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::builder().capacity(capacity).build()
    }

    /// Returns a builder for creating a [`Stream`] with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use wire_stream::{Endian, Stream};
    ///
    /// let stream = Stream::builder()
    ///     .capacity(64)
    ///     .endian(Endian::Little)
    ///     .build();
    ///
    /// assert_eq!(stream.endian(), Endian::Little);
    /// ```
    pub fn builder() -> StreamBuilder {
        StreamBuilder::new()
    }

    pub(crate) fn owned(capacity: usize, endian: Endian) -> Self {
        Self::from_parts(Storage::Owned(vec![0; capacity]), 0, 0, endian)
    }

    fn from_parts(storage: Storage<'a>, read_pos: usize, write_pos: usize, endian: Endian) -> Self {
        Self {
            storage,
            read_pos,
            write_pos,
            endian,
        }
    }

    /// Creates a stream attached to `buf`.
    ///
    /// The whole buffer is presented as already written: the read cursor is 0 and the write
    /// cursor and capacity are the length of the buffer. Writes go into `buf` and fail once the
    /// buffer is full.
    ///
    /// # Examples
    ///
    /// ```
    /// use wire_stream::Stream;
    ///
    /// let mut buf = [0_u8, 0, 0, 7];
    /// let mut stream = Stream::attached(&mut buf);
    ///
    /// assert!(stream.is_attached());
    /// assert_eq!(stream.write_pos(), 4);
    /// assert_eq!(stream.read::<u32>().unwrap(), 7);
    /// ```
    #[must_use]
    pub fn attached(buf: &'a mut [u8]) -> Self {
        let len = buf.len();
        Self::from_parts(Storage::Attached(buf), 0, len, DEFAULT_ENDIAN)
    }

    /// Creates an owned stream holding a copy of `bytes`.
    ///
    /// The cursors are placed as for [`attached()`][Self::attached]: the read cursor is 0 and the
    /// write cursor and capacity are the length of `bytes`.
    #[must_use]
    pub fn copied_from(bytes: &[u8]) -> Self {
        Self::from_parts(Storage::Owned(bytes.to_vec()), 0, bytes.len(), DEFAULT_ENDIAN)
    }

    /// Creates a read-only stream over the buffer of `source`.
    ///
    /// The new stream has the same capacity, cursors and byte order as `source` but moves its
    /// cursors independently. Use [`Clone`] to get an owned copy instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use wire_stream::Stream;
    ///
    /// let mut source = Stream::new();
    /// source.write(&10_u16).unwrap();
    /// source.write(&20_u16).unwrap();
    ///
    /// let mut view = Stream::view_of(&source);
    /// assert_eq!(view.read::<u16>().unwrap(), 10);
    /// assert_eq!(view.read::<u16>().unwrap(), 20);
    ///
    /// // The source's own cursors did not move.
    /// assert_eq!(source.readable_size(), 4);
    /// ```
    #[must_use]
    pub fn view_of(source: &'a Stream<'_>) -> Self {
        Self::from_parts(
            Storage::View(source.as_bytes()),
            source.read_pos,
            source.write_pos,
            source.endian,
        )
    }

    /// Attaches the stream to `buf`, releasing any buffer it owned before.
    ///
    /// The read cursor becomes 0 and the write cursor and capacity become the length of `buf`.
    /// The byte order is unchanged.
    pub fn attach(&mut self, buf: &'a mut [u8]) {
        self.write_pos = buf.len();
        self.read_pos = 0;
        self.storage = Storage::Attached(buf);
    }

    /// Attaches the stream to the buffer of `source` for reading, releasing any buffer it owned
    /// before.
    ///
    /// The read cursor becomes 0. The capacity, write cursor and byte order are taken from
    /// `source`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wire_stream::Stream;
    ///
    /// let mut source = Stream::new();
    /// source.write("payload").unwrap();
    /// source.skip_read(2).unwrap();
    ///
    /// let mut stream = Stream::new();
    /// stream.attach_stream(&source);
    ///
    /// assert_eq!(stream.read_pos(), 0);
    /// assert_eq!(stream.write_pos(), source.write_pos());
    /// assert_eq!(stream.read::<String>().unwrap(), "payload");
    /// ```
    pub fn attach_stream(&mut self, source: &'a Stream<'_>) {
        self.storage = Storage::View(source.as_bytes());
        self.read_pos = 0;
        self.write_pos = source.write_pos;
        self.endian = source.endian;
    }

    /// Takes the owned buffer out of the stream, leaving the stream empty with capacity 0.
    ///
    /// The returned vector holds the whole buffer, so its length equals the capacity the stream
    /// had. The byte order of the stream is kept.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::NotOwned`] if the stream is attached. The stream is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use wire_stream::Stream;
    ///
    /// let mut stream = Stream::new();
    /// stream.write(&0xABCD_u16).unwrap();
    ///
    /// let buf = stream.detach().unwrap();
    /// assert_eq!(buf[..2], [0xAB, 0xCD]);
    /// assert_eq!(stream.capacity(), 0);
    /// ```
    pub fn detach(&mut self) -> Result<Vec<u8>> {
        let capacity = self.capacity();

        let Storage::Owned(vec) = &mut self.storage else {
            debug!(
                capacity,
                "refusing to detach a buffer the stream does not own"
            );
            return Err(StreamError::NotOwned);
        };

        let buf = mem::take(vec);
        self.read_pos = 0;
        self.write_pos = 0;

        Ok(buf)
    }

    /// Changes the capacity of an owned stream to `capacity`, keeping the existing bytes. New
    /// bytes are zeroed.
    ///
    /// # Errors
    ///
    /// * [`StreamError::ShrinkRejected`] if `capacity` is smaller than the current capacity.
    /// * [`StreamError::NotOwned`] if the stream is attached.
    /// * [`StreamError::AllocationFailed`] if the memory could not be allocated.
    ///
    /// On error, the stream is left unchanged.
    pub fn recap(&mut self, capacity: usize) -> Result<()> {
        let Storage::Owned(vec) = &mut self.storage else {
            return Err(StreamError::NotOwned);
        };

        let current = vec.len();

        let Some(additional) = capacity.checked_sub(current) else {
            return Err(StreamError::ShrinkRejected {
                requested: capacity,
                capacity: current,
            });
        };

        if additional == 0 {
            return Ok(());
        }

        vec.try_reserve_exact(additional)
            .map_err(StreamError::AllocationFailed)?;
        vec.resize(capacity, 0);

        trace!(from = current, to = capacity, "stream capacity changed");

        Ok(())
    }

    /// Moves the write cursor to `pos`. If the read cursor was beyond `pos`, it is moved back to
    /// `pos` as well.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::WritePosOutOfBounds`] if `pos` is greater than the capacity.
    pub fn set_write_pos(&mut self, pos: usize) -> Result<()> {
        let capacity = self.capacity();

        if pos > capacity {
            return Err(StreamError::WritePosOutOfBounds { pos, capacity });
        }

        self.write_pos = pos;
        self.read_pos = self.read_pos.min(pos);

        Ok(())
    }

    /// Moves the read cursor to `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::ReadPosOutOfBounds`] if `pos` is greater than the write cursor.
    pub fn set_read_pos(&mut self, pos: usize) -> Result<()> {
        if pos > self.write_pos {
            return Err(StreamError::ReadPosOutOfBounds {
                pos,
                write_pos: self.write_pos,
            });
        }

        self.read_pos = pos;

        Ok(())
    }

    /// Moves the write cursor by `delta` bytes, with the same rules as
    /// [`set_write_pos()`][Self::set_write_pos].
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::SkipOutOfBounds`] if the cursor would leave `[0, capacity]`.
    pub fn skip_write(&mut self, delta: isize) -> Result<()> {
        let from = self.write_pos;
        let limit = self.capacity();

        let target = from
            .checked_add_signed(delta)
            .filter(|target| *target <= limit)
            .ok_or(StreamError::SkipOutOfBounds { from, delta, limit })?;

        self.set_write_pos(target)
    }

    /// Moves the read cursor by `delta` bytes, with the same rules as
    /// [`set_read_pos()`][Self::set_read_pos].
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::SkipOutOfBounds`] if the cursor would leave `[0, write_pos]`.
    pub fn skip_read(&mut self, delta: isize) -> Result<()> {
        let from = self.read_pos;
        let limit = self.write_pos;

        let target = from
            .checked_add_signed(delta)
            .filter(|target| *target <= limit)
            .ok_or(StreamError::SkipOutOfBounds { from, delta, limit })?;

        self.set_read_pos(target)
    }

    /// Ensures that `additional` bytes can be written at the write cursor, growing an owned
    /// buffer to at least twice its capacity if it has to grow at all.
    #[cfg_attr(test, mutants::skip)] // Can be mutated to infinitely growing memory use.
    fn reserve_write(&mut self, additional: usize) -> Result<()> {
        let capacity = self.capacity();

        let required = self
            .write_pos
            .checked_add(additional)
            .ok_or(StreamError::LengthOverflow)?;

        match self.storage {
            Storage::View(_) => Err(StreamError::ReadOnly),
            _ if required <= capacity => Ok(()),
            Storage::Attached(_) => Err(StreamError::InsufficientCapacity { required, capacity }),
            Storage::Owned(_) => self.recap(required.max(capacity.saturating_mul(2))),
        }
    }

    /// Appends `bytes` at the write cursor as-is, without a length prefix.
    ///
    /// # Errors
    ///
    /// Fails if the bytes do not fit into an attached buffer, if the stream is a read-only view
    /// or if an owned buffer cannot grow. The stream is left unchanged.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve_write(bytes.len())?;

        let start = self.write_pos;
        let end = start
            .checked_add(bytes.len())
            .expect("reserve_write() verified that the end position does not overflow");

        self.storage
            .bytes_mut()?
            .get_mut(start..end)
            .expect("reserve_write() guarantees room for the bytes")
            .copy_from_slice(bytes);

        self.write_pos = end;

        Ok(())
    }

    /// Writes `bytes` with a `u32` length prefix.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`write_raw()`][Self::write_raw], or with
    /// [`StreamError::LengthOverflow`] if the length does not fit into a `u32`. On error, the
    /// write cursor is left where it was.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.atomic_write(|stream| {
            stream.write_len(bytes.len())?;
            stream.write_raw(bytes)
        })
    }

    /// Encodes `value` at the write cursor in the byte order of the stream.
    ///
    /// # Errors
    ///
    /// Fails if the value does not fit into an attached buffer, if the stream is a read-only view
    /// or if the value cannot be encoded. On error, the write cursor is left where it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use wire_stream::{Endian, Stream};
    ///
    /// let mut stream = Stream::builder().endian(Endian::Big).build();
    /// stream.write(&1_u32).unwrap();
    ///
    /// assert_eq!(stream.written(), [0, 0, 0, 1]);
    /// ```
    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.atomic_write(|stream| value.encode(stream))
    }

    /// Writes a length as the `u32` prefix used by strings, byte slices and sequences.
    pub(crate) fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| StreamError::LengthOverflow)?;
        len.encode(self)
    }

    fn atomic_write(&mut self, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        let start = self.write_pos;

        f(self).inspect_err(|_| {
            self.write_pos = start;
        })
    }

    /// Consumes exactly `N` bytes at the read cursor.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InsufficientData`] if fewer than `N` bytes are readable. The read
    /// cursor is left unchanged.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0; N];
        array.copy_from_slice(self.read_raw(N)?);
        Ok(array)
    }

    /// Consumes `len` bytes at the read cursor and returns them.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InsufficientData`] if fewer than `len` bytes are readable. The read
    /// cursor is left unchanged.
    pub fn read_raw(&mut self, len: usize) -> Result<&[u8]> {
        let available = self.readable_size();

        if len > available {
            return Err(StreamError::InsufficientData {
                needed: len,
                available,
            });
        }

        let start = self.read_pos;
        let end = start
            .checked_add(len)
            .expect("a range within the readable bytes cannot overflow");
        self.read_pos = end;

        Ok(self
            .storage
            .bytes()
            .get(start..end)
            .expect("the readable bytes lie within the buffer"))
    }

    /// Reads bytes written by [`write_bytes()`][Self::write_bytes].
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InsufficientData`] if the prefix or the bytes are not fully
    /// readable. On error, the read cursor is left where it was.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        self.atomic_read(|stream| {
            let len = stream.read_len()?;
            Ok(stream.read_raw(len)?.to_vec())
        })
    }

    /// Decodes a value of type `T` at the read cursor in the byte order of the stream.
    ///
    /// # Errors
    ///
    /// Fails if not enough bytes are readable or the bytes are not a valid `T`. On error, the
    /// read cursor is left where it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use wire_stream::Stream;
    ///
    /// let mut stream = Stream::new();
    /// stream.write(&7_u8).unwrap();
    ///
    /// assert_eq!(stream.read::<u8>().unwrap(), 7);
    ///
    /// // Nothing left to read; the cursor stays put.
    /// assert!(stream.read::<u8>().is_err());
    /// assert_eq!(stream.read_pos(), 1);
    /// ```
    pub fn read<T: Decode>(&mut self) -> Result<T> {
        self.atomic_read(T::decode)
    }

    /// Decodes a value into `dest`. On error, `dest` and the read cursor are left unchanged.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`read()`][Self::read].
    pub fn read_into<T: Decode>(&mut self, dest: &mut T) -> Result<()> {
        *dest = self.read()?;
        Ok(())
    }

    /// Decodes a value without consuming it.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`read()`][Self::read].
    pub fn peek<T: Decode>(&mut self) -> Result<T> {
        let start = self.read_pos;
        let value = self.read();
        self.read_pos = start;
        value
    }

    /// Reads a length prefix written by [`write_len()`][Self::write_len].
    pub(crate) fn read_len(&mut self) -> Result<usize> {
        let len = u32::decode(self)?;
        usize::try_from(len).map_err(|_| StreamError::LengthOverflow)
    }

    fn atomic_read<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.read_pos;

        f(self).inspect_err(|_| {
            self.read_pos = start;
        })
    }

    /// The number of bytes between the read cursor and the write cursor.
    #[must_use]
    pub fn readable_size(&self) -> usize {
        self.write_pos
            .checked_sub(self.read_pos)
            .expect("the read cursor never passes the write cursor")
    }

    /// The number of bytes between the write cursor and the end of the buffer.
    #[must_use]
    pub fn writable_size(&self) -> usize {
        self.capacity()
            .checked_sub(self.write_pos)
            .expect("the write cursor never passes the capacity")
    }

    /// The size of the buffer in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.bytes().len()
    }

    /// The position of the read cursor.
    #[must_use]
    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    /// The position of the write cursor.
    #[must_use]
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// The byte order values are encoded and decoded in.
    #[must_use]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Changes the byte order used by subsequent reads and writes. Existing bytes are untouched.
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Whether the stream borrows its buffer instead of owning it.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.storage.is_attached()
    }

    /// A pointer to the start of the buffer, or null if the capacity is 0.
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        let bytes = self.storage.bytes();

        if bytes.is_empty() {
            ptr::null()
        } else {
            bytes.as_ptr()
        }
    }

    /// The whole buffer, up to the capacity.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.bytes()
    }

    /// The bytes between the read cursor and the write cursor.
    #[must_use]
    pub fn readable(&self) -> &[u8] {
        self.storage
            .bytes()
            .get(self.read_pos..self.write_pos)
            .expect("cursors always lie within the buffer")
    }

    /// The bytes between the start of the buffer and the write cursor.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        self.storage
            .bytes()
            .get(..self.write_pos)
            .expect("the write cursor always lies within the buffer")
    }

    /// Moves both cursors to the start of the buffer. The buffer itself is kept.
    pub fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
    }

    /// Exchanges the complete state of two streams without copying any bytes.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves the complete state out of the stream, leaving an empty owned stream with the default
    /// byte order behind.
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }
}

impl Default for Stream<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Stream<'_> {
    /// Creates an owned copy of the written bytes. The copy has a capacity equal to the write
    /// cursor of the original and the same cursors and byte order.
    fn clone(&self) -> Self {
        Self::from_parts(
            Storage::Owned(self.written().to_vec()),
            self.read_pos,
            self.write_pos,
            self.endian,
        )
    }
}

impl fmt::Display for Stream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stream[buf:{:p}, cap:{}, rpos:{}, wpos:{}, endian:{}, attach:{}]",
            self.as_ptr(),
            self.capacity(),
            self.read_pos,
            self.write_pos,
            self.endian,
            self.is_attached()
        )
    }
}

impl fmt::Debug for Stream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.storage {
            Storage::Owned(_) => "owned",
            Storage::Attached(_) => "attached",
            Storage::View(_) => "view",
        };

        f.debug_struct("Stream")
            .field("mode", &mode)
            .field("capacity", &self.capacity())
            .field("read_pos", &self.read_pos)
            .field("write_pos", &self.write_pos)
            .field("endian", &self.endian)
            .finish()
    }
}
