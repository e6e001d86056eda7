//! Integration tests for `wire_stream` exercising the public API only.

use std::ptr;

use wire_stream::{DEFAULT_ENDIAN, Decode, Encode, Endian, Stream, StreamError};

#[derive(Debug, Default, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

impl Encode for Position {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<(), StreamError> {
        stream.write(&self.x)?;
        stream.write(&self.y)
    }
}

impl Decode for Position {
    fn decode(stream: &mut Stream<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            x: stream.read()?,
            y: stream.read()?,
        })
    }
}

#[derive(Debug, Default, PartialEq)]
struct PlayerState {
    id: u64,
    name: String,
    position: Position,
    inventory: Vec<u32>,
    guild: Option<String>,
}

impl Encode for PlayerState {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<(), StreamError> {
        stream.write(&self.id)?;
        stream.write(&self.name)?;
        stream.write(&self.position)?;
        stream.write(&self.inventory)?;
        stream.write(&self.guild)
    }
}

impl Decode for PlayerState {
    fn decode(stream: &mut Stream<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            id: stream.read()?,
            name: stream.read()?,
            position: stream.read()?,
            inventory: stream.read()?,
            guild: stream.read()?,
        })
    }
}

fn sample_player() -> PlayerState {
    PlayerState {
        id: 77,
        name: "Ishtar".to_string(),
        position: Position { x: 1.5, y: -2.0 },
        inventory: vec![10, 20, 30],
        guild: Some("Night Owls".to_string()),
    }
}

#[test]
fn set_write_pos_bounds() {
    let mut stream = Stream::with_capacity(12);

    for pos in 0..=12 {
        stream.set_write_pos(pos).unwrap();
        assert_eq!(stream.write_pos(), pos);
    }

    assert!(matches!(
        stream.set_write_pos(13),
        Err(StreamError::WritePosOutOfBounds {
            pos: 13,
            capacity: 12
        })
    ));
    assert_eq!(stream.write_pos(), 12);
}

#[test]
fn set_read_pos_bounds_and_readable_size() {
    let mut stream = Stream::with_capacity(12);
    stream.set_write_pos(9).unwrap();

    stream.set_read_pos(4).unwrap();
    assert_eq!(stream.readable_size(), 5);
    assert_eq!(stream.writable_size(), 3);

    stream.set_read_pos(10).unwrap_err();
    assert_eq!(stream.read_pos(), 4);
}

#[test]
fn recap_only_grows() {
    let mut stream = Stream::with_capacity(8);
    stream.write(&0x1122_3344_u32).unwrap();

    stream.recap(8).unwrap();
    assert_eq!(stream.capacity(), 8);

    stream.recap(64).unwrap();
    assert_eq!(stream.capacity(), 64);
    assert_eq!(stream.written(), [0x11, 0x22, 0x33, 0x44]);

    assert!(matches!(
        stream.recap(63),
        Err(StreamError::ShrinkRejected {
            requested: 63,
            capacity: 64
        })
    ));
    assert_eq!(stream.capacity(), 64);
}

#[test]
fn recap_on_attached_fails() {
    let mut buf = [0_u8; 4];
    let mut stream = Stream::attached(&mut buf);

    assert!(matches!(stream.recap(16), Err(StreamError::NotOwned)));
    assert_eq!(stream.capacity(), 4);
}

#[test]
fn round_trip_int_and_string() {
    let mut stream = Stream::new();
    stream.write(&3_i32).unwrap();
    stream.write("hello").unwrap();

    let start = stream.read_pos();
    assert_eq!(start, 0);

    assert_eq!(stream.read::<i32>().unwrap(), 3);
    assert_eq!(stream.read::<String>().unwrap(), "hello");
}

#[test]
fn attach_aliases_buffer() {
    let mut buf = [0_u8; 32];
    let address = buf.as_ptr();

    let mut stream = Stream::new();
    stream.attach(&mut buf);

    assert!(ptr::eq(stream.as_ptr(), address));
    assert_eq!(stream.capacity(), 32);
    assert_eq!(stream.read_pos(), 0);
    assert_eq!(stream.write_pos(), 32);
    assert_eq!(stream.writable_size(), 0);
    assert!(stream.is_attached());
}

#[test]
fn attached_writes_land_in_caller_memory() {
    let mut buf = [0xFF_u8; 6];

    {
        let mut stream = Stream::attached(&mut buf);
        stream.clear();
        stream.write(&0x0102_u16).unwrap();
        stream.write(&true).unwrap();
    }

    assert_eq!(buf, [1, 2, 1, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn detach_then_drop() {
    let mut stream = Stream::new();
    stream.write(&42_u32).unwrap();
    stream.write("tail").unwrap();
    let capacity = stream.capacity();

    let buf = stream.detach().unwrap();

    assert_eq!(stream.capacity(), 0);
    assert!(stream.as_ptr().is_null());
    assert_eq!(stream.read_pos(), 0);
    assert_eq!(stream.write_pos(), 0);

    assert_eq!(buf.len(), capacity);
    assert_eq!(buf.get(..4), Some(&[0, 0, 0, 42][..]));

    drop(stream);
    assert_eq!(buf.get(8..12), Some(&b"tail"[..]));
}

#[test]
fn detach_keeps_endian() {
    let mut stream = Stream::builder().endian(DEFAULT_ENDIAN.flipped()).build();
    stream.write(&1_u8).unwrap();

    let _buf = stream.detach().unwrap();

    assert_ne!(stream.endian(), DEFAULT_ENDIAN);
}

#[test]
fn detach_attached_is_refused() {
    let mut buf = [1_u8, 2, 3];
    let mut stream = Stream::attached(&mut buf);
    stream.skip_read(1).unwrap();

    assert!(matches!(stream.detach(), Err(StreamError::NotOwned)));

    assert_eq!(stream.capacity(), 3);
    assert_eq!(stream.read_pos(), 1);
    assert_eq!(stream.write_pos(), 3);
}

#[test]
fn swap_exchanges_everything() {
    let mut first = Stream::builder().endian(Endian::Big).build();
    first.write("Hello World").unwrap();
    first.write(&false).unwrap();
    let first_read = first.write_pos() / 2;
    first.set_read_pos(first_read).unwrap();

    let mut second = Stream::builder().endian(Endian::Little).build();
    second.write(&3_i32).unwrap();
    second.write(&4.5_f64).unwrap();
    second.write(&true).unwrap();
    second.write("Hey, Judy").unwrap();
    let second_read = second.write_pos() / 2;
    second.set_read_pos(second_read).unwrap();

    let (first_buf, first_cap, first_write) =
        (first.as_ptr(), first.capacity(), first.write_pos());
    let (second_buf, second_cap, second_write) =
        (second.as_ptr(), second.capacity(), second.write_pos());

    first.swap(&mut second);

    assert_eq!(first.as_ptr(), second_buf);
    assert_eq!(first.capacity(), second_cap);
    assert_eq!(first.endian(), Endian::Little);
    assert_eq!(first.read_pos(), second_read);
    assert_eq!(first.write_pos(), second_write);

    assert_eq!(second.as_ptr(), first_buf);
    assert_eq!(second.capacity(), first_cap);
    assert_eq!(second.endian(), Endian::Big);
    assert_eq!(second.read_pos(), first_read);
    assert_eq!(second.write_pos(), first_write);
}

#[test]
fn swap_exchanges_ownership_mode() {
    let mut buf = [0_u8; 4];
    let mut attached = Stream::attached(&mut buf);
    let mut owned = Stream::with_capacity(16);

    attached.swap(&mut owned);

    assert!(!attached.is_attached());
    assert_eq!(attached.capacity(), 16);
    assert!(owned.is_attached());
    assert_eq!(owned.capacity(), 4);
}

#[test]
fn endianness_of_u32_one() {
    let mut big = Stream::builder().endian(Endian::Big).build();
    big.write(&1_u32).unwrap();
    assert_eq!(big.written(), [0, 0, 0, 1]);

    let mut little = Stream::builder().endian(Endian::Little).build();
    little.write(&1_u32).unwrap();
    assert_eq!(little.written(), [1, 0, 0, 0]);
}

#[test]
fn lowering_write_cursor_normalizes_read_cursor() {
    let mut stream = Stream::new();
    stream.write(&[1_u8; 10][..]).unwrap();
    stream.set_read_pos(8).unwrap();

    stream.set_write_pos(3).unwrap();
    assert_eq!(stream.read_pos(), 3);

    stream.skip_write(-1).unwrap();
    assert_eq!(stream.read_pos(), 2);
}

#[test]
fn copy_construction() {
    let mut source = Stream::with_capacity(100);
    source.write(&1_u64).unwrap();
    source.write("copy me").unwrap();
    source.skip_read(8).unwrap();

    let owned = source.clone();
    assert!(!owned.is_attached());
    assert_ne!(owned.as_ptr(), source.as_ptr());
    assert_eq!(owned.capacity(), source.write_pos());
    assert_eq!(owned.read_pos(), source.read_pos());
    assert_eq!(owned.write_pos(), source.write_pos());
    assert_eq!(owned.written(), source.written());

    let mut view = Stream::view_of(&source);
    assert!(view.is_attached());
    assert_eq!(view.as_ptr(), source.as_ptr());
    assert_eq!(view.capacity(), source.capacity());
    assert_eq!(view.read_pos(), source.read_pos());
    assert_eq!(view.write_pos(), source.write_pos());
    assert_eq!(view.read::<String>().unwrap(), "copy me");
}

#[test]
fn construct_from_bytes() {
    let bytes = [0_u8, 0, 0, 2, b'o', b'k'];

    let mut copied = Stream::copied_from(&bytes);
    assert!(!copied.is_attached());
    assert_ne!(copied.as_ptr(), bytes.as_ptr());
    assert_eq!(copied.capacity(), bytes.len());
    assert_eq!(copied.write_pos(), bytes.len());
    assert_eq!(copied.read::<String>().unwrap(), "ok");

    let mut buf = bytes;
    let address = buf.as_ptr();
    let mut attached = Stream::attached(&mut buf);
    assert!(attached.is_attached());
    assert_eq!(attached.as_ptr(), address);
    assert_eq!(attached.read::<String>().unwrap(), "ok");
}

#[test]
fn move_leaves_source_empty() {
    let mut source = Stream::builder().endian(Endian::Little).build();
    source.write(&5_u32).unwrap();
    let address = source.as_ptr();

    let mut moved = source.take();

    assert_eq!(moved.as_ptr(), address);
    assert_eq!(moved.endian(), Endian::Little);
    assert_eq!(moved.read::<u32>().unwrap(), 5);

    assert_eq!(source.capacity(), 0);
    assert_eq!(source.read_pos(), 0);
    assert_eq!(source.write_pos(), 0);
    assert_eq!(source.endian(), DEFAULT_ENDIAN);
    assert!(source.as_ptr().is_null());
}

#[test]
fn attach_to_stream() {
    let mut origin = Stream::new();
    origin.write(&100_i32).unwrap();
    origin.write(&false).unwrap();
    origin.write(&2.5_f64).unwrap();
    origin.write("Hello World").unwrap();
    origin.skip_read(4).unwrap();
    origin.set_endian(DEFAULT_ENDIAN.flipped());

    let mut first = Stream::new();
    first.attach_stream(&origin);

    assert!(first.is_attached());
    assert_eq!(first.as_ptr(), origin.as_ptr());
    assert_eq!(first.capacity(), origin.capacity());
    assert_eq!(first.read_pos(), 0);
    assert_eq!(first.write_pos(), origin.write_pos());
    assert_eq!(first.endian(), origin.endian());

    // Re-attaching to an attached stream aliases the same memory again.
    let mut second = Stream::new();
    second.attach_stream(&first);

    assert!(second.is_attached());
    assert_eq!(second.as_ptr(), first.as_ptr());
    assert_eq!(second.capacity(), first.capacity());
    assert_eq!(second.read_pos(), 0);
    assert_eq!(second.write_pos(), first.write_pos());
}

#[test]
fn compound_type_round_trip() {
    let player = sample_player();

    let mut stream = Stream::new();
    stream.write(&player).unwrap();
    stream.write(&PlayerState::default()).unwrap();

    assert_eq!(stream.read::<PlayerState>().unwrap(), player);
    assert_eq!(stream.read::<PlayerState>().unwrap(), PlayerState::default());
    assert_eq!(stream.readable_size(), 0);
}

#[test]
fn truncated_compound_read_is_atomic() {
    let mut full = Stream::new();
    full.write(&sample_player()).unwrap();

    for cut in 0..full.write_pos() {
        let mut truncated = Stream::copied_from(full.written().get(..cut).unwrap());

        let mut dest = PlayerState::default();
        truncated.read_into(&mut dest).unwrap_err();

        assert_eq!(truncated.read_pos(), 0, "cut at {cut}");
        assert_eq!(dest, PlayerState::default());
    }
}

#[test]
fn compound_write_into_small_buffer_is_atomic() {
    let mut buf = [0_u8; 16];
    let mut stream = Stream::attached(&mut buf);
    stream.clear();
    stream.write(&9_u32).unwrap();

    stream.write(&sample_player()).unwrap_err();

    assert_eq!(stream.write_pos(), 4);
    assert_eq!(stream.read::<u32>().unwrap(), 9);
}

#[test]
fn display_for_logging() {
    let mut buf = [0_u8; 3];
    let stream = Stream::attached(&mut buf);

    let text = stream.to_string();

    assert!(text.contains("cap:3"));
    assert!(text.contains("rpos:0"));
    assert!(text.contains("wpos:3"));
    assert!(text.contains("attach:true"));
}
