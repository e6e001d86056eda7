//! Example demonstrating encoding a message into a stream and decoding it again.

use wire_stream::{Decode, Encode, Endian, Stream, StreamError};

#[derive(Debug, PartialEq)]
struct ChatMessage {
    channel: u16,
    sender: String,
    text: String,
    reply_to: Option<u64>,
}

impl Encode for ChatMessage {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<(), StreamError> {
        stream.write(&self.channel)?;
        stream.write(&self.sender)?;
        stream.write(&self.text)?;
        stream.write(&self.reply_to)
    }
}

impl Decode for ChatMessage {
    fn decode(stream: &mut Stream<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            channel: stream.read()?,
            sender: stream.read()?,
            text: stream.read()?,
            reply_to: stream.read()?,
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let message = ChatMessage {
        channel: 7,
        sender: "ada".to_string(),
        text: "Hello, world!".to_string(),
        reply_to: Some(1234),
    };

    println!("=== Owned stream ===");

    let mut stream = Stream::new();
    stream.write(&message).unwrap();
    println!("After write: {stream}");
    println!("Encoded bytes: {:02x?}", stream.written());

    let decoded: ChatMessage = stream.read().unwrap();
    println!("Decoded: {decoded:?}");
    assert_eq!(decoded, message);

    println!("=== Attached stream ===");

    // Encode into a fixed-size packet owned by the caller.
    let mut packet = [0_u8; 64];
    let mut stream = Stream::attached(&mut packet);
    stream.set_endian(Endian::Little);
    stream.clear();
    stream.write(&message).unwrap();
    let used = stream.write_pos();
    println!("After write: {stream}");

    // A packet that is too small is rejected without partial output.
    let mut tiny = [0_u8; 8];
    let mut small = Stream::attached(&mut tiny);
    small.clear();
    match small.write(&message) {
        Ok(()) => println!("Unexpectedly fit into 8 bytes"),
        Err(error) => println!("Tiny packet rejected: {error} (write position {})", small.write_pos()),
    }

    println!("=== Detached buffer ===");

    let mut owned = Stream::copied_from(packet.get(..used).unwrap());
    owned.set_endian(Endian::Little);
    let copy: ChatMessage = owned.read().unwrap();
    assert_eq!(copy, message);

    let buf = owned.detach().unwrap();
    println!("Detached {} bytes, stream is now {owned}", buf.len());
}
