//! Example that recycles network message buffers through a `LocalObjectPool`.
//!
//! Every "received" message is decoded from a `wire_stream::Stream` into a pooled `Frame`,
//! handled and released. After the first iteration, no new frames are allocated.

use recycle_pool::{LocalObjectPool, PoolLink, PoolObject};
use wire_stream::{Decode, Encode, Stream, StreamError};

#[derive(Debug, Default)]
struct Frame {
    topic: String,
    body: Vec<u8>,
    link: PoolLink<Self>,
}

impl PoolObject for Frame {
    fn pool_link(&self) -> &PoolLink<Self> {
        &self.link
    }

    fn pool_link_mut(&mut self) -> &mut PoolLink<Self> {
        &mut self.link
    }

    fn reset(&mut self) {
        // Keep the allocations, drop the contents.
        self.topic.clear();
        self.body.clear();
    }
}

impl Frame {
    fn decode_into(&mut self, stream: &mut Stream<'_>) -> Result<(), StreamError> {
        self.topic.push_str(&stream.read::<String>()?);
        self.body.extend_from_slice(&stream.read::<Vec<u8>>()?);
        Ok(())
    }
}

struct Outgoing<'a> {
    topic: &'a str,
    body: &'a [u8],
}

impl Encode for Outgoing<'_> {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<(), StreamError> {
        stream.write(self.topic)?;
        stream.write(self.body)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let pool = LocalObjectPool::new();

    let mut wire = Stream::new();
    for (topic, body) in [
        ("sensors/temperature", &b"21.5"[..]),
        ("sensors/humidity", &b"48"[..]),
        ("alerts", &b"door open"[..]),
    ] {
        wire.write(&Outgoing { topic, body }).unwrap();
    }

    println!("Wire holds {} bytes: {wire}", wire.readable_size());

    while wire.readable_size() > 0 {
        let mut frame = pool.lease::<Frame>();
        frame.decode_into(&mut wire).unwrap();

        println!(
            "Handled frame on '{}' with {} byte body",
            frame.topic,
            frame.body.len()
        );

        // Dropping the lease hands the frame back to the pool.
    }

    let stats = pool.stats::<Frame>();
    println!("Frame stats: {stats:?}");
    assert_eq!(stats.created, 1);
    assert_eq!(stats.reused, 2);

    // Unused frames only occupy memory, so they can be released at any time.
    pool.shrink_to_fit();
    println!("After shrink: {:?}", pool.stats::<Frame>());

    // Decode is implemented for ordinary types too, which the pool serves as plain objects.
    let mut tail = Stream::new();
    tail.write(&42_u64).unwrap();
    let mut value = pool.acquire::<u64>();
    *value = u64::decode(&mut tail).unwrap();
    println!("Decoded plain value {value}");
    pool.release(value);

    println!("Example completed successfully!");
}
