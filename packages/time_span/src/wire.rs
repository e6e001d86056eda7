use wire_stream::{Decode, Encode, Stream, StreamError};

use crate::TimeSpan;

impl Encode for TimeSpan {
    fn encode(&self, stream: &mut Stream<'_>) -> Result<(), StreamError> {
        stream.write(&self.total_micros())
    }
}

impl Decode for TimeSpan {
    fn decode(stream: &mut Stream<'_>) -> Result<Self, StreamError> {
        stream.read::<i64>().map(Self::from_micros)
    }
}
