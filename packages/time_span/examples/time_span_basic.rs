//! Basic usage of `TimeSpan`: construction, arithmetic, formatting and parsing.

use std::time::Duration;

use time_span::TimeSpan;
use wire_stream::Stream;

fn main() {
    println!("=== TimeSpan Basic Example ===");

    let warmup = TimeSpan::from_minutes(12, 30, 0, 0);
    let session = TimeSpan::from_hours(1, 45, 10, 250, 0);
    let total = warmup + session;

    println!("Warmup:  {warmup}");
    println!("Session: {session}");
    println!("Total:   {total} ({} seconds)", total.total_seconds());

    let remaining = TimeSpan::from_hours(2, 0, 0, 0, 0) - total;
    println!("Remaining until two hours: {remaining}");

    let overtime = TimeSpan::from_hours(1, 0, 0, 0, 0) - total;
    println!("Overtime beyond one hour: {overtime} (negative: {})", overtime.is_negative());

    let parsed: TimeSpan = "3 04:05:06.7".parse().unwrap();
    println!("Parsed '3 04:05:06.7' as {parsed}");

    match "25:00:00".parse::<TimeSpan>() {
        Ok(span) => println!("Unexpectedly parsed {span}"),
        Err(error) => println!("Rejected '25:00:00': {error}"),
    }

    let timeout: Duration = Duration::try_from(session).unwrap();
    println!("As std Duration: {timeout:?}");

    let mut stream = Stream::new();
    stream.write(&total).unwrap();
    println!("On the wire: {:02X?}", stream.written());

    let decoded = stream.read::<TimeSpan>().unwrap();
    assert_eq!(decoded, total);
    println!("Decoded back: {decoded}");

    println!("Example completed successfully!");
}
