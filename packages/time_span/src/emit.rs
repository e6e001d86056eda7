use std::fmt;

use crate::TimeSpan;

impl fmt::Display for TimeSpan {
    /// Formats the span as `[D ]HH:MM:SS.ssssss`.
    ///
    /// The day segment and the space after it are only present if the span covers at least one
    /// whole day. Negative spans are prefixed with `-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }

        // Components of negative spans are all <= 0, so their magnitudes format correctly.
        let days = self.days().unsigned_abs();
        let hours = self.hours().unsigned_abs();
        let minutes = self.minutes().unsigned_abs();
        let seconds = self.seconds().unsigned_abs();
        let fraction = self
            .millis()
            .unsigned_abs()
            .checked_mul(1_000)
            .and_then(|micros| micros.checked_add(self.micros().unsigned_abs()))
            .expect("sub-second fraction is always below one million");

        if days != 0 {
            write!(f, "{days} ")?;
        }

        write!(f, "{hours:02}:{minutes:02}:{seconds:02}.{fraction:06}")
    }
}
