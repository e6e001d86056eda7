use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};
use std::time::Duration;

use crate::Error;

pub(crate) const MICROS_PER_MILLI: i64 = 1_000;
pub(crate) const MICROS_PER_SECOND: i64 = 1_000 * MICROS_PER_MILLI;
pub(crate) const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
pub(crate) const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
pub(crate) const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;

/// A signed span of time with microsecond precision.
///
/// Unlike [`Duration`], a span can be negative. Components such as [`hours()`][Self::hours] of a
/// negative span are negative or zero.
///
/// # Examples
///
/// ```
/// use time_span::TimeSpan;
///
/// let span = TimeSpan::from_days(1, 2, 3, 4, 5, 6);
///
/// assert_eq!(span.days(), 1);
/// assert_eq!(span.hours(), 2);
/// assert_eq!(span.millis(), 5);
/// assert_eq!(span.total_hours(), 26);
/// assert_eq!(span.to_string(), "1 02:03:04.005006");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimeSpan {
    micros: i64,
}

/// Multiplies and sums the components, panicking if the result does not fit.
#[expect(
    clippy::indexing_slicing,
    reason = "the loop condition keeps the index in bounds"
)]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "the index stays below the slice length"
)]
const fn sum_of(parts: &[(i64, i64)]) -> i64 {
    let mut total: i64 = 0;
    let mut index = 0;

    while index < parts.len() {
        let (count, unit) = parts[index];
        let micros = count.checked_mul(unit).expect("time span overflow");
        total = total.checked_add(micros).expect("time span overflow");
        index += 1;
    }

    total
}

impl TimeSpan {
    /// A span of zero length.
    pub const ZERO: Self = Self { micros: 0 };

    /// The longest representable span.
    pub const MAX: Self = Self { micros: i64::MAX };

    /// The most negative representable span.
    pub const MIN: Self = Self { micros: i64::MIN };

    /// Creates a span from days and the smaller components.
    ///
    /// # Panics
    ///
    /// Panics if the total does not fit into the range of a span.
    #[must_use]
    pub const fn from_days(
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
        millis: i64,
        micros: i64,
    ) -> Self {
        Self::from_micros(sum_of(&[
            (days, MICROS_PER_DAY),
            (hours, MICROS_PER_HOUR),
            (minutes, MICROS_PER_MINUTE),
            (seconds, MICROS_PER_SECOND),
            (millis, MICROS_PER_MILLI),
            (micros, 1),
        ]))
    }

    /// Creates a span from hours and the smaller components.
    ///
    /// # Panics
    ///
    /// Panics if the total does not fit into the range of a span.
    #[must_use]
    pub const fn from_hours(
        hours: i64,
        minutes: i64,
        seconds: i64,
        millis: i64,
        micros: i64,
    ) -> Self {
        Self::from_days(0, hours, minutes, seconds, millis, micros)
    }

    /// Creates a span from minutes and the smaller components.
    ///
    /// # Panics
    ///
    /// Panics if the total does not fit into the range of a span.
    #[must_use]
    pub const fn from_minutes(minutes: i64, seconds: i64, millis: i64, micros: i64) -> Self {
        Self::from_days(0, 0, minutes, seconds, millis, micros)
    }

    /// Creates a span from seconds and the smaller components.
    ///
    /// # Panics
    ///
    /// Panics if the total does not fit into the range of a span.
    #[must_use]
    pub const fn from_seconds(seconds: i64, millis: i64, micros: i64) -> Self {
        Self::from_days(0, 0, 0, seconds, millis, micros)
    }

    /// Creates a span from milliseconds and microseconds.
    ///
    /// # Panics
    ///
    /// Panics if the total does not fit into the range of a span.
    #[must_use]
    pub const fn from_millis(millis: i64, micros: i64) -> Self {
        Self::from_days(0, 0, 0, 0, millis, micros)
    }

    /// Creates a span from a number of microseconds.
    #[must_use]
    pub const fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    /// Whether the span is shorter than zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.micros < 0
    }

    /// The whole days in the span.
    #[must_use]
    pub const fn days(self) -> i64 {
        self.total(MICROS_PER_DAY)
    }

    /// The hours component, in `-23..=23`.
    #[must_use]
    pub const fn hours(self) -> i64 {
        self.component(MICROS_PER_HOUR, MICROS_PER_DAY)
    }

    /// The minutes component, in `-59..=59`.
    #[must_use]
    pub const fn minutes(self) -> i64 {
        self.component(MICROS_PER_MINUTE, MICROS_PER_HOUR)
    }

    /// The seconds component, in `-59..=59`.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        self.component(MICROS_PER_SECOND, MICROS_PER_MINUTE)
    }

    /// The milliseconds component, in `-999..=999`.
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.component(MICROS_PER_MILLI, MICROS_PER_SECOND)
    }

    /// The microseconds component, in `-999..=999`.
    #[must_use]
    pub const fn micros(self) -> i64 {
        self.component(1, MICROS_PER_MILLI)
    }

    /// The span in whole days. Same as [`days()`][Self::days].
    #[must_use]
    pub const fn total_days(self) -> i64 {
        self.total(MICROS_PER_DAY)
    }

    /// The span in whole hours.
    #[must_use]
    pub const fn total_hours(self) -> i64 {
        self.total(MICROS_PER_HOUR)
    }

    /// The span in whole minutes.
    #[must_use]
    pub const fn total_minutes(self) -> i64 {
        self.total(MICROS_PER_MINUTE)
    }

    /// The span in whole seconds.
    #[must_use]
    pub const fn total_seconds(self) -> i64 {
        self.total(MICROS_PER_SECOND)
    }

    /// The span in whole milliseconds.
    #[must_use]
    pub const fn total_millis(self) -> i64 {
        self.total(MICROS_PER_MILLI)
    }

    /// The span in microseconds.
    #[must_use]
    pub const fn total_micros(self) -> i64 {
        self.micros
    }

    #[expect(
        clippy::integer_division,
        reason = "totals are whole units, truncated toward zero"
    )]
    const fn total(self, unit: i64) -> i64 {
        self.micros / unit
    }

    #[expect(
        clippy::integer_division,
        reason = "components are whole units, truncated toward zero"
    )]
    #[expect(
        clippy::modulo_arithmetic,
        reason = "components of negative spans are negative"
    )]
    const fn component(self, unit: i64, modulus: i64) -> i64 {
        (self.micros % modulus) / unit
    }

    /// Adds two spans, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.micros.checked_add(other.micros) {
            Some(micros) => Some(Self { micros }),
            None => None,
        }
    }

    /// Subtracts `other` from the span, returning `None` on overflow.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.micros.checked_sub(other.micros) {
            Some(micros) => Some(Self { micros }),
            None => None,
        }
    }

    /// Multiplies the span by `scale`, truncating toward zero to whole microseconds.
    ///
    /// Returns `None` if `scale` is not finite or the result does not fit into a span.
    #[must_use]
    pub fn checked_mul_f64(self, scale: f64) -> Option<Self> {
        Self::from_scaled_micros(self.micros_f64() * scale)
    }

    /// Divides the span by `divisor`, truncating toward zero to whole microseconds.
    ///
    /// Returns `None` if `divisor` is zero or not finite, or the result does not fit into a span.
    #[must_use]
    pub fn checked_div_f64(self, divisor: f64) -> Option<Self> {
        Self::from_scaled_micros(self.micros_f64() / divisor)
    }

    /// The remainder of dividing the microsecond count of the span by `divisor`. The result has
    /// the sign of the span.
    ///
    /// Returns `None` if `divisor` is zero, or for [`TimeSpan::MIN`] divided by -1.
    #[must_use]
    pub const fn checked_rem(self, divisor: i64) -> Option<Self> {
        match self.micros.checked_rem(divisor) {
            Some(micros) => Some(Self { micros }),
            None => None,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "scaling is approximate for spans longer than 2^53 microseconds"
    )]
    fn micros_f64(self) -> f64 {
        self.micros as f64
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "the value is finite, whole and within the i64 range before the cast"
    )]
    fn from_scaled_micros(micros: f64) -> Option<Self> {
        // 2^63, the first whole number past i64::MAX. It is exactly representable as f64.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;

        let micros = micros.trunc();

        (micros.is_finite() && (-LIMIT..LIMIT).contains(&micros)).then(|| Self {
            micros: micros as i64,
        })
    }

    /// The absolute length of the span as a [`Duration`].
    #[must_use]
    pub const fn unsigned_abs(self) -> Duration {
        Duration::from_micros(self.micros.unsigned_abs())
    }
}

impl Add for TimeSpan {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.checked_add(rhs).expect("overflow when adding time spans")
    }
}

impl AddAssign for TimeSpan {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for TimeSpan {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.checked_sub(rhs)
            .expect("overflow when subtracting time spans")
    }
}

impl SubAssign for TimeSpan {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for TimeSpan {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            micros: self
                .micros
                .checked_neg()
                .expect("overflow when negating time span"),
        }
    }
}

impl Mul<f64> for TimeSpan {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.checked_mul_f64(rhs)
            .expect("time span scaled by a non-finite factor or out of range")
    }
}

impl MulAssign<f64> for TimeSpan {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl Div<f64> for TimeSpan {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        self.checked_div_f64(rhs)
            .expect("time span divided by zero, by a non-finite divisor or out of range")
    }
}

impl DivAssign<f64> for TimeSpan {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}

impl Rem<i64> for TimeSpan {
    type Output = Self;

    fn rem(self, rhs: i64) -> Self {
        self.checked_rem(rhs)
            .expect("time span remainder with a zero divisor or overflow")
    }
}

impl RemAssign<i64> for TimeSpan {
    fn rem_assign(&mut self, rhs: i64) {
        *self = *self % rhs;
    }
}

impl TryFrom<Duration> for TimeSpan {
    type Error = Error;

    /// Converts a duration, truncating anything below a microsecond.
    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        i64::try_from(value.as_micros())
            .map(Self::from_micros)
            .map_err(|_| Error::OutOfRange {
                problem: format!("{value:?} is too long for a time span"),
            })
    }
}

impl TryFrom<TimeSpan> for Duration {
    type Error = Error;

    fn try_from(value: TimeSpan) -> Result<Self, Self::Error> {
        if value.is_negative() {
            return Err(Error::OutOfRange {
                problem: format!("{value} is negative and has no duration equivalent"),
            });
        }

        Ok(value.unsigned_abs())
    }
}
