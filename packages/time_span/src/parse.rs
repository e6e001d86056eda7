use std::str::FromStr;

use crate::span::{MICROS_PER_DAY, MICROS_PER_HOUR, MICROS_PER_MINUTE, MICROS_PER_SECOND};
use crate::{Error, TimeSpan};

impl FromStr for TimeSpan {
    type Err = Error;

    /// Parses the `[-][D ]HH:MM:SS[.ssssss]` form produced by the [`Display`][std::fmt::Display]
    /// implementation.
    ///
    /// The fraction may have one to six digits and is read as a decimal fraction of a second.
    /// Hours must be below 24, minutes and seconds below 60. Whitespace other than the single
    /// space after the day count is not allowed.
    fn from_str(s: &str) -> crate::Result<Self> {
        parse(s)
    }
}

fn parse(span: &str) -> crate::Result<TimeSpan> {
    let (negative, unsigned) = match span.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, span),
    };

    let (days, clock) = match unsigned.split_once(' ') {
        Some((days, clock)) => (parse_number(days, "day count", u64::MAX)?, clock),
        None => (0, unsigned),
    };

    let (hms, fraction) = match clock.split_once('.') {
        Some((hms, fraction)) => (hms, Some(fraction)),
        None => (clock, None),
    };

    let mut fields = hms.split(':');

    let (Some(hours), Some(minutes), Some(seconds), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::InvalidSyntax {
            invalid_value: clock.to_string(),
            problem: "expected three ':'-separated fields (HH:MM:SS)".to_string(),
        });
    };

    let hours = parse_number(hours, "hours", 23)?;
    let minutes = parse_number(minutes, "minutes", 59)?;
    let seconds = parse_number(seconds, "seconds", 59)?;
    let micros = fraction.map_or(Ok(0), parse_fraction)?;

    let magnitude = [
        (days, MICROS_PER_DAY),
        (hours, MICROS_PER_HOUR),
        (minutes, MICROS_PER_MINUTE),
        (seconds, MICROS_PER_SECOND),
        (micros, 1),
    ]
    .into_iter()
    .try_fold(0_u64, |total, (count, unit)| {
        count
            .checked_mul(unit.unsigned_abs())
            .and_then(|micros| total.checked_add(micros))
    })
    .ok_or_else(|| out_of_range(span))?;

    let micros = if negative {
        0_i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
    .ok_or_else(|| out_of_range(span))?;

    Ok(TimeSpan::from_micros(micros))
}

fn parse_number(digits: &str, what: &str, max: u64) -> crate::Result<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidSyntax {
            invalid_value: digits.to_string(),
            problem: format!("{what} must be a non-empty sequence of decimal digits"),
        });
    }

    let value = digits.parse::<u64>().map_err(|inner| Error::InvalidSyntax {
        invalid_value: digits.to_string(),
        problem: format!("{what} could not be parsed as an integer: {inner}"),
    })?;

    if value > max {
        return Err(Error::InvalidSyntax {
            invalid_value: digits.to_string(),
            problem: format!("{what} must not exceed {max}"),
        });
    }

    Ok(value)
}

/// Parses up to six fraction digits into microseconds, treating missing digits as trailing zeros.
fn parse_fraction(digits: &str) -> crate::Result<u64> {
    if digits.len() > 6 {
        return Err(Error::InvalidSyntax {
            invalid_value: digits.to_string(),
            problem: "fraction must have at most six digits".to_string(),
        });
    }

    // "5" means half a second, so pad on the right before reading the digits as microseconds.
    let padded = format!("{digits:0<6}");
    parse_number(&padded, "fraction", 999_999)
}

fn out_of_range(span: &str) -> Error {
    Error::InvalidSyntax {
        invalid_value: span.to_string(),
        problem: "value does not fit into the range of a time span".to_string(),
    }
}
