//! Parsing of duration literals such as `1h30m` or `1.5s`.

use std::time::Duration;

use thiserror::Error;

/// Error returned by [`parse_duration`].
///
/// Messages use the `time:` prefix familiar from other configuration tools so
/// that operators see the same diagnostic regardless of which service parsed
/// the literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    /// The literal is not a sequence of number and unit pairs, is negative,
    /// or overflows.
    #[error("time: invalid duration \"{0}\"")]
    Invalid(String),
    /// A number is not followed by a unit.
    #[error("time: missing unit in duration \"{0}\"")]
    MissingUnit(String),
    /// A unit suffix is not recognised.
    #[error("time: unknown unit \"{unit}\" in duration \"{input}\"")]
    UnknownUnit {
        /// The offending suffix.
        unit: String,
        /// The complete literal.
        input: String,
    },
}

const NANOS_PER_SECOND: u128 = 1_000_000_000;
// Digits beyond this carry no nanosecond precision for any unit.
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SECOND,
        "m" => 60 * NANOS_PER_SECOND,
        "h" => 3_600 * NANOS_PER_SECOND,
        _ => return None,
    })
}

fn split_digits(text: &str) -> (&str, &str) {
    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    text.split_at(end)
}

/// Parse a duration literal.
///
/// A literal is an optional `+` sign followed by one or more decimal numbers,
/// each with an optional fraction and a unit suffix: `ns`, `us` (or `µs`),
/// `ms`, `s`, `m`, `h`. The bare literal `0` is accepted without a unit.
///
/// # Errors
///
/// Returns a [`ParseDurationError`] describing the first problem found.
/// Negative durations other than zero are rejected because
/// [`Duration`] cannot represent them.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tiered_config::parse_duration;
///
/// assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5_400)));
/// assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1_500)));
/// assert_eq!(
///     parse_duration("abc").map_err(|e| e.to_string()),
///     Err("time: invalid duration \"abc\"".to_owned())
/// );
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    let invalid = || ParseDurationError::Invalid(input.to_owned());
    let (negative, mut rest) = match input.strip_prefix('-') {
        Some(unsigned) => (true, unsigned),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_number) = match after_whole.strip_prefix('.') {
            Some(tail) => split_digits(tail),
            None => ("", after_whole),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        let unit_end = after_number
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let (unit, remaining) = after_number.split_at(unit_end);
        if unit.is_empty() {
            return Err(ParseDurationError::MissingUnit(input.to_owned()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| ParseDurationError::UnknownUnit {
            unit: unit.to_owned(),
            input: input.to_owned(),
        })?;

        let whole_value: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut nanos = whole_value.checked_mul(scale).ok_or_else(invalid)?;
        let kept = fraction.get(..MAX_FRACTION_DIGITS).unwrap_or(fraction);
        if !kept.is_empty() {
            let digits: u128 = kept.parse().map_err(|_| invalid())?;
            let denominator = 10_u128.pow(u32::try_from(kept.len()).map_err(|_| invalid())?);
            let part = digits
                .checked_mul(scale)
                .and_then(|scaled| scaled.checked_div(denominator))
                .ok_or_else(invalid)?;
            nanos = nanos.checked_add(part).ok_or_else(invalid)?;
        }
        total = total.checked_add(nanos).ok_or_else(invalid)?;
        rest = remaining;
    }

    if negative && total != 0 {
        return Err(invalid());
    }
    let nanos = u64::try_from(total).map_err(|_| invalid())?;
    Ok(Duration::from_nanos(nanos))
}
