//! Duration strings in the `2h5m10s` / `1.5h` / `100ms` format.
//!
//! A duration is an optional sign followed by one or more `<decimal><unit>`
//! pairs. Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`.
//! A bare `0` is accepted without a unit.

use std::time::Duration;

use crate::error::ConfigError;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

/// Fraction digits beyond this are below nanosecond resolution for every unit.
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(NANOS_PER_MIN),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// Parse a duration string.
///
/// Negative non-zero values are rejected with [`ConfigError::NegativeDuration`];
/// zero is returned as-is and left for the caller to reject where it matters.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let original = input.trim();
    let (negative, mut rest) = match original.as_bytes().first() {
        Some(b'-') => (true, &original[1..]),
        Some(b'+') => (false, &original[1..]),
        _ => (false, original),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(ConfigError::invalid_duration(input, "empty duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after_int) = rest.split_at(int_len);

        let (frac_part, after_number) = match after_int.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(after_dot.len());
                after_dot.split_at(frac_len)
            }
            None => ("", after_int),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ConfigError::invalid_duration(input, "expected a number"));
        }

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, remaining) = after_number.split_at(unit_len);
        if unit.is_empty() {
            return Err(ConfigError::invalid_duration(input, "missing unit"));
        }
        let scale = unit_nanos(unit).ok_or_else(|| {
            ConfigError::invalid_duration(input, format!("unknown unit {:?}", unit))
        })?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| ConfigError::invalid_duration(input, "number out of range"))?
        };

        let mut value = whole
            .checked_mul(scale)
            .ok_or_else(|| ConfigError::invalid_duration(input, "duration out of range"))?;

        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
            // Digits only, at most 18 of them: always fits.
            let numerator: u128 = digits.parse().unwrap_or(0);
            let denominator = 10u128.pow(digits.len() as u32);
            value += numerator * scale / denominator;
        }

        total = total
            .checked_add(value)
            .ok_or_else(|| ConfigError::invalid_duration(input, "duration out of range"))?;
        rest = remaining;
    }

    if total > u64::MAX as u128 {
        return Err(ConfigError::invalid_duration(input, "duration out of range"));
    }
    if negative && total > 0 {
        return Err(ConfigError::NegativeDuration(original.to_string()));
    }

    Ok(Duration::from_nanos(total as u64))
}

/// Format a duration compactly, e.g. `2h5m10s`, `1.5s`, `100ms`.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_SEC {
        return if nanos % NANOS_PER_MILLI == 0 {
            format!("{}ms", nanos / NANOS_PER_MILLI)
        } else if nanos % NANOS_PER_MICRO == 0 {
            format!("{}us", nanos / NANOS_PER_MICRO)
        } else {
            format!("{}ns", nanos)
        };
    }

    let hours = nanos / NANOS_PER_HOUR;
    let minutes = (nanos % NANOS_PER_HOUR) / NANOS_PER_MIN;
    let seconds = (nanos % NANOS_PER_MIN) / NANOS_PER_SEC;
    let sub_nanos = nanos % NANOS_PER_SEC;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if sub_nanos > 0 {
        let fraction = format!("{:09}", sub_nanos);
        out.push_str(&format!("{}.{}s", seconds, fraction.trim_end_matches('0')));
    } else if seconds > 0 {
        out.push_str(&format!("{}s", seconds));
    }
    out
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
