//! Duration parsing for monitor intervals.
//!
//! Intervals are written either as an integer number of seconds
//! (`interval = 30`) or as a duration string made of `<number><unit>` pairs
//! (`interval = "1m30s"`). Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`.

use std::time::Duration;

use serde::de::{self, Deserializer, Visitor};

/// Interval applied when a monitor record has no `interval` key.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Parses a duration string such as `"10s"`, `"1m30s"` or `"1.5h"`.
///
/// # Errors
///
/// Returns a message describing the first invalid segment.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration '{input}'"))?;
        if number_len == 0 {
            return Err(format!("expected number in duration '{input}'"));
        }
        let number = &rest[..number_len];
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale: u128 = match &rest[..unit_len] {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60_000_000_000,
            "h" => 3_600_000_000_000,
            other => return Err(format!("unknown unit '{other}' in duration '{input}'")),
        };
        rest = &rest[unit_len..];

        let nanos = scaled_nanos(number, scale)
            .ok_or_else(|| format!("invalid number '{number}' in duration '{input}'"))?;
        total_nanos = total_nanos
            .checked_add(nanos)
            .ok_or_else(|| format!("duration '{input}' out of range"))?;
    }

    let secs = u64::try_from(total_nanos / 1_000_000_000)
        .map_err(|_| format!("duration '{input}' out of range"))?;
    #[allow(clippy::cast_possible_truncation)]
    let subsec = (total_nanos % 1_000_000_000) as u32;
    Ok(Duration::new(secs, subsec))
}

/// `number` is `digits[.digits]`; returns `number * scale` in nanoseconds,
/// truncating below one nanosecond.
fn scaled_nanos(number: &str, scale: u128) -> Option<u128> {
    let (whole, frac) = match number.split_once('.') {
        Some((w, f)) => (w, f),
        None => (number, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(scale)?;
    if !frac.is_empty() {
        if frac.contains('.') || frac.len() > 18 {
            return None;
        }
        let digits: u128 = frac.parse().ok()?;
        let denom = 10u128.pow(u32::try_from(frac.len()).ok()?);
        nanos = nanos.checked_add(digits.checked_mul(scale)? / denom)?;
    }
    Some(nanos)
}

/// Serde adapter for monitor intervals. Accepts integer seconds or a
/// duration string; rejects zero and negative values.
pub(crate) fn deserialize_interval<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntervalVisitor;

    impl<'de> Visitor<'de> for IntervalVisitor {
        type Value = Duration;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a positive number of seconds or a duration string like \"30s\"")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
            if v <= 0 {
                return Err(E::custom(format!("interval must be positive, got {v}")));
            }
            Ok(Duration::from_secs(v.unsigned_abs()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
            if v == 0 {
                return Err(E::custom("interval must be positive, got 0"));
            }
            Ok(Duration::from_secs(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
            let d = parse_duration(v).map_err(E::custom)?;
            if d.is_zero() {
                return Err(E::custom(format!("interval must be positive, got '{v}'")));
            }
            Ok(d)
        }
    }

    deserializer.deserialize_any(IntervalVisitor)
}
