//! Status expiration arithmetic.
//!
//! A template can ask for its status to expire either a number of minutes
//! from now or at a wall-clock `HH:MM` later today. Both are turned into a
//! unix timestamp in seconds.

use chrono::{DateTime, Datelike, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

static UNTIL_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").expect("valid regex"));

/// Parse a strict `H:MM`/`HH:MM` 24-hour time into `(hour, minute)`.
pub fn parse_until_time(value: &str) -> Option<(u32, u32)> {
    let caps = UNTIL_TIME.captures(value)?;
    let hour = caps[1].parse().ok()?;
    let minute = caps[2].parse().ok()?;
    Some((hour, minute))
}

/// Compute the expiration timestamp for a status set at `now`.
///
/// The duration (minutes, fractions allowed) is added to `now` with
/// millisecond precision and floored to whole seconds. A valid `until_time`
/// then replaces that result with today's date at the given hour and
/// minute (seconds zeroed), even if it lies in the past. An invalid `until_time` is ignored. With
/// neither input the status never expires (`None`).
pub fn compute_expiration<Tz: TimeZone>(
    now: &DateTime<Tz>,
    duration_minutes: Option<f64>,
    until_time: Option<&str>,
) -> Option<i64> {
    let mut expiration = duration_minutes.and_then(|minutes| {
        let millis = now.timestamp_millis() as f64 + minutes * 60_000.0;
        let seconds = (millis / 1000.0).floor();
        (seconds.is_finite() && seconds.abs() < i64::MAX as f64).then_some(seconds as i64)
    });

    if let Some((hour, minute)) = until_time.and_then(parse_until_time) {
        // A time skipped by a DST jump does not exist today; treat it like
        // an unparsable value.
        match now
            .timezone()
            .with_ymd_and_hms(now.year(), now.month(), now.day(), hour, minute, 0)
            .earliest()
        {
            Some(target) => expiration = Some(target.timestamp()),
            None => log::debug!("until time {hour:02}:{minute:02} does not exist today"),
        }
    }

    expiration
}

/// Render an expiration as local `HH:MM`; `0` means the status never expires.
pub fn describe_expiration<Tz: TimeZone>(epoch: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    if epoch <= 0 {
        return None;
    }
    tz.timestamp_opt(epoch, 0)
        .single()
        .map(|t| t.format("%H:%M").to_string())
}
