//! Conversion between ASS timecodes (`H:MM:SS.ss`) and [`StartTime`]s.

use super::{Error, StartTime};

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;

/// Larger values would no longer fit into an `i64` of microseconds.
const MAX_SECONDS: f64 = 9.0e12;

/// Parse a timecode of the form `H:MM:SS.ss` into microseconds. Hours and minutes may be
/// of any width; the seconds may have any number of decimal places and are rounded to the
/// nearest microsecond.
///
/// # Errors
/// Returns [`Error::MalformedTimecode`] if the timecode does not consist of exactly three
/// colon-separated numbers, or if the resulting time does not fit into a [`StartTime`].
pub fn parse_timecode(timecode: &str) -> Result<StartTime, Error> {
    let malformed = || Error::MalformedTimecode(timecode.to_owned());

    let mut parts = timecode.trim().split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    let hours = hours.trim().parse::<u64>().map_err(|_| malformed())?;
    let minutes = minutes.trim().parse::<u64>().map_err(|_| malformed())?;
    let seconds = fast_float2::parse::<f64, _>(seconds.trim()).map_err(|_| malformed())?;

    if !seconds.is_finite() || !(0.0..MAX_SECONDS).contains(&seconds) {
        return Err(malformed());
    }

    let whole_minutes = hours
        .checked_mul(60)
        .and_then(|hour_minutes| hour_minutes.checked_add(minutes))
        .and_then(|total| i64::try_from(total).ok())
        .and_then(|total| total.checked_mul(MICROS_PER_MINUTE))
        .ok_or_else(malformed)?;

    // Range checked above
    #[allow(clippy::cast_possible_truncation)]
    let second_micros = (seconds * 1_000_000.0).round() as i64;

    whole_minutes
        .checked_add(second_micros)
        .map(StartTime)
        .ok_or_else(malformed)
}

/// Format a time as `H:MM:SS.mmm`. Sub-millisecond precision is truncated, so
/// `parse_timecode(&format_timecode(t))` yields `t` rounded down to whole milliseconds.
#[must_use]
pub fn format_timecode(time: StartTime) -> String {
    let sign = if time.0 < 0 { "-" } else { "" };
    let micros = time.0.unsigned_abs();

    let millis = (micros % 1_000_000) / 1000;
    let total_seconds = micros / 1_000_000;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    format!("{sign}{hours}:{minutes:02}:{seconds:02}.{millis:03}")
}
