//! Timezone normalization
//!
//! Converts between a user's local calendar date and the absolute UTC
//! window covering that local day, and back again for display. Whether an
//! unrecognized zone falls back to UTC or rejects the request is the
//! caller's policy; this module only reports `InvalidTimezone`.

use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tempo_domain::{Result, TempoError};

/// Seconds from a local day's first to its last second (23:59:59).
const DAY_DELTA_SECS: i64 = 86_399;

/// Parse an IANA zone identifier.
pub fn parse_zone(name: &str) -> Result<Tz> {
    Tz::from_str(name).map_err(|_| TempoError::InvalidTimezone(name.to_string()))
}

/// Map a calendar date in `tz_name` to the UTC interval covering that local
/// day, from 00:00:00 to 23:59:59 inclusive.
pub fn local_day_to_utc_window(date: chrono::NaiveDate, tz_name: &str) -> Result<(f64, f64)> {
    let tz = parse_zone(tz_name)?;

    let day_start = date.and_time(NaiveTime::MIN);
    let day_end = day_start + TimeDelta::seconds(DAY_DELTA_SECS);

    let start_utc = resolve_local(day_start, tz).with_timezone(&Utc);
    let end_utc = resolve_local(day_end, tz).with_timezone(&Utc);

    Ok((start_utc.timestamp() as f64, end_utc.timestamp() as f64))
}

/// Convert a UTC timestamp to the user's local time for display.
pub fn utc_to_local(timestamp: f64, tz_name: &str) -> Result<DateTime<Tz>> {
    let tz = parse_zone(tz_name)?;

    let utc = DateTime::<Utc>::from_timestamp_millis((timestamp * 1000.0) as i64)
        .ok_or_else(|| TempoError::InvalidInput(format!("timestamp out of range: {timestamp}")))?;

    Ok(utc.with_timezone(&tz))
}

/// Resolve a naive local time against a zone.
///
/// Ambiguous times (fall-back) take the earlier offset; nonexistent times
/// (spring-forward gap) shift to the earliest valid instant after the gap.
fn resolve_local(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let shifted = naive + TimeDelta::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        }
    }
}
