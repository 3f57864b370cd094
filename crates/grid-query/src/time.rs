//! Observation time handling.
//!
//! Grid files store time as seconds since 1981-01-01T00:00:00Z.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Default rendering of timestamps, minute resolution.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Julian date of the Unix epoch.
const UNIX_EPOCH_JULIAN_DATE: f64 = 2_440_587.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// The reference epoch of grid time values.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1981, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Convert a raw time value to a timestamp. Fractional seconds are dropped.
pub fn timestamp_from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    epoch().checked_add_signed(Duration::try_seconds(seconds.trunc() as i64)?)
}

/// Julian date number of a timestamp.
pub fn julian_date(timestamp: &DateTime<Utc>) -> f64 {
    let seconds =
        timestamp.timestamp() as f64 + f64::from(timestamp.timestamp_subsec_nanos()) * 1e-9;
    seconds / SECONDS_PER_DAY + UNIX_EPOCH_JULIAN_DATE
}

/// Format a timestamp with a strftime pattern, `None` if the pattern is invalid.
pub fn format_timestamp(timestamp: &DateTime<Utc>, pattern: &str) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    write!(out, "{}", timestamp.format_with_items(items.into_iter())).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_epoch_seconds_to_timestamp() {
        // 2015-03-13T00:00:00Z
        let ts = timestamp_from_epoch_seconds(1_079_049_600.0).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2015, 3, 13, 0, 0, 0).unwrap());
        assert_eq!(timestamp_from_epoch_seconds(0.0).unwrap(), epoch());
    }

    #[test]
    fn test_fractional_seconds_are_truncated() {
        let ts = timestamp_from_epoch_seconds(59.9).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(1981, 1, 1, 0, 0, 59).unwrap());
    }

    #[test]
    fn test_non_finite_time_has_no_timestamp() {
        assert_eq!(timestamp_from_epoch_seconds(f64::NAN), None);
        assert_eq!(timestamp_from_epoch_seconds(f64::INFINITY), None);
    }

    #[test]
    fn test_julian_date() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_approx_eq!(julian_date(&j2000), 2_451_545.0, 1e-9);
        let unix = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_approx_eq!(julian_date(&unix), 2_440_587.5, 1e-9);
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2015, 3, 13, 6, 30, 15).unwrap();
        assert_eq!(
            format_timestamp(&ts, DEFAULT_TIME_FORMAT).as_deref(),
            Some("2015-03-13 06:30")
        );
        assert_eq!(format_timestamp(&ts, "%Y%m%d").as_deref(), Some("20150313"));
        assert_eq!(format_timestamp(&ts, "%Q"), None);
    }
}
