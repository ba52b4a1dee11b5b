//! Timestamp <-> date-parts arithmetic used by the toolbar.
//!
//! Everything here is UTC and pure.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::ToolbarError;

/// Hour and minute of a date/time field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Parse the two text inputs of a time picker. Surrounding whitespace is
    /// ignored and a single digit is accepted (`"7"` is `07`).
    pub fn parse(hour: &str, minute: &str) -> Result<Self, ToolbarError> {
        let invalid = || ToolbarError::InvalidTime {
            hour: hour.to_string(),
            minute: minute.to_string(),
        };
        let h = hour.trim().parse::<u32>().map_err(|_| invalid())?;
        let m = minute.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(h, m).ok_or_else(invalid)
    }

    /// Current UTC hour and minute.
    pub fn of(now: DateTime<Utc>) -> Self {
        Self {
            hour: now.hour(),
            minute: now.minute(),
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn padded_hour(&self) -> String {
        pad_time(self.hour)
    }

    pub fn padded_minute(&self) -> String {
        pad_time(self.minute)
    }
}

/// Calendar date plus hour/minute, the result of decomposing a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub date: NaiveDate,
    pub time: TimeOfDay,
}

pub fn pad_time(value: u32) -> String {
    format!("{value:02}")
}

/// Split a unix timestamp (seconds) into its UTC date, hour and minute.
///
/// Returns `None` when the timestamp is outside chrono's representable range.
pub fn decompose_timestamp(unix_seconds: i64) -> Option<DateParts> {
    let dt = DateTime::<Utc>::from_timestamp(unix_seconds, 0)?;
    Some(DateParts {
        date: dt.date_naive(),
        time: TimeOfDay::of(dt),
    })
}

/// Inverse of [`decompose_timestamp`], up to the (dropped) seconds.
pub fn compose_timestamp(date: NaiveDate, time: TimeOfDay) -> i64 {
    let naive = date
        .and_hms_opt(time.hour, time.minute, 0)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
    naive.and_utc().timestamp()
}

/// `2024-01-01T08:05:00Z`
pub fn iso_date_format(date: NaiveDate, time: TimeOfDay) -> String {
    format!(
        "{}T{}:{}:00Z",
        date.format("%Y-%m-%d"),
        time.padded_hour(),
        time.padded_minute()
    )
}

/// Parse an ISO-8601 date/time back into unix seconds.
///
/// Accepts RFC 3339 strings as well as naive `YYYY-MM-DDTHH:MM[:SS]` ones,
/// which are read as UTC.
pub fn unix_timestamp_from_iso(iso: &str) -> Result<i64, ToolbarError> {
    let trimmed = iso.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.timestamp());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc().timestamp())
        .ok_or_else(|| ToolbarError::InvalidIso(iso.to_string()))
}

/// Text shown in the start/end inputs: `2024-01-01 08:05`.
pub fn format_for_display(date: NaiveDate, time: TimeOfDay) -> String {
    format!(
        "{} {}:{}",
        date.format("%Y-%m-%d"),
        time.padded_hour(),
        time.padded_minute()
    )
}

/// Whole seconds of `now`, rounded up.
pub fn ceil_unix_seconds(now: DateTime<Utc>) -> i64 {
    let secs = now.timestamp();
    if now.timestamp_subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Format a log event timestamp for the log list.
pub fn format_timestamp_millis(ts_millis: i64, use_local: bool) -> String {
    if ts_millis <= 0 {
        return "-".to_string();
    }

    let secs = ts_millis / 1000;
    let nanos = (ts_millis % 1000) * 1_000_000;

    if use_local {
        match Local.timestamp_opt(secs, nanos as u32) {
            LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            _ => "-".to_string(),
        }
    } else {
        match Utc.timestamp_opt(secs, nanos as u32) {
            LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3fZ").to_string(),
            _ => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn decompose_known_timestamp() {
        // 2023-11-14 22:13:20 UTC
        let parts = decompose_timestamp(1_700_000_000).unwrap();
        assert_eq!(parts.date, date(2023, 11, 14));
        assert_eq!(parts.time.padded_hour(), "22");
        assert_eq!(parts.time.padded_minute(), "13");
    }

    #[test]
    fn compose_then_decompose_recovers_parts() {
        let time = TimeOfDay::new(7, 5).unwrap();
        let ts = compose_timestamp(date(2024, 2, 29), time);
        let parts = decompose_timestamp(ts).unwrap();
        assert_eq!(parts.date, date(2024, 2, 29));
        assert_eq!(parts.time, time);
    }

    #[test]
    fn compose_drops_seconds() {
        let parts = decompose_timestamp(1_700_000_059).unwrap();
        assert_eq!(compose_timestamp(parts.date, parts.time), 1_700_000_040);
    }

    #[test]
    fn out_of_range_timestamp_decomposes_to_none() {
        assert!(decompose_timestamp(i64::MAX).is_none());
    }

    #[test]
    fn iso_round_trip() {
        let time = TimeOfDay::new(23, 59).unwrap();
        let iso = iso_date_format(date(2024, 1, 1), time);
        assert_eq!(iso, "2024-01-01T23:59:00Z");
        assert_eq!(
            unix_timestamp_from_iso(&iso).unwrap(),
            compose_timestamp(date(2024, 1, 1), time)
        );
        assert_eq!(
            unix_timestamp_from_iso("2024-01-01T23:59").unwrap(),
            compose_timestamp(date(2024, 1, 1), time)
        );
    }

    #[test]
    fn iso_rejects_garbage() {
        assert_eq!(
            unix_timestamp_from_iso("yesterday"),
            Err(ToolbarError::InvalidIso("yesterday".to_string()))
        );
    }

    #[test]
    fn time_of_day_parsing() {
        assert_eq!(TimeOfDay::parse("7", " 05 "), Ok(TimeOfDay::new(7, 5).unwrap()));
        assert!(TimeOfDay::parse("24", "00").is_err());
        assert!(TimeOfDay::parse("12", "60").is_err());
        assert!(TimeOfDay::parse("ab", "00").is_err());
    }

    #[test]
    fn display_format_is_zero_padded() {
        let time = TimeOfDay::new(8, 5).unwrap();
        assert_eq!(format_for_display(date(2024, 1, 1), time), "2024-01-01 08:05");
    }

    #[test]
    fn ceil_rounds_up_fractional_seconds() {
        let exact = DateTime::<Utc>::from_timestamp(100, 0).unwrap();
        let fractional = DateTime::<Utc>::from_timestamp(100, 1).unwrap();
        assert_eq!(ceil_unix_seconds(exact), 100);
        assert_eq!(ceil_unix_seconds(fractional), 101);
    }

    #[test]
    fn format_millis_utc() {
        assert_eq!(
            format_timestamp_millis(1_700_000_000_123, false),
            "2023-11-14 22:13:20.123Z"
        );
        assert_eq!(format_timestamp_millis(0, false), "-");
    }
}
