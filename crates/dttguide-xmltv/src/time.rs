//! Broadcaster-timezone timestamps and durations.
//!
//! All upstream times are wall-clock times in Thailand (UTC+7, no DST).

use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use dttguide_api::guide::ProgramRecord;

/// Broadcaster UTC offset in seconds (UTC+7).
const BROADCAST_UTC_OFFSET_SECS: i32 = 25_200;

/// Format of `pgDate` and `pgBeginTime` joined by a space.
const START_FORMAT: &str = "%d-%m-%y %H:%M:%S";

/// XMLTV timestamp format (`YYYYMMDDHHMMSS ±HHMM`).
const XMLTV_TIME_FORMAT: &str = "%Y%m%d%H%M%S %z";

/// Largest accepted duration magnitude, in microseconds (~31 years).
const MAX_DURATION_MICROS: f64 = 1.0e15;

/// Broadcaster timezone (UTC+7).
#[allow(clippy::expect_used)]
pub static BROADCAST_TZ: LazyLock<FixedOffset> = LazyLock::new(|| {
    FixedOffset::east_opt(BROADCAST_UTC_OFFSET_SECS).expect("UTC+7 is a valid offset")
});

/// Parses a programme start from `pgDate` (`DD-MM-YY`) and
/// `pgBeginTime` (`HH:MM:SS`), interpreted in UTC+7.
///
/// # Errors
///
/// Returns an error if either field does not match its format.
pub fn parse_start(pg_date: &str, pg_begin_time: &str) -> Result<DateTime<FixedOffset>> {
    let raw = format!("{pg_date} {pg_begin_time}");
    let naive = NaiveDateTime::parse_from_str(&raw, START_FORMAT)
        .with_context(|| format!("invalid programme start: {raw:?}"))?;
    naive
        .and_local_timezone(*BROADCAST_TZ)
        .single()
        .with_context(|| format!("ambiguous programme start: {raw:?}"))
}

/// Parses the start instant of a programme record.
///
/// # Errors
///
/// Returns an error if `pgDate` or `pgBeginTime` is malformed.
pub fn programme_start(record: &ProgramRecord) -> Result<DateTime<FixedOffset>> {
    parse_start(&record.pg_date, &record.pg_begin_time)
}

/// Parses a `pgDuration` string of the form `H:MM:SS`.
///
/// Each of the three fields is a decimal number and may be fractional
/// (`"0:00:30.5"` is 30.5 seconds). Precision is kept to the microsecond.
///
/// # Errors
///
/// Returns an error if the string does not have exactly three numeric
/// fields or the total is not finite.
pub fn parse_duration(pg_duration: &str) -> Result<TimeDelta> {
    let fields = pg_duration
        .split(':')
        .map(|field| {
            field
                .trim()
                .parse::<f64>()
                .with_context(|| format!("invalid duration field {field:?} in {pg_duration:?}"))
        })
        .collect::<Result<Vec<f64>>>()?;

    let [hours, minutes, seconds] = fields.as_slice() else {
        bail!("expected H:MM:SS duration, got {pg_duration:?}");
    };

    let total_secs = hours.mul_add(3600.0, minutes.mul_add(60.0, *seconds));
    let micros = (total_secs * 1_000_000.0).round();
    if !micros.is_finite() || micros.abs() > MAX_DURATION_MICROS {
        bail!("duration out of range: {pg_duration:?}");
    }

    #[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
    let micros = micros as i64;
    Ok(TimeDelta::microseconds(micros))
}

/// Formats an instant as an XMLTV timestamp in UTC+7.
///
/// Example: `"20250101230000 +0700"`. Sub-second parts are dropped.
#[must_use]
pub fn format_xmltv_time(instant: &DateTime<FixedOffset>) -> String {
    instant
        .with_timezone(&*BROADCAST_TZ)
        .format(XMLTV_TIME_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_parse_start() {
        // Act
        let start = parse_start("01-01-25", "23:00:00").unwrap();

        // Assert
        let expected = BROADCAST_TZ
            .with_ymd_and_hms(2025, 1, 1, 23, 0, 0)
            .unwrap();
        assert_eq!(start, expected);
        assert_eq!(
            start,
            Utc.with_ymd_and_hms(2025, 1, 1, 16, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_start_rejects_iso_date() {
        // Act
        let result = parse_start("2025-01-01", "23:00:00");

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("2025-01-01"));
    }

    #[test]
    fn test_parse_duration_whole_fields() {
        // Act & Assert
        assert_eq!(
            parse_duration("1:30:00").unwrap(),
            TimeDelta::minutes(90)
        );
        assert_eq!(parse_duration("0:05:00").unwrap(), TimeDelta::minutes(5));
        assert_eq!(parse_duration("24:00:00").unwrap(), TimeDelta::hours(24));
    }

    #[test]
    fn test_parse_duration_fractional_fields() {
        // Act & Assert
        assert_eq!(
            parse_duration("0:00:30.5").unwrap(),
            TimeDelta::milliseconds(30_500)
        );
        assert_eq!(
            parse_duration("1.5:00:00").unwrap(),
            TimeDelta::minutes(90)
        );
        assert_eq!(
            parse_duration("0:0.25:0").unwrap(),
            TimeDelta::seconds(15)
        );
    }

    #[test]
    fn test_parse_duration_rejects_malformed() {
        // Act & Assert
        assert!(parse_duration("1:00").is_err());
        assert!(parse_duration("1:00:00:00").is_err());
        assert!(parse_duration("a:00:00").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("inf:00:00").is_err());
        assert!(parse_duration("NaN:00:00").is_err());
    }

    #[test]
    fn test_format_xmltv_time() {
        // Arrange
        let start = parse_start("02-01-25", "05:07:09").unwrap();

        // Act & Assert
        assert_eq!(format_xmltv_time(&start), "20250102050709 +0700");
    }

    #[test]
    fn test_format_xmltv_time_normalizes_offset() {
        // Arrange
        let utc = Utc
            .with_ymd_and_hms(2025, 1, 1, 20, 0, 0)
            .unwrap()
            .fixed_offset();

        // Act & Assert
        assert_eq!(format_xmltv_time(&utc), "20250102030000 +0700");
    }

    #[test]
    fn test_stop_is_start_plus_duration() {
        // Arrange
        let start = parse_start("03-01-25", "08:00:00").unwrap();
        let duration = parse_duration("0:45:30.5").unwrap();

        // Act
        let stop = start.checked_add_signed(duration).unwrap();

        // Assert
        assert_eq!(stop.signed_duration_since(start), duration);
        assert_eq!(format_xmltv_time(&stop), "20250103084530 +0700");
    }
}
