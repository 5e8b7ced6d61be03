use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::core::types::FieldValue;
use crate::error::{ChartError, ChartResult};

/// Epoch numbers at or above this magnitude are read as milliseconds.
pub const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Seconds of a wall-clock time read as if it were UTC.
///
/// Used for axes that position local calendar time linearly, so a DST shift
/// never stretches or shrinks a day on screen.
#[must_use]
pub fn wall_clock_seconds(time: NaiveDateTime) -> f64 {
    time.and_utc().timestamp_millis() as f64 / 1000.0
}

#[must_use]
pub fn date_wall_clock_seconds(date: NaiveDate) -> f64 {
    wall_clock_seconds(date.and_time(NaiveTime::MIN))
}

/// Inverse of [`wall_clock_seconds`]. Returns `None` for non-finite or
/// out-of-range input.
#[must_use]
pub fn wall_clock_from_seconds(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis > i64::MAX as f64 || millis < i64::MIN as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|time| time.naive_utc())
}

/// Parses a record timestamp into wall-clock time of `tz`.
///
/// Accepts RFC 3339 and offset-qualified strings (converted into `tz`),
/// naive date-time and date strings (already wall-clock in `tz`), and epoch
/// numbers or numeric strings (seconds, or milliseconds at or above
/// [`EPOCH_MILLIS_THRESHOLD`]).
pub fn parse_timestamp<Tz: TimeZone>(
    value: &FieldValue,
    field: &str,
    tz: &Tz,
) -> ChartResult<NaiveDateTime> {
    let invalid = |raw: String| ChartError::InvalidTimestamp {
        field: field.to_owned(),
        raw,
    };

    match value {
        FieldValue::Number(epoch) => {
            epoch_to_wall_clock(*epoch, tz).ok_or_else(|| invalid(epoch.to_string()))
        }
        FieldValue::Text(text) => {
            parse_timestamp_str(text.trim(), tz).ok_or_else(|| invalid(text.clone()))
        }
        FieldValue::Null => Err(invalid("null".to_owned())),
        FieldValue::Bool(flag) => Err(invalid(flag.to_string())),
        FieldValue::List(items) => Err(invalid(items.join(","))),
    }
}

fn parse_timestamp_str<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(tz).naive_local());
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(time) = DateTime::parse_from_str(text, format) {
            return Some(time.with_timezone(tz).naive_local());
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(text, format) {
            return Some(time);
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    text.parse::<f64>()
        .ok()
        .and_then(|epoch| epoch_to_wall_clock(epoch, tz))
}

fn epoch_to_wall_clock<Tz: TimeZone>(epoch: f64, tz: &Tz) -> Option<NaiveDateTime> {
    if !epoch.is_finite() {
        return None;
    }
    let millis = if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
        epoch.round()
    } else {
        (epoch * 1000.0).round()
    };
    if millis > i64::MAX as f64 || millis < i64::MIN as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|utc| utc.with_timezone(tz).naive_local())
}

/// Replaces a non-finite value with `fallback`.
#[must_use]
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset, Timelike, Utc};

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).expect("valid offset")
    }

    #[test]
    fn rfc3339_is_converted_into_target_zone() {
        let value = FieldValue::from("2025-01-31T20:00:00Z");
        let time = parse_timestamp(&value, "created_at", &kst()).expect("parse");
        assert_eq!(time.date(), NaiveDate::from_ymd_opt(2025, 2, 1).expect("date"));
        assert_eq!(time.hour(), 5);
    }

    #[test]
    fn naive_strings_are_wall_clock() {
        let value = FieldValue::from("2025-03-04 23:10:00");
        let time = parse_timestamp(&value, "created_at", &kst()).expect("parse");
        assert_eq!(time.day(), 4);
        assert_eq!(time.hour(), 23);

        let value = FieldValue::from("2025/03/04");
        let time = parse_timestamp(&value, "created_at", &kst()).expect("parse");
        assert_eq!(time.month(), 3);
        assert_eq!(time.hour(), 0);
    }

    #[test]
    fn epoch_seconds_and_millis_agree() {
        let seconds = FieldValue::Number(1_735_689_600.0);
        let millis = FieldValue::Number(1_735_689_600_000.0);
        let a = parse_timestamp(&seconds, "t", &Utc).expect("seconds");
        let b = parse_timestamp(&millis, "t", &Utc).expect("millis");
        assert_eq!(a, b);
        assert_eq!(a.year(), 2025);
    }

    #[test]
    fn garbage_is_reported_with_field_name() {
        let err = parse_timestamp(&FieldValue::from("not a date"), "closed_at", &Utc)
            .expect_err("must fail");
        assert!(err.to_string().contains("closed_at"));
        assert!(parse_timestamp(&FieldValue::Null, "t", &Utc).is_err());
        assert!(parse_timestamp(&FieldValue::Number(f64::NAN), "t", &Utc).is_err());
    }

    #[test]
    fn wall_clock_seconds_round_trip() {
        let time = NaiveDate::from_ymd_opt(2025, 2, 1)
            .expect("date")
            .and_hms_opt(12, 30, 0)
            .expect("time");
        let seconds = wall_clock_seconds(time);
        assert_eq!(wall_clock_from_seconds(seconds), Some(time));
        assert_eq!(wall_clock_from_seconds(f64::INFINITY), None);
    }
}
