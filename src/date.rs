//! Interprets [`RawDate`]s as instants for sorting and renders them for
//! display.

use crate::post::RawDate;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// The default display format: the short en-US date, e.g. `1/1/2024`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Shown in place of a date that is present but can't be understood.
pub const INVALID_DATE: &str = "Invalid Date";

// Tried after RFC 3339: YAML 1.1 timestamps allow a space before the offset.
const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f %:z",
];

// Offset-less times are read as UTC.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%d %B %Y"];

/// Parses a front-matter date into an instant. Strings may be RFC 3339 or a
/// YAML timestamp (offset optionally after a space), a date and time without
/// an offset (UTC), or a bare date such as `2024-01-15`, `2024/01/15` or
/// `January 15, 2024` (midnight UTC).
/// Numbers are milliseconds since the Unix epoch. Returns `None` for anything
/// else.
pub fn parse_instant(date: &RawDate) -> Option<DateTime<Utc>> {
    match date {
        RawDate::Text(text) => parse_text(text.trim()),
        RawDate::Integer(millis) => Utc.timestamp_millis_opt(*millis).single(),
        RawDate::Float(millis) if millis.is_finite() => {
            Utc.timestamp_millis_opt(millis.trunc() as i64).single()
        }
        RawDate::Float(_) => None,
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(text, format) {
            return Some(instant.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Formats `instant` in UTC with a strftime-style `format`. A malformed
/// `format` falls back to [`DEFAULT_DATE_FORMAT`].
pub fn format_date(instant: &DateTime<Utc>, format: &str) -> String {
    let format = if validate_format(format) {
        format
    } else {
        DEFAULT_DATE_FORMAT
    };
    instant.format(format).to_string()
}

/// Checks that `format` is a well-formed strftime pattern. chrono panics when
/// displaying a malformed one.
pub fn validate_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// The header text for a post's date: blank when absent, [`INVALID_DATE`]
/// when unparseable.
pub fn display_date(date: Option<&RawDate>, format: &str) -> String {
    match date {
        None => String::new(),
        Some(raw) => match parse_instant(raw) {
            Some(instant) => format_date(&instant, format),
            None => INVALID_DATE.to_owned(),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn text(s: &str) -> RawDate {
        RawDate::Text(s.to_owned())
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_instant(&text("2024-01-01")),
            Some(utc(2024, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        assert_eq!(
            parse_instant(&text("2024-03-05T10:00:00+02:00")),
            Some(utc(2024, 3, 5, 8, 0, 0))
        );
    }

    #[test]
    fn test_parse_naive_date_times() {
        let want = Some(utc(2024, 3, 5, 10, 30, 0));
        assert_eq!(parse_instant(&text("2024-03-05T10:30:00")), want);
        assert_eq!(parse_instant(&text("2024-03-05T10:30")), want);
        assert_eq!(parse_instant(&text("2024-03-05 10:30:00")), want);
        assert_eq!(parse_instant(&text("2024-03-05 10:30")), want);
    }

    #[test]
    fn test_parse_yaml_timestamps_with_offset() {
        let want = Some(utc(2024, 1, 15, 8, 30, 0));
        assert_eq!(parse_instant(&text("2024-01-15 10:30:00 +02:00")), want);
        assert_eq!(parse_instant(&text("2024-01-15 10:30:00 +0200")), want);
        assert_eq!(parse_instant(&text("2024-01-15T10:30:00 +02:00")), want);
    }

    #[test]
    fn test_parse_other_date_spellings() {
        let want = Some(utc(2024, 1, 15, 0, 0, 0));
        assert_eq!(parse_instant(&text("2024/01/15")), want);
        assert_eq!(parse_instant(&text("January 15, 2024")), want);
        assert_eq!(parse_instant(&text("Jan 15, 2024")), want);
        assert_eq!(parse_instant(&text("15 January 2024")), want);
    }

    #[test]
    fn test_parse_epoch_millis() {
        assert_eq!(
            parse_instant(&RawDate::Integer(1_704_067_200_000)),
            Some(utc(2024, 1, 1, 0, 0, 0))
        );
        assert_eq!(
            parse_instant(&RawDate::Float(1_704_067_200_000.0)),
            Some(utc(2024, 1, 1, 0, 0, 0))
        );
        assert_eq!(parse_instant(&RawDate::Float(f64::NAN)), None);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_instant(&text("next tuesday")), None);
        assert_eq!(parse_instant(&text("")), None);
        assert_eq!(parse_instant(&text("2024-13-01")), None);
    }

    #[test]
    fn test_display_date() {
        let format = DEFAULT_DATE_FORMAT;
        assert_eq!(display_date(Some(&text("2024-01-01")), format), "1/1/2024");
        assert_eq!(display_date(Some(&text("2023-12-25")), format), "12/25/2023");
        assert_eq!(display_date(Some(&text("soon")), format), INVALID_DATE);
        assert_eq!(display_date(None, format), "");
    }

    #[test]
    fn test_custom_format() {
        assert_eq!(
            display_date(Some(&text("2024-02-01")), "%B %-d, %Y"),
            "February 1, 2024"
        );
    }

    #[test]
    fn test_validate_format() {
        assert!(validate_format(DEFAULT_DATE_FORMAT));
        assert!(validate_format("%Y-%m-%d"));
        assert!(!validate_format("%Q"));
    }

    #[test]
    fn test_malformed_format_falls_back() {
        let instant = utc(2024, 1, 1, 0, 0, 0);
        assert_eq!(format_date(&instant, "%Q"), "1/1/2024");
    }
}
