//! Parsing and formatting of the feed's offset-aware timestamps.
//!
//! The generation feed writes minute-precision ISO 8601 timestamps without
//! seconds (`2025-12-19T00:30Z`, `2025-12-19T00:30+01:00`), which is not valid
//! RFC 3339. Both shapes are accepted here. Also usable as a serde `with`
//! module.

use chrono::{DateTime, FixedOffset, ParseError, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serializer, de};

const MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M%:z";

/// Parses a feed timestamp, with or without seconds.
///
/// # Errors
///
/// Returns the `chrono` parse error if `raw` is neither RFC 3339 nor the
/// minute-precision form.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed);
    }
    let normalized = raw
        .strip_suffix('Z')
        .map_or_else(|| raw.to_owned(), |head| format!("{head}+00:00"));
    DateTime::parse_from_str(&normalized, MINUTE_FORMAT)
}

/// Formats a timestamp the way the feed does.
///
/// Whole minutes are written without seconds, UTC as `Z`. Anything finer
/// falls back to RFC 3339.
///
/// # Examples
///
/// ```
/// use clean_charge::timestamp::{format_timestamp, parse_timestamp};
///
/// let ts = parse_timestamp("2025-12-19T02:00+01:00").unwrap();
/// assert_eq!(format_timestamp(&ts), "2025-12-19T02:00+01:00");
/// ```
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    if ts.second() != 0 || ts.nanosecond() != 0 {
        return ts.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    }
    if ts.offset().local_minus_utc() == 0 {
        ts.format("%Y-%m-%dT%H:%MZ").to_string()
    } else {
        ts.format(MINUTE_FORMAT).to_string()
    }
}

/// Formats a timestamp for the upstream request path, always in UTC.
pub fn format_request_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.with_timezone(&Utc).format("%Y-%m-%dT%H:%MZ").to_string()
}

pub fn serialize<S: Serializer>(ts: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&raw), &"an ISO 8601 timestamp with offset"))
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, TimeZone};

    use super::*;

    #[test]
    fn parses_minute_precision_zulu() {
        let ts = parse_timestamp("2023-01-01T12:30Z").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 0);
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (12, 30, 0));
    }

    #[test]
    fn parses_minute_precision_with_offset() {
        let ts = parse_timestamp("2025-12-19T00:30+01:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 3600);
        assert_eq!(ts.day(), 19);
        assert_eq!(ts.with_timezone(&Utc).day(), 18);
    }

    #[test]
    fn parses_full_rfc3339() {
        let ts = parse_timestamp("2025-12-19T10:15:42+00:00").unwrap();
        assert_eq!(ts.second(), 42);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("start").is_err());
        assert!(parse_timestamp("2025-12-19T10:15").is_err());
    }

    #[test]
    fn formats_like_the_feed() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let ts = utc.with_ymd_and_hms(2025, 12, 19, 2, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-12-19T02:00Z");

        let with_seconds = utc.with_ymd_and_hms(2025, 12, 19, 2, 0, 5).unwrap();
        assert_eq!(format_timestamp(&with_seconds), "2025-12-19T02:00:05Z");
    }

    #[test]
    fn request_timestamps_are_utc() {
        let ts = parse_timestamp("2025-06-01T00:00+01:00").unwrap();
        assert_eq!(format_request_timestamp(&ts), "2025-05-31T23:00Z");
    }

    #[test]
    fn format_then_parse_keeps_instant_and_offset() {
        let ts = parse_timestamp("2025-06-01T13:30+05:45").unwrap();
        let again = parse_timestamp(&format_timestamp(&ts)).unwrap();
        assert_eq!(again, ts);
        assert_eq!(again.offset(), ts.offset());
    }
}
