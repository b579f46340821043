//! Alignment of request times to the feed's half-hour grid and the time ranges
//! requested from upstream.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Timelike};

/// Length of one feed interval.
pub const INTERVAL_MINUTES: i64 = 30;

/// Half-open `[from, to)` range of feed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub from: DateTime<FixedOffset>,
    pub to: DateTime<FixedOffset>,
}

/// Returns the start of the slot after the one in progress or about to start.
///
/// Minutes `:00`–`:29` snap to the next full hour; `:30`–`:59` snap to half
/// past the next hour. Seconds are discarded and the offset is kept, so the
/// search always begins on a whole interval that has not elapsed yet.
///
/// # Examples
///
/// ```
/// use clean_charge::horizon::snap_to_next_half_hour;
/// use clean_charge::timestamp::{format_timestamp, parse_timestamp};
///
/// let now = parse_timestamp("2025-12-19T10:45:12Z").unwrap();
/// assert_eq!(format_timestamp(&snap_to_next_half_hour(now)), "2025-12-19T11:30Z");
/// ```
pub fn snap_to_next_half_hour(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let into_hour = TimeDelta::minutes(i64::from(now.minute()))
        + TimeDelta::seconds(i64::from(now.second()))
        + TimeDelta::nanoseconds(i64::from(now.nanosecond()));
    let hour_start = now - into_hour;
    let ahead = if now.minute() < 30 { 2 } else { 3 };
    hour_start + TimeDelta::minutes(ahead * INTERVAL_MINUTES)
}

/// Rolling search range for the optimal charging window.
pub fn search_horizon(now: DateTime<FixedOffset>, search_window_hours: u32) -> TimeRange {
    let from = snap_to_next_half_hour(now);
    TimeRange {
        from,
        to: from + TimeDelta::hours(i64::from(search_window_hours)),
    }
}

/// Range covering `days` whole calendar days starting at midnight of `today`
/// in the given offset.
pub fn generation_mix_horizon(today: NaiveDate, offset: FixedOffset, days: u32) -> TimeRange {
    let local_midnight = today.and_time(NaiveTime::MIN);
    let utc_midnight = local_midnight - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    let from = DateTime::from_naive_utc_and_offset(utc_midnight, offset);
    TimeRange {
        from,
        to: from + TimeDelta::days(i64::from(days)),
    }
}
